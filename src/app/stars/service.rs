//! 明星业务服务
//!
//! 无状态服务对象：启动时构造一次，注入路由状态。每个操作只做一次
//! 存储往返（分页查询为计数加查询两次），并在本地把存储层错误转换为
//! 面向 HTTP 的 [`CoreError`]。

use std::sync::Arc;

use tracing::{debug, info};
use validator::Validate;

use super::model::{ListQuery, NewStar, Star, StarId, StarPatch};
use super::repository::{StarFilter, StarStore, StoreError};
use crate::core::error::CoreError;
use crate::core::response::{MessageResponse, Paginated};
use crate::infrastructure::config::PaginationConfig;

/// 规范化后的分页请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
    pub search: String,
}

impl PageRequest {
    /// 缺失、不以数字开头或为 0 的 `page`/`limit` 回落到默认值，负数视为错误请求
    pub fn from_query(query: &ListQuery, pagination: &PaginationConfig) -> Result<Self, CoreError> {
        let page = lenient_positive("page", query.page.as_deref())?.unwrap_or(1);
        let limit = lenient_positive("limit", query.limit.as_deref())?
            .unwrap_or(pagination.default_limit)
            .min(pagination.max_limit);
        let search = query.search.as_deref().unwrap_or_default().trim().to_string();

        Ok(Self {
            page,
            limit,
            search,
        })
    }

    pub fn skip(&self) -> u64 {
        skip_for(self.page, self.limit)
    }
}

fn lenient_positive(name: &str, raw: Option<&str>) -> Result<Option<u64>, CoreError> {
    let Some(value) = raw.and_then(leading_integer) else {
        return Ok(None);
    };

    match value {
        0 => Ok(None),
        v if v < 0 => Err(CoreError::BadRequest(format!(
            "{name} must be a positive integer"
        ))),
        v => Ok(Some(v.unsigned_abs())),
    }
}

/// 读取开头的十进制整数（可带符号），忽略其后的字符，如 `"2abc"` 为 2、`"3.9"` 为 3
fn leading_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

fn skip_for(page: u64, limit: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(limit)
}

/// 格式不正确的标识视为不存在
fn parse_id(raw: &str) -> Option<StarId> {
    raw.parse().ok()
}

#[derive(Clone)]
pub struct StarService {
    store: Arc<dyn StarStore>,
    pagination: PaginationConfig,
}

impl StarService {
    pub fn new(store: Arc<dyn StarStore>, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    pub async fn create(&self, payload: NewStar) -> Result<Star, CoreError> {
        payload.validate()?;

        let star = self
            .store
            .insert(payload.sanitized())
            .await
            .map_err(|e| CoreError::store("Error creating star", e))?;

        info!("Created star: {} ({})", star.name, star.id);
        Ok(star)
    }

    pub async fn get_one(&self, id: &str) -> Result<Star, CoreError> {
        let id = parse_id(id).ok_or_else(CoreError::star_not_found)?;

        self.store
            .find_by_id(id)
            .await
            .map_err(|e| CoreError::store("Error fetching star", e))?
            .ok_or_else(CoreError::star_not_found)
    }

    /// 不做默认值处理：缺少 `page` 时从头开始，缺少 `limit` 时不限制数量
    pub async fn get_all(&self, page: Option<u64>, limit: Option<u64>) -> Result<Vec<Star>, CoreError> {
        let skip = match (page, limit) {
            (Some(page), Some(limit)) => skip_for(page, limit),
            _ => 0,
        };

        self.store
            .find(&StarFilter::all(), skip, limit)
            .await
            .map_err(|e| CoreError::store("Error fetching stars", e))
    }

    pub async fn get_paginated(&self, query: &ListQuery) -> Result<Paginated<Star>, CoreError> {
        let request = PageRequest::from_query(query, &self.pagination)?;
        let filter = StarFilter::name_contains(&request.search)
            .map_err(|e| CoreError::BadRequest(format!("Invalid search term: {e}")))?;

        let total = self
            .store
            .count(&filter)
            .await
            .map_err(|e| CoreError::store("Error while fetching paginated stars", e))?;
        let stars = self
            .store
            .find(&filter, request.skip(), Some(request.limit))
            .await
            .map_err(|e| CoreError::store("Error while fetching paginated stars", e))?;

        debug!(
            "Listed {} of {} stars (page {}, limit {}, search {:?})",
            stars.len(),
            total,
            request.page,
            request.limit,
            request.search
        );

        Ok(Paginated::new(stars, total, request.page, request.limit))
    }

    pub async fn update(&self, id: &str, patch: StarPatch) -> Result<MessageResponse, CoreError> {
        let id = parse_id(id).ok_or_else(CoreError::star_not_found)?;
        if let Err(errors) = patch.validate() {
            // 不存在的记录优先报告 NotFound
            let existing = self
                .store
                .find_by_id(id)
                .await
                .map_err(|e| CoreError::store("Error updating star", e))?;
            return Err(match existing {
                Some(_) => CoreError::Validation(errors),
                None => CoreError::star_not_found(),
            });
        }
        let patch = patch.sanitized();
        if patch.is_empty() {
            debug!("Empty update for star {}, only touching updated_at", id);
        }

        let result = self
            .store
            .update_by_id(id, patch)
            .await
            .map_err(|e| CoreError::store("Error updating star", e))?;

        if result.matched_count == 0 {
            return Err(CoreError::star_not_found());
        }

        info!("Updated star: {}", id);
        Ok(MessageResponse::new("Star updated successfully"))
    }

    pub async fn delete(&self, id: &str) -> Result<MessageResponse, CoreError> {
        let id = parse_id(id).ok_or_else(CoreError::star_not_found)?;

        let result = self
            .store
            .delete_by_id(id)
            .await
            .map_err(|e| CoreError::store("Error deleting star", e))?;

        if result.deleted_count == 0 {
            return Err(CoreError::star_not_found());
        }

        info!("Deleted star: {}", id);
        Ok(MessageResponse::new("Star deleted successfully"))
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::stars::repository::{DeleteResult, UpdateResult};
    use crate::infrastructure::memory::MemoryStarStore;
    use async_trait::async_trait;
    use serde_json::json;

    fn service() -> StarService {
        StarService::new(Arc::new(MemoryStarStore::new()), PaginationConfig::default())
    }

    fn query(page: Option<&str>, limit: Option<&str>, search: Option<&str>) -> ListQuery {
        ListQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
            search: search.map(str::to_string),
        }
    }

    async fn seed(service: &StarService, names: &[&str]) -> Vec<Star> {
        let mut stars = Vec::new();
        for (i, name) in names.iter().enumerate() {
            let star = service
                .create(NewStar::new(*name, format!("star{i}@example.com"), "Film"))
                .await
                .unwrap();
            stars.push(star);
        }
        stars
    }

    struct BrokenStore;

    #[async_trait]
    impl StarStore for BrokenStore {
        async fn insert(&self, _payload: NewStar) -> Result<Star, StoreError> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
        async fn find_by_id(&self, _id: StarId) -> Result<Option<Star>, StoreError> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
        async fn find(&self, _f: &StarFilter, _s: u64, _l: Option<u64>) -> Result<Vec<Star>, StoreError> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
        async fn count(&self, _f: &StarFilter) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
        async fn update_by_id(&self, _id: StarId, _p: StarPatch) -> Result<UpdateResult, StoreError> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
        async fn delete_by_id(&self, _id: StarId) -> Result<DeleteResult, StoreError> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
        async fn ping(&self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("disk on fire".into()))
        }
    }

    #[test]
    fn test_page_request_defaults() {
        let config = PaginationConfig::default();

        let request = PageRequest::from_query(&ListQuery::default(), &config).unwrap();
        assert_eq!(request, PageRequest { page: 1, limit: 6, search: String::new() });

        let request =
            PageRequest::from_query(&query(Some("0"), Some("abc"), Some("  meryl ")), &config).unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 6);
        assert_eq!(request.search, "meryl");

        let request = PageRequest::from_query(&query(Some("3"), Some("500"), None), &config).unwrap();
        assert_eq!(request.limit, config.max_limit);
        assert_eq!(request.skip(), 2 * config.max_limit);

        assert!(PageRequest::from_query(&query(Some("-1"), None, None), &config).is_err());

        // 只取开头的整数部分
        let request =
            PageRequest::from_query(&query(Some(" 2abc"), Some("3.9"), None), &config).unwrap();
        assert_eq!(request.page, 2);
        assert_eq!(request.limit, 3);

        let request =
            PageRequest::from_query(&query(Some("+4"), Some("px3"), None), &config).unwrap();
        assert_eq!(request.page, 4);
        assert_eq!(request.limit, 6);

        let request = PageRequest::from_query(&query(Some("-0"), Some("-"), None), &config).unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 6);
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("42"), Some(42));
        assert_eq!(leading_integer("  7px"), Some(7));
        assert_eq!(leading_integer("-12.5"), Some(-12));
        assert_eq!(leading_integer("abc"), None);
        assert_eq!(leading_integer(""), None);
        assert_eq!(leading_integer("+"), None);
        assert_eq!(leading_integer("99999999999999999999999"), Some(i64::MAX));
    }

    #[tokio::test]
    async fn test_create_then_get_one_returns_superset() {
        let service = service();
        let mut payload = NewStar::new("Meryl Streep", "m@s.com", "Drama");
        payload.extra.insert("oscars".into(), json!(3));

        let created = service.create(payload).await.unwrap();
        let fetched = service.get_one(&created.id.to_string()).await.unwrap();

        assert_eq!(fetched.name, "Meryl Streep");
        assert_eq!(fetched.email, "m@s.com");
        assert_eq!(fetched.major, "Drama");
        assert_eq!(fetched.extra.get("oscars"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload() {
        let err = service()
            .create(NewStar::new("", "nope", "Drama"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let service = service();
        let missing = StarId::new().to_string();

        for id in [missing.as_str(), "not-a-uuid"] {
            assert!(matches!(service.get_one(id).await, Err(CoreError::NotFound(_))));
            assert!(matches!(
                service.update(id, StarPatch::default()).await,
                Err(CoreError::NotFound(_))
            ));
            assert!(matches!(service.delete(id).await, Err(CoreError::NotFound(_))));
        }
    }

    #[tokio::test]
    async fn test_update_unknown_id_wins_over_invalid_patch() {
        let service = service();
        let star = seed(&service, &["Meryl Streep"]).await.remove(0);
        let invalid = StarPatch {
            email: Some("nope".into()),
            ..Default::default()
        };

        let err = service
            .update(&StarId::new().to_string(), invalid.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));

        let err = service.update(&star.id.to_string(), invalid).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let service = service();
        let star = seed(&service, &["Johnny Depp"]).await.remove(0);
        let id = star.id.to_string();

        let first = service.delete(&id).await.unwrap();
        assert_eq!(first.message, "Star deleted successfully");
        assert!(matches!(service.delete(&id).await, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_pagination_bounds() {
        let service = service();
        seed(&service, &["A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8", "A9", "A10", "A11", "A12", "A13"]).await;

        let first = service.get_paginated(&query(None, None, None)).await.unwrap();
        assert_eq!(first.total, 13);
        assert_eq!(first.page, 1);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.data.len(), 6);
        assert_eq!(first.data[0].name, "A1");

        let last = service.get_paginated(&query(Some("3"), None, None)).await.unwrap();
        assert_eq!(last.data.len(), 1);
        assert_eq!(last.data[0].name, "A13");

        let beyond = service.get_paginated(&query(Some("9"), Some("5"), None)).await.unwrap();
        assert!(beyond.data.is_empty());
        assert_eq!(beyond.total, 13);
        assert_eq!(beyond.total_pages, 3);
    }

    #[tokio::test]
    async fn test_search_filters_by_name() {
        let service = service();
        seed(&service, &["Johnny Depp", "Meryl Streep", "Johnny Cash"]).await;

        let johns = service.get_paginated(&query(None, None, Some("JOHN"))).await.unwrap();
        assert_eq!(johns.total, 2);

        let depp = service.get_paginated(&query(None, None, Some("depp"))).await.unwrap();
        assert_eq!(depp.total, 1);
        assert_eq!(depp.data[0].name, "Johnny Depp");

        let none = service.get_paginated(&query(None, None, Some("deppx"))).await.unwrap();
        assert_eq!(none.total, 0);
        assert_eq!(none.total_pages, 0);
    }

    #[tokio::test]
    async fn test_get_all_without_defaults() {
        let service = service();
        seed(&service, &["A", "B", "C", "D", "E", "F", "G", "H"]).await;

        assert_eq!(service.get_all(None, None).await.unwrap().len(), 8);

        let page = service.get_all(Some(2), Some(3)).await.unwrap();
        let names: Vec<_> = page.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["D", "E", "F"]);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let service = service();
        let star = seed(&service, &["Meryl Streep"]).await.remove(0);
        let id = star.id.to_string();

        let patch: StarPatch = serde_json::from_value(json!({ "major": "Acting" })).unwrap();
        let response = service.update(&id, patch).await.unwrap();
        assert_eq!(response.message, "Star updated successfully");

        let updated = service.get_one(&id).await.unwrap();
        assert_eq!(updated.major, "Acting");
        assert_eq!(updated.name, star.name);
        assert_eq!(updated.email, star.email);
    }

    #[tokio::test]
    async fn test_store_failures_become_internal_errors() {
        let service = StarService::new(Arc::new(BrokenStore), PaginationConfig::default());
        let id = StarId::new().to_string();

        let err = service
            .create(NewStar::new("Meryl Streep", "m@s.com", "Drama"))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::StoreFailure { message: "Error creating star", .. }));

        let err = service.update(&id, StarPatch::default()).await.unwrap_err();
        assert!(err.to_string().contains("disk on fire"));

        let err = service.get_paginated(&ListQuery::default()).await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::StoreFailure { message: "Error while fetching paginated stars", .. }
        ));

        assert!(service.ping().await.is_err());
    }
}
