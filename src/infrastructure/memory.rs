//! 内存存储
//!
//! 记录按插入顺序保存在 `Vec` 中，读写由异步读写锁保护。
//! 未配置数据库时作为默认存储，测试也使用它。

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::app::stars::model::{NewStar, Star, StarId, StarPatch};
use crate::app::stars::repository::{
    DeleteResult, StarFilter, StarStore, StoreError, UpdateResult,
};

#[derive(Default)]
pub struct MemoryStarStore {
    stars: RwLock<Vec<Star>>,
}

impl MemoryStarStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.stars.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.stars.read().await.is_empty()
    }
}

#[async_trait]
impl StarStore for MemoryStarStore {
    async fn insert(&self, payload: NewStar) -> Result<Star, StoreError> {
        let star = Star::from_new(StarId::new(), payload, chrono::Utc::now());
        self.stars.write().await.push(star.clone());
        Ok(star)
    }

    async fn find_by_id(&self, id: StarId) -> Result<Option<Star>, StoreError> {
        let stars = self.stars.read().await;
        Ok(stars.iter().find(|star| star.id == id).cloned())
    }

    async fn find(
        &self,
        filter: &StarFilter,
        skip: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Star>, StoreError> {
        let stars = self.stars.read().await;
        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let take = limit
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(stars
            .iter()
            .filter(|star| filter.matches(star))
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &StarFilter) -> Result<u64, StoreError> {
        let stars = self.stars.read().await;
        Ok(stars.iter().filter(|star| filter.matches(star)).count() as u64)
    }

    async fn update_by_id(&self, id: StarId, patch: StarPatch) -> Result<UpdateResult, StoreError> {
        let mut stars = self.stars.write().await;
        let matched_count = match stars.iter_mut().find(|star| star.id == id) {
            Some(star) => {
                star.apply(patch, chrono::Utc::now());
                1
            }
            None => 0,
        };
        Ok(UpdateResult { matched_count })
    }

    async fn delete_by_id(&self, id: StarId) -> Result<DeleteResult, StoreError> {
        let mut stars = self.stars.write().await;
        let before = stars.len();
        stars.retain(|star| star.id != id);
        Ok(DeleteResult {
            deleted_count: (before - stars.len()) as u64,
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let store = MemoryStarStore::new();
        let a = store.insert(NewStar::new("A", "a@x.com", "Film")).await.unwrap();
        let b = store.insert(NewStar::new("B", "b@x.com", "Film")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(store.len().await, 2);
        assert_eq!(store.find_by_id(b.id).await.unwrap(), Some(b));
    }

    #[tokio::test]
    async fn test_find_keeps_insertion_order() {
        let store = MemoryStarStore::new();
        for name in ["Cate", "Anna", "Brad"] {
            store.insert(NewStar::new(name, "x@x.com", "Film")).await.unwrap();
        }

        let stars = store.find(&StarFilter::all(), 1, Some(5)).await.unwrap();
        let names: Vec<_> = stars.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Anna", "Brad"]);

        let filter = StarFilter::name_contains("a").unwrap();
        assert_eq!(store.count(&filter).await.unwrap(), 3);
        assert!(store.find(&filter, 10, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_counts() {
        let store = MemoryStarStore::new();
        let star = store.insert(NewStar::new("A", "a@x.com", "Film")).await.unwrap();

        let patch = StarPatch {
            major: Some("Acting".into()),
            ..Default::default()
        };
        assert_eq!(store.update_by_id(star.id, patch.clone()).await.unwrap().matched_count, 1);
        assert_eq!(store.update_by_id(StarId::new(), patch).await.unwrap().matched_count, 0);

        assert_eq!(store.delete_by_id(star.id).await.unwrap().deleted_count, 1);
        assert_eq!(store.delete_by_id(star.id).await.unwrap().deleted_count, 0);
        assert!(store.is_empty().await);
    }
}
