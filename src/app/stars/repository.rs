//! 明星记录存储抽象
//!
//! 服务层只依赖 [`StarStore`]，具体实现位于 `infrastructure`：
//! 内存存储用于本地运行和测试，PostgreSQL 存储用于部署。

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};

use super::model::{NewStar, Star, StarId, StarPatch};

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// 查询过滤条件
///
/// 名称过滤为大小写不敏感的子串匹配，搜索词中的正则元字符会被转义。
#[derive(Debug, Clone, Default)]
pub struct StarFilter {
    name: Option<Regex>,
}

impl StarFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn name_contains(term: &str) -> Result<Self, regex::Error> {
        let name = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()?;
        Ok(Self { name: Some(name) })
    }

    pub fn matches(&self, star: &Star) -> bool {
        self.name
            .as_ref()
            .map_or(true, |pattern| pattern.is_match(&star.name))
    }

    /// 转义后的名称模式，供数据库侧的正则匹配使用
    pub fn name_pattern(&self) -> Option<&str> {
        self.name.as_ref().map(Regex::as_str)
    }
}

/// 明星记录存储
#[async_trait]
pub trait StarStore: Send + Sync {
    /// 保存记录并分配标识
    async fn insert(&self, payload: NewStar) -> Result<Star, StoreError>;

    async fn find_by_id(&self, id: StarId) -> Result<Option<Star>, StoreError>;

    /// 按插入顺序返回匹配的记录，`limit` 为 `None` 时不限制数量
    async fn find(
        &self,
        filter: &StarFilter,
        skip: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Star>, StoreError>;

    async fn count(&self, filter: &StarFilter) -> Result<u64, StoreError>;

    async fn update_by_id(&self, id: StarId, patch: StarPatch) -> Result<UpdateResult, StoreError>;

    async fn delete_by_id(&self, id: StarId) -> Result<DeleteResult, StoreError>;

    /// 健康检查
    async fn ping(&self) -> Result<(), StoreError>;
}
