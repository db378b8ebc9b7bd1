//! 明星数据模型

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

/// 由存储层维护的键，提交的附加字段中出现时会被丢弃
pub const RESERVED_KEYS: [&str; 3] = ["_id", "created_at", "updated_at"];

/// 明星记录的标识，由存储层分配，创建后不可变
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StarId(Uuid);

impl StarId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for StarId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for StarId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for StarId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for StarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 已持久化的明星记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    #[serde(rename = "_id")]
    pub id: StarId,
    pub name: String,
    pub email: String,
    pub major: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 客户端提交的其他字段，原样保存
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Star {
    pub fn from_new(id: StarId, payload: NewStar, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: payload.name,
            email: payload.email,
            major: payload.major,
            created_at: now,
            updated_at: now,
            extra: payload.extra,
        }
    }

    /// 将补丁中出现的字段合并进记录，标识和创建时间保持不变
    pub fn apply(&mut self, patch: StarPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(major) = patch.major {
            self.major = major;
        }
        self.extra.extend(patch.extra);
        self.updated_at = now;
    }
}

/// 创建请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewStar {
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "email must be a valid address"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "major must be between 1 and 100 characters"))]
    pub major: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewStar {
    pub fn new(name: impl Into<String>, email: impl Into<String>, major: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            major: major.into(),
            extra: Map::new(),
        }
    }

    pub fn sanitized(mut self) -> Self {
        strip_reserved(&mut self.extra);
        self
    }
}

/// 部分更新请求，只有出现的字段会被覆盖
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct StarPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "major must be between 1 and 100 characters"))]
    pub major: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StarPatch {
    pub fn sanitized(mut self) -> Self {
        strip_reserved(&mut self.extra);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.major.is_none() && self.extra.is_empty()
    }
}

fn strip_reserved(extra: &mut Map<String, Value>) {
    for key in RESERVED_KEYS {
        extra.remove(key);
    }
}

/// 列表查询参数
///
/// 保持字符串形式，宽松解析在服务层完成。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    /// 从原始查询键值对构造，重复出现的键取第一个值，未知键忽略
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                "search" => &mut query.search,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }
}
