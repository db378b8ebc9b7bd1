//! 数据库基础设施
//!
//! PostgreSQL 实现的明星存储。已知字段各占一列，附加字段存放在 `JSONB`
//! 列中；`seq` 列保留插入顺序。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    types::Json,
    Error,
};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::config::DatabaseConfig;
use crate::app::stars::model::{NewStar, Star, StarId, StarPatch};
use crate::app::stars::repository::{
    DeleteResult, StarFilter, StarStore, StoreError, UpdateResult,
};

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(database_url: &str, config: &DatabaseConfig) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }
}

const STAR_COLUMNS: &str = "id, name, email, major, extra, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct StarRow {
    id: Uuid,
    name: String,
    email: String,
    major: String,
    extra: Json<Map<String, Value>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<StarRow> for Star {
    fn from(row: StarRow) -> Self {
        Star {
            id: StarId::from(row.id),
            name: row.name,
            email: row.email,
            major: row.major,
            created_at: row.created_at,
            updated_at: row.updated_at,
            extra: row.extra.0,
        }
    }
}

pub struct PgStarStore {
    pool: PgPool,
}

impl PgStarStore {
    pub fn new(manager: &DatabaseManager) -> Self {
        Self {
            pool: manager.get_pool().clone(),
        }
    }

    /// 创建数据表（不存在时）
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS hollywood_stars (
                seq BIGSERIAL,
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                major TEXT NOT NULL,
                extra JSONB NOT NULL DEFAULT '{}'::jsonb,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database table hollywood_stars is ready");
        Ok(())
    }
}

#[async_trait]
impl StarStore for PgStarStore {
    async fn insert(&self, payload: NewStar) -> Result<Star, StoreError> {
        let sql = format!(
            "INSERT INTO hollywood_stars (id, name, email, major, extra) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {STAR_COLUMNS}"
        );

        let row = sqlx::query_as::<_, StarRow>(&sql)
            .bind(StarId::new().as_uuid())
            .bind(payload.name)
            .bind(payload.email)
            .bind(payload.major)
            .bind(Json(payload.extra))
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: StarId) -> Result<Option<Star>, StoreError> {
        let sql = format!("SELECT {STAR_COLUMNS} FROM hollywood_stars WHERE id = $1");

        let row = sqlx::query_as::<_, StarRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Star::from))
    }

    async fn find(
        &self,
        filter: &StarFilter,
        skip: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Star>, StoreError> {
        let sql = format!(
            "SELECT {STAR_COLUMNS} FROM hollywood_stars \
             WHERE ($1::text IS NULL OR name ~* $1) \
             ORDER BY seq LIMIT $2 OFFSET $3"
        );

        let rows = sqlx::query_as::<_, StarRow>(&sql)
            .bind(filter.name_pattern())
            .bind(limit.map(to_i64))
            .bind(to_i64(skip))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Star::from).collect())
    }

    async fn count(&self, filter: &StarFilter) -> Result<u64, StoreError> {
        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM hollywood_stars WHERE ($1::text IS NULL OR name ~* $1)",
        )
        .bind(filter.name_pattern())
        .fetch_one(&self.pool)
        .await?;

        Ok(total.0.max(0) as u64)
    }

    async fn update_by_id(&self, id: StarId, patch: StarPatch) -> Result<UpdateResult, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE hollywood_stars
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                major = COALESCE($4, major),
                extra = extra || $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.major)
        .bind(Json(patch.extra))
        .execute(&self.pool)
        .await?;

        Ok(UpdateResult {
            matched_count: result.rows_affected(),
        })
    }

    async fn delete_by_id(&self, id: StarId) -> Result<DeleteResult, StoreError> {
        let result = sqlx::query("DELETE FROM hollywood_stars WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(DeleteResult {
            deleted_count: result.rows_affected(),
        })
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
