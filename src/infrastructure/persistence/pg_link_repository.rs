//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{LinkMetadata, LinkRecord, LinkTargets, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

const LINK_COLUMNS: &str = r#"
    id, discriminator,
    ios_deep_link, ios_fallback_url, android_deep_link, android_fallback_url,
    default_fallback_url, webhook_url,
    og_title, og_description, og_image_url,
    fingerprint, is_active, created_at, updated_at, deleted_at
"#;

/// Row shape of the `links` table.
#[derive(Debug, FromRow)]
struct LinkRow {
    id: i64,
    discriminator: String,
    ios_deep_link: Option<String>,
    ios_fallback_url: Option<String>,
    android_deep_link: Option<String>,
    android_fallback_url: Option<String>,
    default_fallback_url: String,
    webhook_url: Option<String>,
    og_title: Option<String>,
    og_description: Option<String>,
    og_image_url: Option<String>,
    fingerprint: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<LinkRow> for LinkRecord {
    fn from(row: LinkRow) -> Self {
        LinkRecord {
            id: row.id,
            discriminator: row.discriminator,
            targets: LinkTargets {
                ios_deep_link: row.ios_deep_link,
                ios_fallback_url: row.ios_fallback_url,
                android_deep_link: row.android_deep_link,
                android_fallback_url: row.android_fallback_url,
                default_fallback_url: row.default_fallback_url,
            },
            webhook_url: row.webhook_url,
            metadata: LinkMetadata {
                og_title: row.og_title,
                og_description: row.og_description,
                og_image_url: row.og_image_url,
            },
            fingerprint: row.fingerprint,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// PostgreSQL repository for link storage and retrieval.
///
/// Deduplication relies on the partial unique index on `fingerprint`
/// (live rows only): a racing duplicate insert fails with a unique
/// violation, which surfaces as [`AppError::Conflict`].
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn insert(&self, new_link: NewLink) -> Result<LinkRecord, AppError> {
        let NewLink {
            discriminator,
            fields,
            fingerprint,
        } = new_link;

        let sql = format!(
            r#"
            INSERT INTO links (
                discriminator,
                ios_deep_link, ios_fallback_url, android_deep_link, android_fallback_url,
                default_fallback_url, webhook_url,
                og_title, og_description, og_image_url,
                fingerprint
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {LINK_COLUMNS}
            "#
        );

        let row: LinkRow = sqlx::query_as(&sql)
            .bind(discriminator)
            .bind(fields.targets.ios_deep_link)
            .bind(fields.targets.ios_fallback_url)
            .bind(fields.targets.android_deep_link)
            .bind(fields.targets.android_fallback_url)
            .bind(fields.targets.default_fallback_url)
            .bind(fields.webhook_url)
            .bind(fields.metadata.og_title)
            .bind(fields.metadata.og_description)
            .bind(fields.metadata.og_image_url)
            .bind(fingerprint)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(row.into())
    }

    async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<Option<LinkRecord>, AppError> {
        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE fingerprint = $1 AND deleted_at IS NULL"
        );

        let row: Option<LinkRow> = sqlx::query_as(&sql)
            .bind(fingerprint)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<LinkRecord>, AppError> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = $1");

        let row: Option<LinkRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET is_active = $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(active)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE links
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
