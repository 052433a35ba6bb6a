//! Repository for video lookups.
//!
//! The video catalog is managed elsewhere; chat only resolves mentions.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::entities::video::Video;
use crate::repos::fmt_ts;
use crate::types::DatabaseResult;

/// Repository for video database operations
#[derive(Clone)]
pub struct VideoRepository {
    pool: SqlitePool,
}

impl VideoRepository {
    /// Create a new video repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Look up a video by id.
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Video>> {
        let row = sqlx::query("SELECT id, title, thumbnail FROM videos WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok(Video {
                id,
                title: row.try_get("title")?,
                thumbnail: row.try_get("thumbnail")?,
            })
        })
        .transpose()
    }

    /// Insert a video row (seeding and tests).
    pub async fn create(&self, video: &Video) -> DatabaseResult<()> {
        sqlx::query("INSERT INTO videos (id, title, thumbnail, created_at) VALUES (?, ?, ?, ?)")
            .bind(video.id.to_string())
            .bind(&video.title)
            .bind(&video.thumbnail)
            .bind(fmt_ts(Utc::now()))
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
