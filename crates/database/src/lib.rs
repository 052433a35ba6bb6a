//! Reelhub Database Crate
//!
//! This crate provides database functionality for the reelhub backend,
//! including connection management, migrations, and the repositories the
//! chat core reads and writes through.

use reelhub_config::DatabaseConfig;
use sqlx::SqlitePool;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

// Re-export repositories
pub use repos::{
    BanRepository, MessageRepository, SessionRepository, UserRepository, VideoRepository,
};

// Re-export entities
pub use entities::{
    ban::{ChatBan, NewChatBan},
    message::{ChatMessage, MessageWithRelations, NewChatMessage, ReplySnapshot},
    session::AuthSession,
    user::{User, UserProfile, UserRole},
    video::Video,
};

// Re-export types
pub use types::{errors::DatabaseError, DatabaseResult};

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::Connection(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::Migration(e.to_string()))?;

    Ok(pool)
}
