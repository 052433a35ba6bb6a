//! Video entity definitions
//!
//! The video catalog is owned by the surrounding application; the chat core
//! only looks videos up to enrich mentions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub thumbnail: Option<String>,
}
