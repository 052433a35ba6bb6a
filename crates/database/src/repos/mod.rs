//! Repository implementations for the chat backend.

pub mod ban_repository;
pub mod message_repository;
pub mod session_repository;
pub mod user_repository;
pub mod video_repository;

pub use ban_repository::BanRepository;
pub use message_repository::MessageRepository;
pub use session_repository::SessionRepository;
pub use user_repository::UserRepository;
pub use video_repository::VideoRepository;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use crate::types::{DatabaseError, DatabaseResult};

/// Timestamps are stored as fixed-width RFC 3339 strings so that SQL string
/// comparison matches chronological order.
pub(crate) fn fmt_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn uuid_col(row: &SqliteRow, name: &str) -> DatabaseResult<Uuid> {
    let value: String = row.try_get(name)?;
    Ok(Uuid::parse_str(&value)?)
}

pub(crate) fn opt_uuid_col(row: &SqliteRow, name: &str) -> DatabaseResult<Option<Uuid>> {
    let value: Option<String> = row.try_get(name)?;
    value.map(|v| Uuid::parse_str(&v).map_err(Into::into)).transpose()
}

pub(crate) fn datetime_col(row: &SqliteRow, name: &str) -> DatabaseResult<DateTime<Utc>> {
    let value: String = row.try_get(name)?;
    parse_ts(&value)
}

pub(crate) fn opt_datetime_col(
    row: &SqliteRow,
    name: &str,
) -> DatabaseResult<Option<DateTime<Utc>>> {
    let value: Option<String> = row.try_get(name)?;
    value.map(|v| parse_ts(&v)).transpose()
}

fn parse_ts(value: &str) -> DatabaseResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DatabaseError::InvalidRow(format!("malformed timestamp column: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn fixed_width_timestamps_compare_lexicographically() {
        let base = Utc::now();
        let earlier = fmt_ts(base);
        let later = fmt_ts(base + Duration::microseconds(1));
        assert!(later > earlier);
    }
}
