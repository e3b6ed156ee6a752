//! Database row types; these map directly to SQLite rows.
//! Distinct from smarttodo-types API models to keep the DB layer independent.

use chrono::{DateTime, NaiveDateTime, Utc};
use smarttodo_types::Task;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct TaskRow {
    pub id: i64,
    pub description: String,
    pub completed: bool,
    pub created_at: String,
    pub user_id: String,
}

impl TaskRow {
    /// Convert to the wire model. Corrupt columns are logged and defaulted
    /// rather than failing the whole listing.
    pub fn into_task(self) -> Task {
        let created_at = parse_timestamp(&self.created_at).unwrap_or_else(|| {
            warn!("Corrupt created_at '{}' on task {}", self.created_at, self.id);
            DateTime::default()
        });

        let user_id = self.user_id.parse::<Uuid>().unwrap_or_else(|e| {
            warn!("Corrupt user_id '{}' on task {}: {}", self.user_id, self.id, e);
            Uuid::default()
        });

        Task {
            id: self.id,
            description: self.description,
            completed: self.completed,
            created_at,
            user_id,
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Rows written by plain datetime('now') have no zone suffix.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .ok()
}
