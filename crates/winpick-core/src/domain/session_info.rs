use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Describes the selector session currently holding the guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub pid: u32,
    pub scope: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl SessionInfo {
    pub fn new(scope: Option<String>) -> Self {
        Self {
            pid: std::process::id(),
            scope,
            started_at: Utc::now(),
        }
    }

    pub fn age_seconds(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds()
            .max(0)
    }
}
