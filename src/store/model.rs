/// Store models for the day-record and API-key collections
use serde::{Deserialize, Serialize};

/// One tracked work unit within a day record
///
/// `start`, `end` and `delta` are caller-trusted; the service never checks
/// that `end` follows `start` or that `delta` matches the two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEntry {
    /// Unique within the owning day record, not globally
    pub id: i64,
    pub task: String,
    pub start: String,
    pub end: String,
    pub delta: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Carried through storage untouched; nothing mutates it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// All tracked tasks for one calendar day
///
/// The day string is the canonical `dd/mm/yyyy` storage key. The last entry
/// in `records` is conventionally the current task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    #[serde(rename = "_id")]
    pub day: String,
    pub records: Vec<TaskEntry>,
}

/// Stored API key document, one per recognized subject
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyRecord {
    #[serde(rename = "type")]
    pub subject: String,
    pub key: String,
}
