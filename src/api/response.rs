/// Response envelopes and the fixed message strings sent to clients
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

// failure messages
pub const FAILED_CREATE_UPDATE: &str = "failed creating / updating";
pub const FAILED_DELETED_DAY: &str = "failed to delete day";
pub const FAILED_DELETED_TASK: &str = "failed to delete task";
pub const TASK_NOT_FOUND: &str = "task not found";
pub const RECORD_NOT_FOUND: &str = "record not found";

// server unavailable
pub const SERVER_UNAVAILABLE: &str = "server unavailable";

// success messages
pub const SUCCESS_CREATE_UPDATE: &str = "success";
pub const SUCCESS_DELETED_DAY: &str = "success day deleted";
pub const SUCCESS_DELETED_TASK: &str = "success task deleted";

// version warning
pub const VERSION_WARNING: &str = "You are using an outdated version, aborted";

// authentication failure
pub const INVALID_CREDENTIALS: &str = "Could not validate credentials";

/// Wrap a payload in the `data` envelope
pub fn data<T: Serialize>(value: T) -> Json<Value> {
    Json(json!({ "data": value }))
}

/// Fixed-message body
pub fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}
