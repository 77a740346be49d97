/// Record Store Gateway
///
/// Owns the day-record collection. All store access above the pool goes
/// through `RecordStore`; SQL and JSON decoding never leak past it. Every
/// operation returns a `StoreResult` value; store failures are folded into
/// `Unavailable`, never raised.
pub mod model;

use crate::store::model::{DayRecord, TaskEntry};
use sqlx::{Row, SqlitePool};

/// Outcome of a store operation, pattern-matched by the HTTP layer
#[derive(Debug, Clone, PartialEq)]
pub enum StoreResult<T> {
    Ok(T),
    NotFound,
    Conflict,
    NotChanged,
    Unavailable,
}

impl<T> StoreResult<T> {
    /// Chain onto a successful outcome; non-Ok outcomes carry over
    pub fn and_then<U>(self, f: impl FnOnce(T) -> StoreResult<U>) -> StoreResult<U> {
        match self {
            StoreResult::Ok(value) => f(value),
            StoreResult::NotFound => StoreResult::NotFound,
            StoreResult::Conflict => StoreResult::Conflict,
            StoreResult::NotChanged => StoreResult::NotChanged,
            StoreResult::Unavailable => StoreResult::Unavailable,
        }
    }

    /// Drop the payload, keeping the outcome
    pub fn void(self) -> StoreResult<()> {
        self.and_then(|_| StoreResult::Ok(()))
    }
}

/// Convert a URL date segment (`dd_mm_yyyy`) into the storage key form
/// (`dd/mm/yyyy`). Pure; malformed input passes through untouched.
pub fn day_key(segment: &str) -> String {
    segment.replace('_', "/")
}

/// Gateway over the day-record collection
///
/// Built disconnected when the pool could not be opened at startup; in that
/// state every operation reports `Unavailable` and the process keeps serving.
#[derive(Clone)]
pub struct RecordStore {
    pool: Option<SqlitePool>,
}

impl RecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool: Some(pool) }
    }

    pub fn disconnected() -> Self {
        Self { pool: None }
    }

    pub fn is_connected(&self) -> bool {
        self.pool.is_some()
    }

    /// Every stored day document, in insertion order
    pub async fn get_all(&self) -> StoreResult<Vec<DayRecord>> {
        let Some(pool) = self.pool.as_ref() else {
            return StoreResult::Unavailable;
        };

        let rows = match sqlx::query("SELECT day, records FROM day_records ORDER BY rowid")
            .fetch_all(pool)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!(error = %e, "failed to list day records");
                return StoreResult::Unavailable;
            }
        };

        let mut days = Vec::with_capacity(rows.len());
        for row in rows {
            match decode_day(&row) {
                Some(record) => days.push(record),
                None => return StoreResult::Unavailable,
            }
        }

        StoreResult::Ok(days)
    }

    /// Exact-key lookup of one day document
    pub async fn get_day(&self, day: &str) -> StoreResult<DayRecord> {
        let Some(pool) = self.pool.as_ref() else {
            return StoreResult::Unavailable;
        };

        let row = match sqlx::query("SELECT day, records FROM day_records WHERE day = ?")
            .bind(day)
            .fetch_optional(pool)
            .await
        {
            Ok(row) => row,
            Err(e) => {
                tracing::error!(error = %e, day, "failed to fetch day record");
                return StoreResult::Unavailable;
            }
        };

        match row {
            Some(row) => match decode_day(&row) {
                Some(record) => StoreResult::Ok(record),
                None => StoreResult::Unavailable,
            },
            None => StoreResult::NotFound,
        }
    }

    /// Non-destructive peek at the last task of a day; an empty sequence is
    /// treated as not found
    pub async fn latest_task(&self, day: &str) -> StoreResult<TaskEntry> {
        self.get_day(day)
            .await
            .and_then(|record| match record.records.last() {
                Some(task) => StoreResult::Ok(task.clone()),
                None => StoreResult::NotFound,
            })
    }

    /// Insert a new day document; `Conflict` if the day already exists
    pub async fn create_day(&self, day: &str, records: &[TaskEntry]) -> StoreResult<()> {
        match self.get_day(day).await {
            StoreResult::NotFound => {}
            StoreResult::Ok(_) => return StoreResult::Conflict,
            other => return other.void(),
        }

        let Some(pool) = self.pool.as_ref() else {
            return StoreResult::Unavailable;
        };

        let encoded = match encode_records(records) {
            Some(encoded) => encoded,
            None => return StoreResult::Unavailable,
        };

        match sqlx::query("INSERT INTO day_records (day, records) VALUES (?, ?)")
            .bind(day)
            .bind(encoded)
            .execute(pool)
            .await
        {
            Ok(_) => StoreResult::Ok(()),
            Err(e) => {
                tracing::error!(error = %e, day, "failed to insert day record");
                StoreResult::Unavailable
            }
        }
    }

    /// Replace a day's whole records array; `NotFound` if the day is absent
    pub async fn update_day(&self, day: &str, records: &[TaskEntry]) -> StoreResult<()> {
        match self.get_day(day).await {
            StoreResult::Ok(_) => {}
            other => return other.void(),
        }

        self.write_records(day, records).await
    }

    /// Delete a whole day document
    pub async fn delete_day(&self, day: &str) -> StoreResult<()> {
        match self.get_day(day).await {
            StoreResult::Ok(_) => {}
            other => return other.void(),
        }

        let Some(pool) = self.pool.as_ref() else {
            return StoreResult::Unavailable;
        };

        match sqlx::query("DELETE FROM day_records WHERE day = ?")
            .bind(day)
            .execute(pool)
            .await
        {
            Ok(_) => StoreResult::Ok(()),
            Err(e) => {
                tracing::error!(error = %e, day, "failed to delete day record");
                StoreResult::Unavailable
            }
        }
    }

    /// Remove the first task whose id matches and write back the filtered
    /// sequence. `NotChanged` when no entry matched; the stored document is
    /// not rewritten in that case.
    pub async fn delete_task(&self, day: &str, task_id: i64) -> StoreResult<()> {
        let record = match self.get_day(day).await {
            StoreResult::Ok(record) => record,
            other => return other.void(),
        };

        let mut records = record.records;
        let Some(index) = records.iter().position(|task| task.id == task_id) else {
            return StoreResult::NotChanged;
        };
        records.remove(index);

        self.write_records(day, &records).await
    }

    /// Single document-level write of the records column
    async fn write_records(&self, day: &str, records: &[TaskEntry]) -> StoreResult<()> {
        let Some(pool) = self.pool.as_ref() else {
            return StoreResult::Unavailable;
        };

        let encoded = match encode_records(records) {
            Some(encoded) => encoded,
            None => return StoreResult::Unavailable,
        };

        match sqlx::query("UPDATE day_records SET records = ? WHERE day = ?")
            .bind(encoded)
            .bind(day)
            .execute(pool)
            .await
        {
            Ok(_) => StoreResult::Ok(()),
            Err(e) => {
                tracing::error!(error = %e, day, "failed to write day records");
                StoreResult::Unavailable
            }
        }
    }
}

fn decode_day(row: &sqlx::sqlite::SqliteRow) -> Option<DayRecord> {
    let day: String = row.get("day");
    let raw: String = row.get("records");

    match serde_json::from_str::<Vec<TaskEntry>>(&raw) {
        Ok(records) => Some(DayRecord { day, records }),
        Err(e) => {
            tracing::error!(error = %e, day, "stored records column is not valid JSON");
            None
        }
    }
}

fn encode_records(records: &[TaskEntry]) -> Option<String> {
    match serde_json::to_string(records) {
        Ok(encoded) => Some(encoded),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode task records");
            None
        }
    }
}
