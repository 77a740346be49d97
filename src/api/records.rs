/// Day-record endpoints: list, fetch, latest-task, create, replace, delete
use crate::{
    api::{
        extract::{ApiKeyAuth, VersionGuard},
        response,
    },
    context::AppContext,
    store::{day_key, model::TaskEntry, StoreResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;

/// Body of create and replace requests
#[derive(Debug, Deserialize)]
pub struct DayBody {
    /// Day key in canonical `dd/mm/yyyy` form
    pub id: String,
    #[serde(default)]
    pub records: Vec<TaskEntry>,
}

#[derive(Deserialize)]
struct DatePath {
    date: String,
}

#[derive(Deserialize)]
struct TaskPath {
    date: String,
    task_id: i64,
}

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/:version/day", get(list_days).post(create_day))
        .route(
            "/api/:version/day/:date",
            get(get_day).put(update_day).delete(delete_day),
        )
        .route("/api/:version/day/:date/latest", get(latest_task))
        .route("/api/:version/day/:date/task/:task_id", delete(delete_task))
}

/// GET /api/{v}/day - every stored day record, in insertion order
async fn list_days(
    _version: VersionGuard,
    _auth: ApiKeyAuth,
    State(ctx): State<AppContext>,
) -> Response {
    match ctx.store.get_all().await {
        StoreResult::Ok(days) => (StatusCode::OK, response::data(days)).into_response(),
        outcome => unexpected(outcome.void()),
    }
}

/// GET /api/{v}/day/{date}
async fn get_day(
    _version: VersionGuard,
    _auth: ApiKeyAuth,
    State(ctx): State<AppContext>,
    Path(path): Path<DatePath>,
) -> Response {
    match ctx.store.get_day(&day_key(&path.date)).await {
        StoreResult::Ok(record) => (StatusCode::OK, response::data(record)).into_response(),
        StoreResult::NotFound => (
            StatusCode::BAD_REQUEST,
            response::message(response::RECORD_NOT_FOUND),
        )
            .into_response(),
        outcome => unexpected(outcome.void()),
    }
}

/// GET /api/{v}/day/{date}/latest - non-destructive peek at the most recent
/// task of the day
async fn latest_task(
    _version: VersionGuard,
    _auth: ApiKeyAuth,
    State(ctx): State<AppContext>,
    Path(path): Path<DatePath>,
) -> Response {
    match ctx.store.latest_task(&day_key(&path.date)).await {
        StoreResult::Ok(task) => (StatusCode::OK, response::data(task)).into_response(),
        StoreResult::NotFound => (
            StatusCode::NOT_FOUND,
            response::message(response::TASK_NOT_FOUND),
        )
            .into_response(),
        outcome => unexpected(outcome.void()),
    }
}

/// POST /api/{v}/day - create a new day record; the body carries the day key
async fn create_day(
    _version: VersionGuard,
    _auth: ApiKeyAuth,
    State(ctx): State<AppContext>,
    Json(body): Json<DayBody>,
) -> Response {
    match ctx.store.create_day(&body.id, &body.records).await {
        StoreResult::Ok(()) => (
            StatusCode::CREATED,
            response::message(response::SUCCESS_CREATE_UPDATE),
        )
            .into_response(),
        StoreResult::Conflict => (
            StatusCode::BAD_REQUEST,
            response::message(response::FAILED_CREATE_UPDATE),
        )
            .into_response(),
        outcome => unexpected(outcome),
    }
}

/// PUT /api/{v}/day/{date} - replace the day's whole task list
async fn update_day(
    _version: VersionGuard,
    _auth: ApiKeyAuth,
    State(ctx): State<AppContext>,
    Path(path): Path<DatePath>,
    Json(body): Json<DayBody>,
) -> Response {
    match ctx
        .store
        .update_day(&day_key(&path.date), &body.records)
        .await
    {
        StoreResult::Ok(()) => (
            StatusCode::OK,
            response::message(response::SUCCESS_CREATE_UPDATE),
        )
            .into_response(),
        StoreResult::NotFound => (
            StatusCode::BAD_REQUEST,
            response::message(response::FAILED_CREATE_UPDATE),
        )
            .into_response(),
        outcome => unexpected(outcome),
    }
}

/// DELETE /api/{v}/day/{date}
async fn delete_day(
    _version: VersionGuard,
    _auth: ApiKeyAuth,
    State(ctx): State<AppContext>,
    Path(path): Path<DatePath>,
) -> Response {
    match ctx.store.delete_day(&day_key(&path.date)).await {
        StoreResult::Ok(()) => (
            StatusCode::OK,
            response::message(response::SUCCESS_DELETED_DAY),
        )
            .into_response(),
        StoreResult::NotFound => (
            StatusCode::BAD_REQUEST,
            response::message(response::FAILED_DELETED_DAY),
        )
            .into_response(),
        outcome => unexpected(outcome),
    }
}

/// DELETE /api/{v}/day/{date}/task/{task_id} - remove one task by id
async fn delete_task(
    _version: VersionGuard,
    _auth: ApiKeyAuth,
    State(ctx): State<AppContext>,
    Path(path): Path<TaskPath>,
) -> Response {
    match ctx
        .store
        .delete_task(&day_key(&path.date), path.task_id)
        .await
    {
        StoreResult::Ok(()) => (
            StatusCode::OK,
            response::message(response::SUCCESS_DELETED_TASK),
        )
            .into_response(),
        StoreResult::NotChanged => (
            StatusCode::NOT_FOUND,
            response::message(response::TASK_NOT_FOUND),
        )
            .into_response(),
        StoreResult::NotFound => (
            StatusCode::BAD_REQUEST,
            response::message(response::FAILED_DELETED_TASK),
        )
            .into_response(),
        outcome => unexpected(outcome),
    }
}

/// Fallback mapping for outcomes a handler has no specific answer for,
/// in practice the unavailable store
fn unexpected(outcome: StoreResult<()>) -> Response {
    match outcome {
        StoreResult::Unavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            response::message(response::SERVER_UNAVAILABLE),
        )
            .into_response(),
        other => {
            tracing::error!(?other, "store outcome had no handler mapping");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                response::message("internal error"),
            )
                .into_response()
        }
    }
}
