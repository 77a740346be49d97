/// Service endpoints: key exchange and store connectivity probe
///
/// Neither route requires the API key: the exchange is how clients obtain
/// it, and the probe is a plain health signal.
use crate::{api::extract::VersionGuard, context::AppContext, error::ApiError};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

/// Body of the key-exchange request
#[derive(Debug, Deserialize)]
pub struct AccessKeyBody {
    pub access_token: String,
}

pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/:version/auth/key", post(exchange_key))
        .route("/api/:version/connection", get(connection))
}

/// POST /api/{v}/auth/key - exchange a client access token for the API key
async fn exchange_key(
    _version: VersionGuard,
    State(ctx): State<AppContext>,
    Json(body): Json<AccessKeyBody>,
) -> Response {
    if !ctx.store.is_connected() {
        return ApiError::Unavailable.into_response();
    }

    match ctx.broker.exchange(&body.access_token).await {
        Some(key) => (StatusCode::OK, Json(json!({ "key": key }))).into_response(),
        None => ApiError::Authentication("access token rejected".to_string()).into_response(),
    }
}

/// GET /api/{v}/connection - store connectivity probe
async fn connection(_version: VersionGuard, State(ctx): State<AppContext>) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "connected": ctx.store.is_connected() })),
    )
        .into_response()
}
