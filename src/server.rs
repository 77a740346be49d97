/// HTTP server setup and routing
use crate::{
    context::AppContext,
    error::{ApiError, ApiResult},
};
use axum::{
    http::{Method, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Build the main application router
/// Returns Router<()> because state is already provided
pub fn build_router(ctx: AppContext) -> Router {
    // The credential header name is configurable, so allowed headers stay open
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        // Liveness endpoint (unversioned, no middleware)
        .route("/health", get(health_check))
        .merge(crate::api::routes())
        .with_state(ctx)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .fallback(not_found)
}

/// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "message": "endpoint not found"
        })),
    )
}

/// Start the HTTP server
pub async fn serve(ctx: AppContext) -> ApiResult<()> {
    let addr = format!(
        "{}:{}",
        ctx.config.service.hostname, ctx.config.service.port
    );

    info!("Daylog listening on {}", addr);
    info!("   store connected: {}", ctx.store.is_connected());

    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, LoggingConfig, ServerConfig, ServiceConfig, StorageConfig};
    use crate::context::AppContext;
    use crate::db;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::{json, Value};
    use sqlx::SqlitePool;
    use tower::ServiceExt;

    const SECRET: &str = "server-secret-0123456789";
    const CLIENT_SECRET: &str = "client-secret-0123456789";
    const SUBJECT: &str = "timekeeper";
    const KEY_NAME: &str = "access_token";

    fn mint(secret: &str, subject: &str) -> String {
        encode(
            &Header::default(),
            &json!({ "name": subject }),
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn test_config() -> ServerConfig {
        ServerConfig {
            service: ServiceConfig {
                hostname: "127.0.0.1".to_string(),
                port: 0,
            },
            storage: StorageConfig {
                db_location: ":memory:".into(),
            },
            authentication: AuthConfig {
                secret: SECRET.to_string(),
                client_secret: CLIENT_SECRET.to_string(),
                auth_user: SUBJECT.to_string(),
                api_key_name: KEY_NAME.to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    /// Router over a fresh in-memory store with a verified key seeded,
    /// plus the API key a client would hold after a successful exchange
    async fn app_with_store() -> (Router, String) {
        let pool = SqlitePool::connect(":memory:").await.unwrap();
        db::init_schema(&pool).await.unwrap();

        let api_key = mint(SECRET, SUBJECT);
        sqlx::query("INSERT INTO api_keys (subject, key) VALUES (?, ?)")
            .bind(SUBJECT)
            .bind(&api_key)
            .execute(&pool)
            .await
            .unwrap();

        let ctx = AppContext::from_pool(test_config(), Some(pool)).await.unwrap();
        (build_router(ctx), api_key)
    }

    async fn disconnected_app() -> Router {
        let ctx = AppContext::from_pool(test_config(), None).await.unwrap();
        build_router(ctx)
    }

    async fn send(
        app: &Router,
        method: &str,
        path: &str,
        api_key: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(key) = api_key {
            builder = builder.header(KEY_NAME, key);
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn task(id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "task": name,
            "start": "09:00:00",
            "end": "10:00:00",
            "delta": 1.0
        })
    }

    fn day_body(id: &str, tasks: &[Value]) -> Value {
        json!({ "id": id, "records": tasks })
    }

    #[tokio::test]
    async fn test_day_lifecycle_scenario() {
        let (app, api_key) = app_with_store().await;
        let key = Some(api_key.as_str());

        // Create the day with one task
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/day",
            key,
            Some(day_body("01/01/2020", &[task(1, "write report")])),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "success");

        // Creating the same day again conflicts
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/day",
            key,
            Some(day_body("01/01/2020", &[task(9, "other")])),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "failed creating / updating");

        // Replace the task list with two entries
        let (status, _) = send(
            &app,
            "PUT",
            "/api/v1/day/01_01_2020",
            key,
            Some(day_body(
                "01/01/2020",
                &[task(1, "write report"), task(2, "review")],
            )),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // Fetch through the underscore URL form
        let (status, body) = send(&app, "GET", "/api/v1/day/01_01_2020", key, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["_id"], "01/01/2020");
        assert_eq!(body["data"]["records"][0]["id"], 1);
        assert_eq!(body["data"]["records"][1]["id"], 2);

        // Latest task is the last entry, without consuming it
        let (status, body) = send(&app, "GET", "/api/v1/day/01_01_2020/latest", key, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"], 2);

        let (_, body) = send(&app, "GET", "/api/v1/day/01_01_2020", key, None).await;
        assert_eq!(body["data"]["records"].as_array().unwrap().len(), 2);

        // Delete task 1, leaving only task 2
        let (status, body) = send(
            &app,
            "DELETE",
            "/api/v1/day/01_01_2020/task/1",
            key,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "success task deleted");

        let (_, body) = send(&app, "GET", "/api/v1/day/01_01_2020", key, None).await;
        let records = body["data"]["records"].as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["id"], 2);

        // Deleting an id that is not there reports task not found
        let (status, body) = send(
            &app,
            "DELETE",
            "/api/v1/day/01_01_2020/task/42",
            key,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "task not found");

        // Delete the whole day; a follow-up fetch fails
        let (status, body) = send(&app, "DELETE", "/api/v1/day/01_01_2020", key, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "success day deleted");

        let (status, _) = send(&app, "GET", "/api/v1/day/01_01_2020", key, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_days_in_insertion_order() {
        let (app, api_key) = app_with_store().await;
        let key = Some(api_key.as_str());

        send(
            &app,
            "POST",
            "/api/v1/day",
            key,
            Some(day_body("02/01/2020", &[task(1, "a")])),
        )
        .await;
        send(
            &app,
            "POST",
            "/api/v1/day",
            key,
            Some(day_body("01/01/2020", &[task(2, "b")])),
        )
        .await;

        let (status, body) = send(&app, "GET", "/api/v1/day", key, None).await;
        assert_eq!(status, StatusCode::OK);
        let days = body["data"].as_array().unwrap();
        assert_eq!(days[0]["_id"], "02/01/2020");
        assert_eq!(days[1]["_id"], "01/01/2020");
    }

    #[tokio::test]
    async fn test_auth_rejections_are_forbidden() {
        let (app, _) = app_with_store().await;

        // No credential
        let (status, body) = send(&app, "GET", "/api/v1/day", None, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Could not validate credentials");

        // Credential that is not the cached key
        let (status, _) = send(&app, "GET", "/api/v1/day", Some("not-the-key"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Well-formed token signed with the wrong secret
        let forged = mint("wrong-secret-0123456789", SUBJECT);
        let (status, _) = send(&app, "GET", "/api/v1/day", Some(&forged), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_api_key_accepted_via_cookie() {
        let (app, api_key) = app_with_store().await;

        let request = Request::builder()
            .method("GET")
            .uri("/api/v1/day")
            .header(header::COOKIE, format!("{}={}", KEY_NAME, api_key))
            .body(Body::empty())
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_version_mismatch_short_circuits() {
        let (app, api_key) = app_with_store().await;
        let key = Some(api_key.as_str());

        let (status, body) = send(&app, "GET", "/api/v2/day", key, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "You are using an outdated version, aborted");

        // Unauthenticated routes check the version too
        let (status, _) = send(&app, "GET", "/api/v0/connection", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_key_exchange() {
        let (app, api_key) = app_with_store().await;

        let client_token = mint(CLIENT_SECRET, SUBJECT);
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/auth/key",
            None,
            Some(json!({ "access_token": client_token })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key"], api_key);

        // A token signed with the server secret is not a client token
        let wrong_tier = mint(SECRET, SUBJECT);
        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/auth/key",
            None,
            Some(json!({ "access_token": wrong_tier })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_exchanged_key_unlocks_protected_routes() {
        let (app, _) = app_with_store().await;

        let client_token = mint(CLIENT_SECRET, SUBJECT);
        let (_, body) = send(
            &app,
            "POST",
            "/api/v1/auth/key",
            None,
            Some(json!({ "access_token": client_token })),
        )
        .await;
        let key = body["key"].as_str().unwrap().to_string();

        let (status, _) = send(&app, "GET", "/api/v1/day", Some(&key), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_connection_probe() {
        let (app, _) = app_with_store().await;
        let (status, body) = send(&app, "GET", "/api/v1/connection", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["connected"], true);

        let app = disconnected_app().await;
        let (status, body) = send(&app, "GET", "/api/v1/connection", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["connected"], false);
    }

    #[tokio::test]
    async fn test_disconnected_store_yields_service_unavailable() {
        let app = disconnected_app().await;

        let client_token = mint(CLIENT_SECRET, SUBJECT);
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/auth/key",
            None,
            Some(json!({ "access_token": client_token })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], "server unavailable");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _) = app_with_store().await;
        let (status, body) = send(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (app, _) = app_with_store().await;
        let (status, _) = send(&app, "GET", "/api/v1/nothing-here", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
