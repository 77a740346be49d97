/// Request extractors: route-version guard and API-key authentication
use crate::{api::ROUTE_VERSION, auth, context::AppContext, error::ApiError};
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use std::collections::HashMap;

/// Rejects the request with 400 unless the path's `version` segment matches
/// the compiled-in route version. Listed first in a handler's arguments so
/// the version check runs before authentication.
pub struct VersionGuard;

#[async_trait]
impl FromRequestParts<AppContext> for VersionGuard {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let Path(params): Path<HashMap<String, String>> =
            Path::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::VersionMismatch)?;

        match params.get("version") {
            Some(version) if version == ROUTE_VERSION => Ok(VersionGuard),
            _ => Err(ApiError::VersionMismatch),
        }
    }
}

/// Authenticates a request against the process-wide cached API key.
///
/// The credential may arrive in a header or a cookie, both under the
/// configured credential name. It must match the cached key byte-for-byte
/// AND carry a valid signature for the configured subject; anything else is
/// a fixed 403.
pub struct ApiKeyAuth;

#[async_trait]
impl FromRequestParts<AppContext> for ApiKeyAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let name = &state.config.authentication.api_key_name;

        let header = parts
            .headers
            .get(name.as_str())
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let cookie = CookieJar::from_headers(&parts.headers)
            .get(name.as_str())
            .map(|cookie| cookie.value().to_string());

        for credential in [header, cookie].into_iter().flatten() {
            if credential == *state.api_key
                && auth::verify_token(
                    &credential,
                    &state.config.authentication.secret,
                    &state.config.authentication.auth_user,
                )
            {
                return Ok(ApiKeyAuth);
            }
        }

        Err(ApiError::Authentication(
            "missing or invalid API key".to_string(),
        ))
    }
}
