/// API routes and handlers
pub mod extract;
pub mod records;
pub mod response;
pub mod server;

use crate::context::AppContext;
use axum::Router;

/// Version segment every route is served under; requests carrying any other
/// segment are rejected with the outdated-version warning
pub const ROUTE_VERSION: &str = "v1";

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new().merge(server::routes()).merge(records::routes())
}
