/// Daylog - time-tracking record service
///
/// Serves per-day task records behind a versioned, API-key-guarded HTTP
/// surface. The key itself is stored server-side and released only in
/// exchange for a verified client access token.

mod api;
mod auth;
mod config;
mod context;
mod db;
mod error;
mod keys;
mod server;
mod store;

use config::ServerConfig;
use context::AppContext;
use error::ApiResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ApiResult<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daylog=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    print_banner();

    // Load configuration
    let config = ServerConfig::from_env()?;

    // Create application context; a down store degrades, it does not abort
    let ctx = AppContext::new(config).await?;

    // Start server
    server::serve(ctx).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ____              __
   / __ \____ ___  __/ /___  ____ _
  / / / / __ `/ / / / / __ \/ __ `/
 / /_/ / /_/ / /_/ / / /_/ / /_/ /
/_____/\__,_/\__, /_/\____/\__, /
            /____/        /____/

        Time-tracking record service v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
