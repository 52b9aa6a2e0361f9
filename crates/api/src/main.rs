use anyhow::Result;
use axum::{extract::Request, ServiceExt};
use persistence::repositories::UserRepository;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tracing::{info, warn};

use user_directory_api::{app, config::Config, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging and metrics
    middleware::logging::init_logging(&config.logging);
    middleware::metrics::init_metrics();

    info!("Starting user directory API v{}", env!("CARGO_PKG_VERSION"));

    // Verify the schema once at startup. A failure is logged, not fatal:
    // the server still starts and individual operations degrade until the
    // store becomes reachable.
    let users = UserRepository::new(&config.database);
    match users.ensure_schema().await {
        Ok(()) => info!("users table verified"),
        Err(err) => warn!(error = %err, "schema initialization failed, continuing degraded"),
    }

    // Build application. Trailing-slash normalization sits outside the
    // router so `/api/users/` and `/api/users` hit the same route.
    let addr = config.socket_addr();
    let app = app::create_app(config, users);
    let app = NormalizePathLayer::trim_trailing_slash().layer(app);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
