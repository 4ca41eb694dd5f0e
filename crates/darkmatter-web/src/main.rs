//! Dark Matter Web Server
//!
//! Run with: cargo run -p darkmatter-web

use darkmatter_config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    info!("Starting Dark Matter web server...");

    let config = Config::load()?;
    let addr = config.server.bind_addr();
    let static_dir = config.server.static_dir.clone();

    let state = darkmatter_web::state::AppState::from_config(config)?;
    let app = darkmatter_web::router::build_router(state, static_dir);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
