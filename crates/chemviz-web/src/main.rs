//! chemviz web server.
//!
//! Run with: cargo run -p chemviz-web

use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chemviz=debug,info")),
        )
        .init();

    info!("🧪 chemviz starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = chemviz_core::config::Config::load()?;
    let state = chemviz_web::state::AppState::from_config(&config)?;
    let app = chemviz_web::router::build_router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
