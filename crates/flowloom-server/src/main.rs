mod config;
mod error;
mod handlers;
mod routes;
mod state;

use anyhow::Context;
use config::ServerConfig;
use flowloom_llm::Generator;
use routes::create_router;
use state::AppState;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                "info,flowloom_server=debug,flowloom_llm=debug,flowloom_core=debug".to_string()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let addr = config.listen_addr();
    let state = AppState::new(Generator::new(config.llm));
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("flowloom listening on {addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
