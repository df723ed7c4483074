// ABOUTME: Entry point for the optly-tools binary.
// ABOUTME: Parses CLI arguments, initializes tracing, loads config, and starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;

use optly_server::{AppState, ToolsConfig, create_router};

#[derive(Debug, Parser)]
#[command(name = "optly-tools", about = "Opal tool endpoints for Optimizely experimentation")]
struct Args {
    /// Socket address to bind, overriding OPTLY_BIND.
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "optly_tools=debug,optly_server=debug,optly_client=debug,tower_http=debug"
                        .parse()
                        .unwrap()
                }),
        )
        .init();

    let args = Args::parse();
    let mut config = ToolsConfig::from_env()?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }

    let bind = config.bind;
    let auth_token = config.auth_token.clone();
    let state = Arc::new(AppState::new(config));
    let app = create_router(state, auth_token);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("optly-tools listening on {}", bind);
    axum::serve(listener, app).await?;

    Ok(())
}
