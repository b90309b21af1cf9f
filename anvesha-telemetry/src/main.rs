//! Telemetry service binary.

use anvesha_telemetry::{build_router, AppState};
use clap::Parser;
use log::info;

/// Coordinate logging service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let app = build_router(AppState::new());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    info!("telemetry service listening on port {}", args.port);
    axum::serve(listener, app).await
}
