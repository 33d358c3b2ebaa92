//! `promptly` server binary.

use clap::Parser;
use log::info;
use promptly_core::{init_logging, open_db, OllamaClient, SuggestionGenerator};
use promptly_server::{build_router, AppState, ServerConfig};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::parse();
    init_logging(config.effective_log_level(), &config.effective_log_dir()?)?;

    // Apply migrations before accepting connections.
    drop(open_db(&config.db)?);

    let client = OllamaClient::new(config.ollama_host.as_str());
    let generator = SuggestionGenerator::new(Arc::new(client), config.model.as_str());
    let app = build_router(AppState::new(config.db.clone(), generator));

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "event=server_start module=server status=ok addr={} db={} model={} ollama={}",
        addr,
        config.db.display(),
        config.model,
        config.ollama_host
    );
    println!("Promptly listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
