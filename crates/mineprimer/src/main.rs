use std::sync::Arc;

use mineprimer::config::Config;
use mineprimer::server::Server;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let config = Config::from_env()?;

    let listener = TcpListener::bind(&config.listen_addr).await?;
    info!(
        max_players = config.info.max_players,
        timeout_secs = config.timeout.as_secs(),
        "Listening on {}",
        config.listen_addr
    );

    let server = Arc::new(Server::new(config.info, config.timeout));
    server.run(listener).await;

    Ok(())
}
