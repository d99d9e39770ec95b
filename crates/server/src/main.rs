use server::{config::ServerConfig, init_tracing, Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = ServerConfig::from_env()?;
    let handle = Server::start(config).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    handle.stop().await
}
