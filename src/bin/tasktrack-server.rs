use tasktrack::{api, config::ServerConfig, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_stderr();

    let config = ServerConfig::from_env()?;
    tracing::info!(host = %config.host, port = config.port, "starting task server");

    api::serve(&config, api::AppState::default()).await
}
