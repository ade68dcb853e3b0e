use clap::Parser;
use dotenvy::dotenv;
use ghostwriter::{AppState, Config, app, init_logging};
use tracing::{error, info};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();
    let config = Config::parse();

    let client = config.build_client().inspect_err(|e| {
        error!(provider = ?config.provider, error = %e, "cannot start without a completion client");
    })?;
    info!(provider = ?config.provider, model = client.model(), "completion client ready");

    let state = AppState::new(client);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("listening on http://{}", config.addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
