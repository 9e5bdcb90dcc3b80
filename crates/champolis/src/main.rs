use std::sync::Arc;

use champolis_core::config::Config;

#[tokio::main]
async fn main() -> Result<(), champolis_core::Error> {
    champolis_core::logging::init("champolis")?;

    let cfg = Arc::new(Config::load()?);
    tracing::info!("Starting Champolis");

    champolis_discord::router::run(cfg)
        .await
        .map_err(|e| champolis_core::Error::External(format!("discord bot failed: {e}")))?;

    Ok(())
}
