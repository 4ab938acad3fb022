use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use markovian::error::Result;
use markovian::server;
use markovian::settings::Settings;

// The config file is the first argument, or MARKOVIAN_CONFIG, or ./markovian.toml.
#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("MARKOVIAN_CONFIG").ok());
    let settings = Settings::load(path.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        bind = %settings.server.bind,
        step_limit = settings.engine.step_limit,
        scales = ?settings.sampling.scales,
        "markovian starting"
    );

    let listener = tokio::net::TcpListener::bind(settings.server.bind.as_str()).await?;
    let app = server::router(Arc::new(settings));
    axum::serve(listener, app).await?;
    Ok(())
}
