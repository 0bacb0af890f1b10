use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let ax = s3gate::build().await?;
    let addr = ax.state.config.addr();

    ax.listen_with_shutdown(addr, s3gate_axum::shutdown_signal()).await?;

    Ok(())
}
