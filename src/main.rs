use dotenvy::dotenv;
use inscribe::{config, errors::Result, scheduler};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; non-fatal, env vars can be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::AppConfig::from_env()?;
    info!("configuration loaded");

    // 4. Initialize database
    let db = config::database::create_connection(&app_config.database_url).await?;
    config::database::create_tables(&db).await?;
    info!(database_url = %app_config.database_url, "database initialized");

    // 5. Run the expiration scheduler until interrupted
    info!(
        interval_secs = app_config.sweep_interval_secs,
        "starting expiration scheduler"
    );
    scheduler::run(db, app_config.sweep_interval_secs).await;

    Ok(())
}
