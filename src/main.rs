use corpstats::{config::Config, scheduler::start_scheduler, startup};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), corpstats::error::Error> {
    let db = startup::connect_to_database(&config).await?;
    let state = startup::build_state(&config, db)?;

    let mut sched = start_scheduler(&state, &config.refresh_cron).await?;

    tracing::info!(
        "Corp stats refresh scheduled on \"{}\" with {} service(s) registered",
        config.refresh_cron,
        state.services.keys().count()
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }

    tracing::info!("Shutting down");
    sched.shutdown().await?;

    Ok(())
}
