/// Creator Rights Registry daemon
///
/// Holds the registry in memory, runs the rights refresh and alert sweep
/// jobs, and logs a confirmation for every registry change.
use creator_rights::{
    config::{LoggingConfig, RegistryConfig, DEFAULT_LOG_FILTER},
    context::AppContext,
    error::RegistryResult,
    jobs::JobScheduler,
    metrics,
    notify::spawn_forwarder,
    seed,
};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> RegistryResult<()> {
    // Load configuration
    let config = RegistryConfig::from_env()?;

    // Initialize logging
    init_logging(&config.logging);

    // Print banner
    print_banner();

    // Create application context
    let ctx = Arc::new(AppContext::new(config)?);
    info!("Registry operator: {}", ctx.registry.operator());

    // Confirmations
    let forwarder = spawn_forwarder(ctx.registry.subscribe(), Arc::clone(&ctx.notifier));

    // Seed data
    if let Some(path) = ctx.config.seed.seed_file.as_deref() {
        info!("Loading seed creators from {}", path.display());
        let creators = seed::load_seed_file(path).await?;
        seed::apply_seed(&ctx.registry, creators).await;
    }

    // Start background jobs
    let scheduler = Arc::new(JobScheduler::new(Arc::clone(&ctx)));
    let jobs = scheduler.start();

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    for job in jobs {
        job.abort();
    }
    forwarder.abort();

    debug!("Final metrics:\n{}", metrics::render_metrics()?);

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_new(&logging.level)
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn print_banner() {
    println!(
        r#"
   ____                _               ____  _       _     _
  / ___|_ __ ___  __ _| |_ ___  _ __  |  _ \(_) __ _| |__ | |_ ___
 | |   | '__/ _ \/ _` | __/ _ \| '__| | |_) | |/ _` | '_ \| __/ __|
 | |___| | |  __/ (_| | || (_) | |    |  _ <| | (_| | | | | |_\__ \
  \____|_|  \___|\__,_|\__\___/|_|    |_| \_\_|\__, |_| |_|\__|___/
                                               |___/
        Creator Rights Registry v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
