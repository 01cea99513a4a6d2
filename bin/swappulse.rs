use std::sync::Arc;

use anyhow::Context;
use jemallocator::Jemalloc;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use swappulse::{
    CronScheduler, CronSettings, Database, FeeComparator, JobContext, MetadataClient, Publisher,
    Settings, StateStore,
};

#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap();

    // Load configuration
    let settings = Arc::new(
        Settings::new()
            .context("Failed to load config.yaml. Please ensure it exists and is valid")?,
    );

    let cancellation_token = CancellationToken::new();

    let db = Arc::new(
        Database::new(settings.clone())
            .await
            .context("Failed to initialize database connection")?,
    );

    // Explicit on-disk state replaces the old process-wide globals:
    // loaded once here, persisted after every mutation
    let state = Arc::new(Mutex::new(
        StateStore::load(&settings.state.dir)
            .await
            .context("Failed to load on-disk state")?,
    ));

    let ctx = Arc::new(JobContext {
        db,
        metadata: MetadataClient::new(&settings.metadata)
            .context("Failed to build asset metadata client")?,
        comparator: FeeComparator::new(settings.comparator.clone())
            .context("Failed to build fee comparator")?,
        publisher: Publisher::from_settings(&settings.publisher)
            .context("Failed to build publisher")?,
        state,
    });

    // Create and spawn the cron scheduler
    // (periodic metrics summary + high-value order posts)
    let cron_scheduler = CronScheduler::new(ctx, CronSettings::default());

    let cron_token = cancellation_token.child_token();
    let cron_handle = tokio::spawn(async move {
        if let Err(e) = cron_scheduler.run(cron_token).await {
            error!("Cron scheduler failed: {:#}", e);
        }
    });

    info!("Cron scheduler started - posts will run periodically");

    #[cfg(unix)]
    let mut sigterm_stream = {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?
    };

    // Set up graceful shutdown signal handler
    info!("SwapPulse running. Press Ctrl+C to stop.");

    #[cfg(unix)]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
            _ = sigterm_stream.recv() => {
                info!("Received SIGTERM, exiting gracefully...");
            },
        };
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
        };
    }

    // Cancel all running tasks
    info!("Finishing all tasks...");

    cancellation_token.cancel();

    // Wait for cron scheduler to stop
    info!("Waiting for cron scheduler to stop...");
    let _ = cron_handle.await;

    info!("Scheduler stopped");
    Ok(())
}
