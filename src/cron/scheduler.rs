//! Cron scheduler for the bot's periodic work.
//!
//! Runs jobs like:
//! - Posting the aggregated swap metrics summary
//! - Posting individual high-value orders as they settle
//!
//! Job failures are logged and never crash the process; the next tick
//! simply retries from scratch.

use std::sync::Arc;

use anyhow::Result;
use log::{error, info};
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;

use crate::assets::MetadataClient;
use crate::compare::FeeComparator;
use crate::db::Database;
use crate::publish::Publisher;
use crate::state::StateStore;

use super::jobs;

/// Everything the periodic jobs need, shared behind one Arc.
pub struct JobContext {
    pub db: Arc<Database>,
    pub metadata: MetadataClient,
    pub comparator: FeeComparator,
    pub publisher: Publisher,
    pub state: Arc<Mutex<StateStore>>,
}

/// Configuration for cron job intervals and thresholds
#[derive(Debug, Clone)]
pub struct CronSettings {
    /// Interval for the metrics summary post - default 6 hours
    pub post_metrics_interval_secs: u64,
    /// Interval for the high-value order scan - default 15 minutes
    pub high_value_interval_secs: u64,
    /// Minimum per-order USD value worth a dedicated post
    pub high_value_threshold_usd: f64,
    /// How far back the high-value scan looks
    pub high_value_lookback_hours: i32,
}

impl Default for CronSettings {
    fn default() -> Self {
        Self {
            post_metrics_interval_secs: 21600, // 6 hours
            high_value_interval_secs: 900,     // 15 minutes
            high_value_threshold_usd: 10_000.0,
            high_value_lookback_hours: 6,
        }
    }
}

/// Cron scheduler that manages the bot's periodic jobs.
pub struct CronScheduler {
    ctx: Arc<JobContext>,
    settings: Arc<CronSettings>,
}

impl CronScheduler {
    pub fn new(ctx: Arc<JobContext>, settings: CronSettings) -> Self {
        Self {
            ctx,
            settings: Arc::new(settings),
        }
    }

    /// Starts the cron scheduler and runs until cancellation.
    pub async fn run(&self, cancellation_token: CancellationToken) -> Result<()> {
        let mut scheduler = JobScheduler::new().await?;

        // Register all jobs
        self.register_post_metrics_job(&scheduler).await?;
        self.register_high_value_orders_job(&scheduler).await?;

        // Start the scheduler
        scheduler.start().await?;
        info!("Cron scheduler started with {} jobs", 2);

        // Wait for cancellation
        cancellation_token.cancelled().await;
        info!("Cron scheduler shutting down...");

        scheduler.shutdown().await?;
        Ok(())
    }

    async fn register_post_metrics_job(&self, scheduler: &JobScheduler) -> Result<()> {
        let ctx = self.ctx.clone();
        let interval = self.settings.post_metrics_interval_secs;

        let job = Job::new_repeated_async(
            std::time::Duration::from_secs(interval),
            move |_uuid, _lock| {
                let ctx = ctx.clone();
                Box::pin(async move {
                    if let Err(e) = jobs::post_metrics::run(&ctx).await {
                        error!("Failed to post metrics summary: {:#}", e);
                    }
                })
            },
        )?;

        scheduler.add(job).await?;
        info!("Registered post_metrics job (every {}s)", interval);
        Ok(())
    }

    async fn register_high_value_orders_job(&self, scheduler: &JobScheduler) -> Result<()> {
        let ctx = self.ctx.clone();
        let settings = self.settings.clone();
        let interval = self.settings.high_value_interval_secs;

        let job = Job::new_repeated_async(
            std::time::Duration::from_secs(interval),
            move |_uuid, _lock| {
                let ctx = ctx.clone();
                let settings = settings.clone();
                Box::pin(async move {
                    if let Err(e) = jobs::high_value_orders::run(
                        &ctx,
                        settings.high_value_lookback_hours,
                        settings.high_value_threshold_usd,
                    )
                    .await
                    {
                        error!("Failed to scan for high-value orders: {:#}", e);
                    }
                })
            },
        )?;

        scheduler.add(job).await?;
        info!("Registered high_value_orders job (every {}s)", interval);
        Ok(())
    }
}
