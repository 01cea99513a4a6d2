//! Job to compute and post the aggregated swap metrics summary.
//!
//! One run is one fresh snapshot: five order-store queries, a catalog
//! lookup, aggregation, fee comparison, then a single outbound post.
//! A data-store failure fails this run only; the next tick starts over.

use anyhow::Result;
use log::info;

use crate::compare::ReferenceSwap;
use crate::cron::JobContext;
use crate::metrics::{aggregate, OrderSnapshot};
use crate::publish::format_metrics_post;

/// The swap the aggregators are asked to price for the comparison line.
fn reference_swap() -> ReferenceSwap {
    ReferenceSwap {
        from_chain: "ethereum".to_string(),
        to_chain: "bitcoin".to_string(),
        amount_usd: 1_000.0,
        our_fee_usd: 1.0,
        our_time_secs: 120.0,
    }
}

pub async fn run(ctx: &JobContext) -> Result<()> {
    info!("Starting post_metrics job...");

    let start = std::time::Instant::now();

    let pg = &ctx.db.postgres;
    let snapshot = OrderSnapshot {
        all_time: pg.get_successful_orders().await?,
        last_24h: pg.get_successful_orders_since(24).await?,
        total_matched: pg.count_matched_orders().await?,
        total_successful: pg.count_successful_orders().await?,
        unique_wallets: pg.count_distinct_initiators().await?,
    };

    let catalog = ctx.metadata.catalog().await?;
    let metrics = aggregate(&snapshot, &catalog);

    // Recoverable by design: zero savings when every source fails
    let comparison = ctx.comparator.compare(&reference_swap()).await;

    let text = format_metrics_post(&metrics, &comparison);
    ctx.publisher.publish(&text).await?;

    {
        let mut state = ctx.state.lock().await;
        state.record_post(&text);
        state.persist().await?;
        state.save_metrics_snapshot(&metrics).await?;
    }

    info!(
        "Completed post_metrics job in {:?} ({} orders, {} all-time volume)",
        start.elapsed(),
        metrics.total_orders,
        metrics.all_time_volume_usd
    );
    Ok(())
}
