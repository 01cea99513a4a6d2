//! Job to post individual high-value orders.
//!
//! Scans recently settled orders, values them against the asset catalog
//! and posts each one above the threshold exactly once. Orders are
//! marked processed only after a successful post, so a failed delivery
//! is retried on the next tick instead of being silently dropped.

use anyhow::Result;
use log::{debug, info};

use crate::assets::AssetCatalog;
use crate::cron::JobContext;
use crate::metrics::order_usd_value;
use crate::publish::format_high_value_post;

pub async fn run(ctx: &JobContext, lookback_hours: i32, threshold_usd: f64) -> Result<()> {
    info!("Starting high_value_orders job...");

    let start = std::time::Instant::now();

    let orders = ctx
        .db
        .postgres
        .get_successful_orders_since(lookback_hours)
        .await?;
    let catalog = ctx.metadata.catalog().await?;

    let mut posted = 0usize;

    for order in &orders {
        {
            let state = ctx.state.lock().await;
            if state.is_processed(&order.create_id) {
                continue;
            }
        }

        let usd_value = match order_usd_value(&catalog, order) {
            Some(v) => v,
            None => continue, // unresolvable source leg, skip quietly
        };

        if usd_value < threshold_usd {
            debug!(
                "Order {} below threshold ({} < {})",
                order.create_id, usd_value, threshold_usd
            );
            continue;
        }

        let asset_label = catalog
            .resolve(&order.source_chain, &order.source_asset)
            .map(|info| info.label())
            .unwrap_or_else(|_| order.source_asset.clone());
        let source_name = AssetCatalog::chain_display_name(&order.source_chain)
            .unwrap_or(order.source_chain.as_str());
        let destination_name = AssetCatalog::chain_display_name(&order.destination_chain)
            .unwrap_or(order.destination_chain.as_str());

        let text = format_high_value_post(
            source_name,
            destination_name,
            &asset_label,
            usd_value,
            order.created_at,
        );

        ctx.publisher.publish(&text).await?;

        let mut state = ctx.state.lock().await;
        state.mark_processed(order.create_id.clone());
        state.record_post(&text);
        state.persist().await?;

        posted += 1;
    }

    info!(
        "Completed high_value_orders job in {:?} ({} scanned, {} posted)",
        start.elapsed(),
        orders.len(),
        posted
    );
    Ok(())
}
