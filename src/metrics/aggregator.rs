//! Swap metrics aggregation.
//!
//! Turns a snapshot of successful order rows into the summary posted by
//! the bot: counts, USD volumes, completion rate and the most active
//! chain / asset pair. Everything is recomputed fresh per call; nothing
//! here is authoritative state.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::assets::AssetCatalog;
use crate::db::models::OrderRecord;
use crate::utils::str_to_f64_with_decimals;

/// Winner of a "most frequent" ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLeader {
    pub name: String,
    pub count: u64,
}

impl GroupLeader {
    fn unknown() -> Self {
        Self {
            name: "unknown".to_string(),
            count: 0,
        }
    }
}

/// Aggregated swap metrics, recomputed fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapMetrics {
    pub total_orders: u64,
    pub successful_orders: u64,
    pub orders_24h: u64,
    pub all_time_volume_usd: f64,
    pub volume_24h_usd: f64,
    /// successful / matched, in [0,1]; 0 when nothing matched yet.
    pub completion_rate: f64,
    pub top_chain: GroupLeader,
    pub top_asset_pair: GroupLeader,
    pub unique_wallets: u64,
    pub computed_at: DateTime<Utc>,
}

/// Order snapshot fed into [`aggregate`].
///
/// Lists already carry only successful orders (both legs redeemed); the
/// counts come from separate count queries and are independent of the
/// per-order lists.
#[derive(Debug, Default)]
pub struct OrderSnapshot {
    pub all_time: Vec<OrderRecord>,
    pub last_24h: Vec<OrderRecord>,
    pub total_matched: u64,
    pub total_successful: u64,
    pub unique_wallets: u64,
}

/// USD value of one side of an order.
///
/// `Ok(0.0)` when the amount or price is simply absent (the order still
/// counts, it just adds nothing); `Err` when the asset cannot be
/// resolved or the amount does not parse.
fn leg_usd(
    catalog: &AssetCatalog,
    chain: &str,
    asset: &str,
    amount: Option<&str>,
    price: Option<f64>,
) -> anyhow::Result<f64> {
    let (amount, price) = match (amount, price) {
        (Some(a), Some(p)) => (a, p),
        _ => return Ok(0.0),
    };

    let info = catalog.resolve(chain, asset)?;
    let human = str_to_f64_with_decimals(amount, info.decimals)
        .ok_or_else(|| anyhow::anyhow!("Unparseable amount {:?} for {}:{}", amount, chain, asset))?;

    Ok(human * price)
}

/// Source-side USD value, or `None` when the source leg is unresolvable.
fn source_usd(catalog: &AssetCatalog, order: &OrderRecord) -> Option<f64> {
    match leg_usd(
        catalog,
        &order.source_chain,
        &order.source_asset,
        order.source_amount.as_deref(),
        order.input_token_price,
    ) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!("Order {}: source leg skipped: {:#}", order.create_id, e);
            None
        },
    }
}

/// Full per-order USD value: source side plus destination side.
///
/// An unresolvable destination falls back to the source side alone; an
/// unresolvable source drops the order's volume contribution entirely.
/// Returns `None` in the latter case so callers can count the skip.
pub fn order_usd_value(catalog: &AssetCatalog, order: &OrderRecord) -> Option<f64> {
    let source = source_usd(catalog, order)?;

    let destination = match leg_usd(
        catalog,
        &order.destination_chain,
        &order.destination_asset,
        order.destination_amount.as_deref(),
        order.output_token_price,
    ) {
        Ok(v) => v,
        Err(e) => {
            debug!(
                "Order {}: destination leg skipped, counting source side only: {:#}",
                order.create_id, e
            );
            0.0
        },
    };

    Some(source + destination)
}

/// Sum per-order USD values, skipping orders whose source leg does not
/// resolve. Returns the total and the skipped-order count.
fn sum_volume(catalog: &AssetCatalog, orders: &[OrderRecord]) -> (f64, u64) {
    let mut total = 0.0;
    let mut skipped = 0u64;

    for order in orders {
        match order_usd_value(catalog, order) {
            Some(v) => total += v,
            None => skipped += 1,
        }
    }

    (total, skipped)
}

/// Generic "group, count, sum source-side volume, pick max" routine.
///
/// Ranking is deterministic: count descending, then summed source-side
/// USD volume descending, then grouping key ascending. The final
/// lexicographic step replaces the incidental map-iteration order a
/// naive implementation would leak.
fn top_group<F>(catalog: &AssetCatalog, orders: &[OrderRecord], key_fn: F) -> Option<(String, u64)>
where
    F: Fn(&OrderRecord) -> String,
{
    let mut groups: FxHashMap<String, (u64, f64)> = FxHashMap::default();

    for order in orders {
        let key = key_fn(order);
        let volume = source_usd(catalog, order).unwrap_or(0.0);
        let entry = groups.entry(key).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += volume;
    }

    let mut ranked: Vec<(String, u64, f64)> =
        groups.into_iter().map(|(k, (c, v))| (k, c, v)).collect();

    ranked.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.0.cmp(&b.0))
    });

    ranked.into_iter().next().map(|(key, count, _)| (key, count))
}

/// Compute [`SwapMetrics`] from an order snapshot and an asset catalog.
///
/// Per-order resolution failures never abort the call; affected orders
/// are skipped (or their unresolvable leg is) and the skip count is
/// surfaced as a warning.
pub fn aggregate(snapshot: &OrderSnapshot, catalog: &AssetCatalog) -> SwapMetrics {
    let (all_time_volume_usd, skipped_all_time) = sum_volume(catalog, &snapshot.all_time);
    let (volume_24h_usd, skipped_24h) = sum_volume(catalog, &snapshot.last_24h);

    if skipped_all_time > 0 || skipped_24h > 0 {
        warn!(
            "Volume aggregation skipped {} all-time and {} 24h orders with unresolvable source assets",
            skipped_all_time, skipped_24h
        );
    }

    let top_chain = top_group(catalog, &snapshot.all_time, OrderRecord::chain_key)
        .map(|(key, count)| GroupLeader {
            name: AssetCatalog::chain_display_name(&key)
                .map(str::to_string)
                .unwrap_or(key),
            count,
        })
        .unwrap_or_else(GroupLeader::unknown);

    let top_asset_pair = top_group(catalog, &snapshot.all_time, OrderRecord::pair_key)
        .map(|(key, count)| {
            // key is "chain:asset"; label with symbol/name when resolvable
            let name = key
                .split_once(':')
                .and_then(|(chain, asset)| catalog.resolve(chain, asset).ok())
                .map(|info| info.label())
                .unwrap_or(key);
            GroupLeader {
                name,
                count,
            }
        })
        .unwrap_or_else(GroupLeader::unknown);

    let completion_rate = if snapshot.total_matched > 0 {
        snapshot.total_successful as f64 / snapshot.total_matched as f64
    } else {
        0.0
    };

    SwapMetrics {
        total_orders: snapshot.total_matched,
        successful_orders: snapshot.total_successful,
        orders_24h: snapshot.last_24h.len() as u64,
        all_time_volume_usd,
        volume_24h_usd,
        completion_rate,
        top_chain,
        top_asset_pair,
        unique_wallets: snapshot.unique_wallets,
        computed_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetInfo;

    fn catalog() -> AssetCatalog {
        let mut c = AssetCatalog::new();
        c.insert(AssetInfo {
            chain: "ethereum".to_string(),
            symbol: "WBTC".to_string(),
            name: "Wrapped Bitcoin".to_string(),
            token_address: "0x2260fac5e5542a773aa44fbcfedf7c193bc2c599".to_string(),
            decimals: 8,
        });
        c.insert(AssetInfo {
            chain: "ethereum".to_string(),
            symbol: "WETH".to_string(),
            name: "Wrapped Ether".to_string(),
            token_address: "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2".to_string(),
            decimals: 18,
        });
        c.insert(AssetInfo {
            chain: "arbitrum".to_string(),
            symbol: "USDC".to_string(),
            name: "USD Coin".to_string(),
            token_address: "0xaf88d065e77c8cc2239327c5edb3a432268e5831".to_string(),
            decimals: 6,
        });
        c
    }

    fn order(
        id: &str,
        source_chain: &str,
        source_asset: &str,
        amount: &str,
        price: f64,
    ) -> OrderRecord {
        OrderRecord {
            create_id: id.to_string(),
            source_chain: source_chain.to_string(),
            source_asset: source_asset.to_string(),
            // Destination leg intentionally unresolvable by default
            destination_chain: "bitcoin".to_string(),
            destination_asset: "btc".to_string(),
            source_amount: Some(amount.to_string()),
            destination_amount: None,
            input_token_price: Some(price),
            output_token_price: None,
            created_at: Utc::now(),
        }
    }

    fn snapshot(all_time: Vec<OrderRecord>) -> OrderSnapshot {
        let matched = all_time.len() as u64 + 2;
        let successful = all_time.len() as u64;
        OrderSnapshot {
            last_24h: all_time.clone(),
            all_time,
            total_matched: matched,
            total_successful: successful,
            unique_wallets: successful,
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let metrics = aggregate(&OrderSnapshot::default(), &catalog());

        assert_eq!(metrics.all_time_volume_usd, 0.0);
        assert_eq!(metrics.volume_24h_usd, 0.0);
        assert_eq!(metrics.completion_rate, 0.0);
        assert_eq!(metrics.top_chain, GroupLeader::unknown());
        assert_eq!(metrics.top_asset_pair, GroupLeader::unknown());
        assert_eq!(metrics.orders_24h, 0);
    }

    #[test]
    fn test_single_order_volume() {
        // 1.0 WETH at $2000, destination unresolvable
        let orders = vec![order("a", "ethereum", "weth", "1000000000000000000", 2000.0)];
        let metrics = aggregate(&snapshot(orders), &catalog());

        assert!((metrics.all_time_volume_usd - 2000.0).abs() < 1e-9);
        assert!((metrics.volume_24h_usd - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_both_legs_summed_when_resolvable() {
        let mut o = order("a", "ethereum", "weth", "1000000000000000000", 2000.0);
        o.destination_chain = "arbitrum".to_string();
        o.destination_asset = "usdc".to_string();
        o.destination_amount = Some("1995000000".to_string()); // 1995 USDC
        o.output_token_price = Some(1.0);

        let metrics = aggregate(&snapshot(vec![o]), &catalog());
        assert!((metrics.all_time_volume_usd - 3995.0).abs() < 1e-6);
    }

    #[test]
    fn test_unresolvable_destination_keeps_source_side() {
        // Destination leg has an amount and price but no catalog entry
        let mut o = order("a", "ethereum", "weth", "1000000000000000000", 2000.0);
        o.destination_amount = Some("100000000".to_string());
        o.output_token_price = Some(60000.0);

        let metrics = aggregate(&snapshot(vec![o]), &catalog());
        assert!((metrics.all_time_volume_usd - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_price_contributes_zero_but_counts() {
        let mut o = order("a", "ethereum", "weth", "1000000000000000000", 2000.0);
        o.input_token_price = None;

        let metrics = aggregate(&snapshot(vec![o]), &catalog());
        assert_eq!(metrics.all_time_volume_usd, 0.0);
        assert_eq!(metrics.orders_24h, 1);
        assert_eq!(metrics.top_chain.count, 1);
    }

    #[test]
    fn test_all_source_legs_unresolvable_zero_volume_nonzero_counts() {
        let orders = vec![
            order("a", "nowhere", "ghost", "100", 5.0),
            order("b", "nowhere", "ghost", "200", 5.0),
        ];
        let metrics = aggregate(&snapshot(orders), &catalog());

        assert_eq!(metrics.all_time_volume_usd, 0.0);
        assert_eq!(metrics.volume_24h_usd, 0.0);
        assert_eq!(metrics.orders_24h, 2);
        // Grouping counts are independent of resolution success
        assert_eq!(metrics.top_chain.name, "nowhere");
        assert_eq!(metrics.top_chain.count, 2);
    }

    #[test]
    fn test_completion_rate_bounds() {
        let orders = vec![order("a", "ethereum", "weth", "1000000000000000000", 1.0)];
        let metrics = aggregate(&snapshot(orders), &catalog());
        assert!(metrics.completion_rate > 0.0 && metrics.completion_rate <= 1.0);

        let zero = aggregate(&OrderSnapshot::default(), &catalog());
        assert_eq!(zero.completion_rate, 0.0);
    }

    #[test]
    fn test_count_tie_broken_by_volume() {
        // Same order count per chain, arbitrum carries more USD volume
        let orders = vec![
            order("a", "ethereum", "weth", "1000000000000000000", 100.0),
            order("b", "arbitrum", "usdc", "200000000", 1.0), // $200
        ];
        let metrics = aggregate(&snapshot(orders), &catalog());
        assert_eq!(metrics.top_chain.name, "Arbitrum");
        assert_eq!(metrics.top_chain.count, 1);
    }

    #[test]
    fn test_full_tie_broken_lexicographically() {
        // Equal count and equal volume: lower key wins deterministically
        let orders = vec![
            order("a", "zeta", "weth", "1", 0.0),
            order("b", "alpha", "weth", "1", 0.0),
        ];
        let metrics = aggregate(&snapshot(orders), &catalog());
        assert_eq!(metrics.top_chain.name, "alpha");
    }

    #[test]
    fn test_top_asset_pair_label() {
        let orders = vec![
            order("a", "ethereum", "weth", "1000000000000000000", 2000.0),
            order("b", "ethereum", "weth", "1000000000000000000", 2000.0),
            order("c", "arbitrum", "usdc", "1000000", 1.0),
        ];
        let metrics = aggregate(&snapshot(orders), &catalog());
        assert_eq!(metrics.top_asset_pair.name, "WETH (Wrapped Ether)");
        assert_eq!(metrics.top_asset_pair.count, 2);
    }

    #[test]
    fn test_top_asset_pair_falls_back_to_raw_key() {
        let orders = vec![order("a", "nowhere", "ghost", "100", 5.0)];
        let metrics = aggregate(&snapshot(orders), &catalog());
        assert_eq!(metrics.top_asset_pair.name, "nowhere:ghost");
    }

    #[test]
    fn test_idempotent_on_identical_snapshot() {
        let orders = vec![
            order("a", "ethereum", "weth", "1000000000000000000", 2000.0),
            order("b", "arbitrum", "usdc", "5000000", 1.0),
        ];
        let snap = snapshot(orders);
        let cat = catalog();

        let first = aggregate(&snap, &cat);
        let second = aggregate(&snap, &cat);

        // computed_at differs; everything derived must not
        assert_eq!(first.all_time_volume_usd, second.all_time_volume_usd);
        assert_eq!(first.volume_24h_usd, second.volume_24h_usd);
        assert_eq!(first.top_chain, second.top_chain);
        assert_eq!(first.top_asset_pair, second.top_asset_pair);
        assert_eq!(first.completion_rate, second.completion_rate);
    }
}
