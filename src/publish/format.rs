//! Post text assembly.

use chrono::{DateTime, Utc};

use crate::compare::FeeComparison;
use crate::metrics::SwapMetrics;
use crate::utils::{format_count, format_rate, format_usd};

/// Periodic summary post.
pub fn format_metrics_post(metrics: &SwapMetrics, comparison: &FeeComparison) -> String {
    let mut lines = vec![
        "Cross-chain swap pulse".to_string(),
        format!(
            "Volume: {} all-time | {} last 24h",
            format_usd(metrics.all_time_volume_usd),
            format_usd(metrics.volume_24h_usd)
        ),
        format!(
            "Orders: {} total | {} last 24h | {} completed",
            format_count(metrics.total_orders),
            format_count(metrics.orders_24h),
            format_rate(metrics.completion_rate)
        ),
        format!(
            "Top chain: {} ({} orders)",
            metrics.top_chain.name,
            format_count(metrics.top_chain.count)
        ),
        format!(
            "Top asset: {} ({} orders)",
            metrics.top_asset_pair.name,
            format_count(metrics.top_asset_pair.count)
        ),
        format!("Wallets: {}", format_count(metrics.unique_wallets)),
    ];

    if comparison.sources_ok > 0 && comparison.fee_saved_usd > 0.0 {
        lines.push(format!(
            "Cheaper than {} aggregators by {} per swap",
            comparison.sources_ok,
            format_usd(comparison.fee_saved_usd)
        ));
    }

    lines.join("\n")
}

/// Single high-value order post.
pub fn format_high_value_post(
    source_chain_name: &str,
    destination_chain_name: &str,
    asset_label: &str,
    usd_value: f64,
    created_at: DateTime<Utc>,
) -> String {
    format!(
        "Whale swap: {} in {} moved {} -> {} at {}",
        format_usd(usd_value),
        asset_label,
        source_chain_name,
        destination_chain_name,
        created_at.format("%Y-%m-%d %H:%M UTC")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::GroupLeader;

    fn metrics() -> SwapMetrics {
        SwapMetrics {
            total_orders: 1234,
            successful_orders: 1200,
            orders_24h: 56,
            all_time_volume_usd: 12_300_000.0,
            volume_24h_usd: 45_600.0,
            completion_rate: 0.9724,
            top_chain: GroupLeader {
                name: "Ethereum".to_string(),
                count: 800,
            },
            top_asset_pair: GroupLeader {
                name: "WBTC (Wrapped Bitcoin)".to_string(),
                count: 500,
            },
            unique_wallets: 321,
            computed_at: Utc::now(),
        }
    }

    #[test]
    fn test_metrics_post_contents() {
        let text = format_metrics_post(&metrics(), &FeeComparison::default());

        assert!(text.contains("$12.3M"));
        assert!(text.contains("$45.6K"));
        assert!(text.contains("1,234 total"));
        assert!(text.contains("97.2%"));
        assert!(text.contains("Ethereum"));
        assert!(text.contains("WBTC (Wrapped Bitcoin)"));
        // No comparison line when no source answered
        assert!(!text.contains("aggregators"));
    }

    #[test]
    fn test_metrics_post_with_comparison() {
        let comparison = FeeComparison {
            sources_ok: 3,
            avg_fee_usd: 20.0,
            fee_saved_usd: 15.0,
            time_saved_secs: 900.0,
        };
        let text = format_metrics_post(&metrics(), &comparison);
        assert!(text.contains("Cheaper than 3 aggregators by $15.00 per swap"));
    }

    #[test]
    fn test_high_value_post() {
        let at = DateTime::parse_from_rfc3339("2026-01-02T03:04:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let text = format_high_value_post("Ethereum", "Bitcoin", "WBTC (Wrapped Bitcoin)", 52_000.0, at);

        assert!(text.contains("$52.0K"));
        assert!(text.contains("Ethereum -> Bitcoin"));
        assert!(text.contains("2026-01-02 03:04 UTC"));
    }
}
