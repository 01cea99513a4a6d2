mod aggregator;

pub use aggregator::{aggregate, order_usd_value, GroupLeader, OrderSnapshot, SwapMetrics};
