pub mod high_value_orders;
pub mod post_metrics;
