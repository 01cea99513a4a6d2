mod format;
mod webhook;

pub use format::{format_high_value_post, format_metrics_post};
pub use webhook::Publisher;
