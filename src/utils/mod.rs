//! Utility functions for the SwapPulse bot.
//!
//! - [`conversion`] - smallest-unit integer string to f64 conversion
//! - [`format`] - compact USD / rate / count formatting for posts

mod conversion;
mod format;

pub use conversion::str_to_f64_with_decimals;
pub use format::{format_count, format_rate, format_usd};
