//! Fee/time comparison against external swap aggregators.
//!
//! Each configured aggregator is asked for a quote on a reference swap;
//! a source that errors or times out simply contributes no data. When
//! every source fails the comparison degrades to zero savings instead
//! of failing the caller.

use std::time::Duration;

use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;

use crate::config::ComparatorSettings;

/// One aggregator's answer for the reference swap.
#[derive(Debug, Clone)]
pub struct FeeQuote {
    pub source: String,
    pub fee_usd: f64,
    pub time_secs: f64,
}

/// Outcome of the comparison, always well-formed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeeComparison {
    /// How many sources answered; 0 means the numbers below are all zero.
    pub sources_ok: usize,
    pub avg_fee_usd: f64,
    pub fee_saved_usd: f64,
    pub time_saved_secs: f64,
}

/// Wire shape of an aggregator quote response.
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "feeUsd")]
    fee_usd: f64,
    #[serde(rename = "estimatedTimeSecs")]
    estimated_time_secs: f64,
}

/// The swap we ask the aggregators to price, plus our own cost for it.
#[derive(Debug, Clone)]
pub struct ReferenceSwap {
    pub from_chain: String,
    pub to_chain: String,
    pub amount_usd: f64,
    pub our_fee_usd: f64,
    pub our_time_secs: f64,
}

#[derive(Clone)]
pub struct FeeComparator {
    http: reqwest::Client,
    settings: ComparatorSettings,
}

impl FeeComparator {
    pub fn new(settings: ComparatorSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("Failed to build comparator HTTP client")?;

        Ok(Self {
            http,
            settings,
        })
    }

    /// Query every configured source concurrently and summarize.
    pub async fn compare(&self, reference: &ReferenceSwap) -> FeeComparison {
        let requests = self
            .settings
            .sources
            .iter()
            .map(|source| self.fetch_quote(&source.name, &source.base_url, reference));

        let mut quotes = Vec::with_capacity(self.settings.sources.len());
        for result in futures::future::join_all(requests).await {
            match result {
                Ok(quote) => quotes.push(quote),
                Err(e) => warn!("Fee comparison source failed: {:#}", e),
            }
        }

        summarize(&quotes, reference.our_fee_usd, reference.our_time_secs)
    }

    async fn fetch_quote(
        &self,
        name: &str,
        base_url: &str,
        reference: &ReferenceSwap,
    ) -> Result<FeeQuote> {
        let url = format!("{}/quote", base_url.trim_end_matches('/'));

        let response: QuoteResponse = self
            .http
            .get(&url)
            .query(&[
                ("from", reference.from_chain.as_str()),
                ("to", reference.to_chain.as_str()),
            ])
            .query(&[("amountUsd", reference.amount_usd)])
            .send()
            .await
            .with_context(|| format!("Quote request to {} failed", name))?
            .error_for_status()
            .with_context(|| format!("{} returned an error status", name))?
            .json()
            .await
            .with_context(|| format!("Failed to decode quote from {}", name))?;

        Ok(FeeQuote {
            source: name.to_string(),
            fee_usd: response.fee_usd,
            time_secs: response.estimated_time_secs,
        })
    }
}

/// Average the usable quotes and subtract our own cost. Savings saturate
/// at zero: an aggregator being cheaper than us is reported as no saving,
/// not a negative one.
fn summarize(quotes: &[FeeQuote], our_fee_usd: f64, our_time_secs: f64) -> FeeComparison {
    let usable: Vec<&FeeQuote> = quotes
        .iter()
        .filter(|q| q.fee_usd.is_finite() && q.time_secs.is_finite())
        .collect();

    if usable.is_empty() {
        return FeeComparison::default();
    }

    let n = usable.len() as f64;
    let avg_fee_usd = usable.iter().map(|q| q.fee_usd).sum::<f64>() / n;
    let avg_time_secs = usable.iter().map(|q| q.time_secs).sum::<f64>() / n;

    FeeComparison {
        sources_ok: usable.len(),
        avg_fee_usd,
        fee_saved_usd: (avg_fee_usd - our_fee_usd).max(0.0),
        time_saved_secs: (avg_time_secs - our_time_secs).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(source: &str, fee: f64, time: f64) -> FeeQuote {
        FeeQuote {
            source: source.to_string(),
            fee_usd: fee,
            time_secs: time,
        }
    }

    #[test]
    fn test_all_sources_failed_defaults_to_zero() {
        let summary = summarize(&[], 1.0, 30.0);
        assert_eq!(summary, FeeComparison::default());
        assert_eq!(summary.fee_saved_usd, 0.0);
        assert_eq!(summary.time_saved_secs, 0.0);
    }

    #[test]
    fn test_average_and_savings() {
        let quotes = vec![
            quote("a", 10.0, 600.0),
            quote("b", 20.0, 1200.0),
            quote("c", 30.0, 1800.0),
        ];
        let summary = summarize(&quotes, 5.0, 300.0);

        assert_eq!(summary.sources_ok, 3);
        assert!((summary.avg_fee_usd - 20.0).abs() < 1e-9);
        assert!((summary.fee_saved_usd - 15.0).abs() < 1e-9);
        assert!((summary.time_saved_secs - 900.0).abs() < 1e-9);
    }

    #[test]
    fn test_savings_saturate_at_zero() {
        let quotes = vec![quote("a", 1.0, 10.0)];
        let summary = summarize(&quotes, 5.0, 300.0);

        assert_eq!(summary.fee_saved_usd, 0.0);
        assert_eq!(summary.time_saved_secs, 0.0);
    }

    #[test]
    fn test_non_finite_quotes_ignored() {
        let quotes = vec![quote("a", f64::NAN, 10.0), quote("b", 8.0, 80.0)];
        let summary = summarize(&quotes, 2.0, 20.0);

        assert_eq!(summary.sources_ok, 1);
        assert!((summary.fee_saved_usd - 6.0).abs() < 1e-9);
    }
}
