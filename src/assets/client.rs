use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use moka::future::Cache;
use serde::Deserialize;

use crate::assets::catalog::{AssetCatalog, AssetInfo};
use crate::config::MetadataSettings;

/// Wire shape of one asset entry from the metadata service.
#[derive(Debug, Deserialize)]
struct AssetEntry {
    symbol: String,
    name: String,
    #[serde(rename = "tokenAddress")]
    token_address: String,
    decimals: u8,
}

/// Asset-metadata service client.
///
/// The service returns the full per-chain asset configuration in one
/// call; the parsed catalog snapshot is cached with a TTL so the
/// periodic jobs don't refetch it per run.
#[derive(Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    base_url: String,
    catalog_cache: Cache<(), Arc<AssetCatalog>>,
}

impl MetadataClient {
    pub fn new(settings: &MetadataSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("Failed to build metadata HTTP client")?;

        let catalog_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(Duration::from_secs(settings.cache_ttl_secs))
            .build();

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            catalog_cache,
        })
    }

    /// Current catalog snapshot, fetching from the service on cache miss.
    pub async fn catalog(&self) -> Result<Arc<AssetCatalog>> {
        self.catalog_cache
            .try_get_with((), self.fetch_catalog())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to load asset catalog: {}", e))
    }

    async fn fetch_catalog(&self) -> Result<Arc<AssetCatalog>> {
        let url = format!("{}/assets", self.base_url);

        let per_chain: HashMap<String, Vec<AssetEntry>> = self
            .http
            .get(&url)
            .send()
            .await
            .context("Asset metadata request failed")?
            .error_for_status()
            .context("Asset metadata service returned an error status")?
            .json()
            .await
            .context("Failed to decode asset metadata response")?;

        let mut catalog = AssetCatalog::new();
        for (chain, entries) in per_chain {
            for entry in entries {
                catalog.insert(AssetInfo {
                    chain: chain.clone(),
                    symbol: entry.symbol,
                    name: entry.name,
                    token_address: entry.token_address,
                    decimals: entry.decimals,
                });
            }
        }

        info!("Loaded asset catalog ({} assets)", catalog.len());
        Ok(Arc::new(catalog))
    }
}
