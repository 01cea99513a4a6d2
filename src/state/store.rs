//! On-disk bot state.
//!
//! Replaces the process-wide globals the bot accumulated over time
//! (processed-order sets, in-memory post logs) with one explicit store:
//! loaded once at startup, mutated in memory, persisted after each
//! mutation. Files are plain JSON under the configured state directory.
//!
//! The metrics snapshot saved here is a best-effort fallback cache only;
//! metrics are always recomputed fresh from the order store.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

use crate::metrics::SwapMetrics;

const PROCESSED_FILE: &str = "processed_orders.json";
const POST_LOG_FILE: &str = "post_log.json";
const METRICS_FILE: &str = "last_metrics.json";

/// Keep only the most recent entries in the post log.
const POST_LOG_CAP: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostLogEntry {
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct StateStore {
    dir: PathBuf,
    processed_order_ids: HashSet<String>,
    post_log: Vec<PostLogEntry>,
}

impl StateStore {
    /// Load state from `dir`, creating it if needed. Missing files mean
    /// an empty store; unreadable files are an error, not a reset.
    pub async fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create state dir {}", dir.display()))?;

        let processed_order_ids: HashSet<String> =
            read_json_or_default(&dir.join(PROCESSED_FILE)).await?;
        let post_log: Vec<PostLogEntry> = read_json_or_default(&dir.join(POST_LOG_FILE)).await?;

        info!(
            "Loaded state: {} processed orders, {} logged posts",
            processed_order_ids.len(),
            post_log.len()
        );

        Ok(Self {
            dir,
            processed_order_ids,
            post_log,
        })
    }

    pub fn is_processed(&self, order_id: &str) -> bool {
        self.processed_order_ids.contains(order_id)
    }

    pub fn mark_processed(&mut self, order_id: impl Into<String>) {
        self.processed_order_ids.insert(order_id.into());
    }

    pub fn record_post(&mut self, text: impl Into<String>) {
        self.post_log.push(PostLogEntry {
            text: text.into(),
            posted_at: Utc::now(),
        });
        if self.post_log.len() > POST_LOG_CAP {
            let drop = self.post_log.len() - POST_LOG_CAP;
            self.post_log.drain(..drop);
        }
    }

    pub fn post_log(&self) -> &[PostLogEntry] {
        &self.post_log
    }

    /// Persist processed ids and the post log.
    pub async fn persist(&self) -> Result<()> {
        write_json(&self.dir.join(PROCESSED_FILE), &self.processed_order_ids).await?;
        write_json(&self.dir.join(POST_LOG_FILE), &self.post_log).await?;
        Ok(())
    }

    /// Write the fallback metrics snapshot.
    pub async fn save_metrics_snapshot(&self, metrics: &SwapMetrics) -> Result<()> {
        write_json(&self.dir.join(METRICS_FILE), metrics).await
    }

    /// Read back the fallback metrics snapshot, if one was ever written.
    pub async fn load_metrics_snapshot(&self) -> Result<Option<SwapMetrics>> {
        let path = self.dir.join(METRICS_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let metrics = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(metrics))
    }
}

async fn read_json_or_default<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write via temp file + rename so a crash mid-write never truncates
/// existing state.
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("Failed to serialize state")?;
    let tmp = path.with_extension("json.tmp");

    tokio::fs::write(&tmp, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}
