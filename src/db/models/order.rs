use chrono::{DateTime, Utc};

/// One completed cross-chain swap order (PostgreSQL, read-only).
///
/// An order is "successful" only when both legs of the underlying swap
/// carry a non-empty redeem transaction hash; that filter is applied in
/// SQL, so rows materialized into this struct are already successful.
///
/// Amounts are integers in the asset's smallest on-chain unit, kept as
/// text because they routinely exceed i64.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OrderRecord {
    pub create_id: String,

    pub source_chain: String,
    pub source_asset: String,
    pub destination_chain: String,
    pub destination_asset: String,

    pub source_amount: Option<String>,
    pub destination_amount: Option<String>,

    pub input_token_price: Option<f64>,
    pub output_token_price: Option<f64>,

    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    /// Grouping key for the top-chain ranking.
    pub fn chain_key(&self) -> String {
        self.source_chain.to_lowercase()
    }

    /// Grouping key for the top-asset-pair ranking.
    pub fn pair_key(&self) -> String {
        format!(
            "{}:{}",
            self.source_chain.to_lowercase(),
            self.source_asset.to_lowercase()
        )
    }
}
