use anyhow::anyhow;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// One configured asset on a chain, as reported by the metadata service.
#[derive(Debug, Clone)]
pub struct AssetInfo {
    pub chain: String,
    pub symbol: String,
    pub name: String,
    pub token_address: String,
    pub decimals: u8,
}

impl AssetInfo {
    /// `SYMBOL (Name)` label used for the top-asset-pair ranking.
    pub fn label(&self) -> String {
        format!("{} ({})", self.symbol, self.name)
    }
}

/// Display names for well-known chain identifiers.
static CHAIN_DISPLAY_NAMES: Lazy<FxHashMap<&'static str, &'static str>> = Lazy::new(|| {
    FxHashMap::from_iter([
        ("ethereum", "Ethereum"),
        ("bitcoin", "Bitcoin"),
        ("arbitrum", "Arbitrum"),
        ("base", "Base"),
        ("optimism", "Optimism"),
        ("polygon", "Polygon"),
        ("avalanche", "Avalanche"),
        ("bnb", "BNB Chain"),
        ("solana", "Solana"),
        ("starknet", "Starknet"),
        ("hyperliquid", "Hyperliquid"),
    ])
});

/// In-memory snapshot of the asset-metadata service response.
///
/// Assets are addressable by `(chain, token_address)` and by
/// `(chain, symbol)`, both lower-cased. The snapshot may be stale or
/// incomplete; a lookup miss is an error, never a silent zero.
#[derive(Debug, Default)]
pub struct AssetCatalog {
    assets: FxHashMap<(String, String), usize>,
    entries: Vec<AssetInfo>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: AssetInfo) {
        let chain = asset.chain.to_lowercase();
        let by_address = asset.token_address.to_lowercase();
        let by_symbol = asset.symbol.to_lowercase();

        let idx = self.entries.len();
        self.entries.push(asset);

        self.assets.insert((chain.clone(), by_address), idx);
        self.assets.insert((chain, by_symbol), idx);
    }

    /// Number of distinct assets in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve an asset by chain and identifier (token address or symbol).
    ///
    /// Missing asset or chain is an error: decimals must never default
    /// to zero silently.
    pub fn resolve(&self, chain: &str, asset: &str) -> anyhow::Result<&AssetInfo> {
        let key = (chain.to_lowercase(), asset.to_lowercase());
        self.assets
            .get(&key)
            .map(|idx| &self.entries[*idx])
            .ok_or_else(|| anyhow!("Asset {} not configured on chain {}", asset, chain))
    }

    /// Human-readable chain name, if one is known for the identifier.
    pub fn chain_display_name(chain: &str) -> Option<&'static str> {
        CHAIN_DISPLAY_NAMES.get(chain.to_lowercase().as_str()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wbtc() -> AssetInfo {
        AssetInfo {
            chain: "ethereum".to_string(),
            symbol: "WBTC".to_string(),
            name: "Wrapped Bitcoin".to_string(),
            token_address: "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599".to_string(),
            decimals: 8,
        }
    }

    #[test]
    fn test_resolve_by_address_and_symbol() {
        let mut catalog = AssetCatalog::new();
        catalog.insert(wbtc());

        let by_addr = catalog
            .resolve("Ethereum", "0x2260fac5e5542a773aa44fbcfedf7c193bc2c599")
            .unwrap();
        assert_eq!(by_addr.decimals, 8);

        let by_symbol = catalog.resolve("ethereum", "wbtc").unwrap();
        assert_eq!(by_symbol.label(), "WBTC (Wrapped Bitcoin)");
    }

    #[test]
    fn test_resolve_miss_is_error() {
        let mut catalog = AssetCatalog::new();
        catalog.insert(wbtc());

        assert!(catalog.resolve("ethereum", "usdc").is_err());
        assert!(catalog.resolve("arbitrum", "wbtc").is_err());
        assert!(AssetCatalog::new().resolve("ethereum", "wbtc").is_err());
    }

    #[test]
    fn test_chain_display_name() {
        assert_eq!(AssetCatalog::chain_display_name("Ethereum"), Some("Ethereum"));
        assert_eq!(AssetCatalog::chain_display_name("bnb"), Some("BNB Chain"));
        assert_eq!(AssetCatalog::chain_display_name("made-up-chain"), None);
    }
}
