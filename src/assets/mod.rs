mod catalog;
mod client;

pub use catalog::{AssetCatalog, AssetInfo};
pub use client::MetadataClient;
