mod config;

pub use config::{
    ComparatorSettings, ComparatorSource, MetadataSettings, PostgresSettings, PublisherSettings,
    Settings, StateSettings,
};
