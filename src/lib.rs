pub mod assets;
pub mod compare;
pub mod config;
pub mod cron;
pub mod db;
pub mod metrics;
pub mod publish;
pub mod state;
pub mod utils;

pub use assets::{AssetCatalog, MetadataClient};
pub use compare::FeeComparator;
pub use config::Settings;
pub use cron::{CronScheduler, CronSettings, JobContext};
pub use db::Database;
pub use publish::Publisher;
pub use state::StateStore;
