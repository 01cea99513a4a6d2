use std::sync::Arc;

use crate::config::Settings;

pub mod models;
pub mod postgres;

pub use postgres::PostgresClient;

/// Database handle for the external order store.
///
/// PostgreSQL only: order rows are owned by the swap backend and are
/// strictly read-only to this service.
#[derive(Clone)]
pub struct Database {
    pub postgres: Arc<PostgresClient>,
}

impl Database {
    pub async fn new(settings: Arc<Settings>) -> anyhow::Result<Self> {
        let postgres = PostgresClient::new(settings.postgres.clone()).await?;

        Ok(Self {
            postgres: Arc::new(postgres),
        })
    }
}
