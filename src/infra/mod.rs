use crate::{
    adapters::persistence::PostgresPersistence,
    infra::{config::AppConfig, db::init_db},
};

pub mod config;
pub mod db;
pub mod dummy_billing_client;
pub mod error;
pub mod http_client;
pub mod setup;
pub mod stripe_billing_adapter;
pub mod stripe_client;

pub async fn postgres_persistence(config: &AppConfig) -> anyhow::Result<PostgresPersistence> {
    let pool = init_db(&config.database_url, config.database_max_connections).await?;
    let persistence = PostgresPersistence::new(pool);
    Ok(persistence)
}
