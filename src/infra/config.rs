use std::time::Duration;

use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;

use crate::domain::entities::billing_provider::BillingProvider;

pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Billing provider settings. Loadable on their own for programs that never
/// touch the store.
#[derive(Clone)]
pub struct ProviderConfig {
    pub billing_provider: BillingProvider,
    /// Provider API key. Not validated here: an empty or wrong key surfaces as
    /// an authentication error on the first provider call.
    pub stripe_key: SecretString,
    pub stripe_api_base: String,
    /// Total request timeout for provider calls. None leaves calls unbounded
    /// apart from the connect timeout.
    pub provider_timeout: Option<Duration>,
}

pub struct AppConfig {
    pub provider: ProviderConfig,
    pub database_url: String,
    pub database_max_connections: u32,
    /// Optional path for a JSON log file in addition to console output.
    pub log_file: Option<String>,
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        let billing_provider: BillingProvider =
            get_env_default("BILLING_PROVIDER", String::from("stripe"))
                .parse()
                .expect("BILLING_PROVIDER must be one of: stripe, dummy");

        let stripe_key = SecretString::new(std::env::var("STRIPE_KEY").unwrap_or_default().into());
        let stripe_api_base: String =
            get_env_default("STRIPE_API_BASE", DEFAULT_STRIPE_API_BASE.to_string());

        let provider_timeout = parse_timeout_secs(std::env::var("PROVIDER_TIMEOUT_SECS").ok());

        Self {
            billing_provider,
            stripe_key,
            stripe_api_base: stripe_api_base.trim_end_matches('/').to_string(),
            provider_timeout,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url: String = get_env("DATABASE_URL");
        let database_max_connections: u32 = get_env_default("DATABASE_MAX_CONNECTIONS", 5);

        Self {
            provider: ProviderConfig::from_env(),
            database_url,
            database_max_connections,
            log_file: log_file_from_env(),
        }
    }
}

pub fn log_file_from_env() -> Option<String> {
    std::env::var("LOG_FILE")
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Unset or blank means no timeout; anything else must be whole seconds.
fn parse_timeout_secs(raw: Option<String>) -> Option<Duration> {
    raw.filter(|s| !s.trim().is_empty()).map(|s| {
        let secs: u64 = s
            .trim()
            .parse()
            .expect("PROVIDER_TIMEOUT_SECS must be a valid number");
        Duration::from_secs(secs)
    })
}
