use crate::{
    application::{
        ports::billing_provider::BillingProviderPort,
        use_cases::{
            reconciliation::ReconciliationUseCases,
            subscription_mirror::{
                MirrorUseCases, PaymentRepoTrait, SubscriptionRepoTrait, UserRepoTrait,
            },
        },
    },
    domain::entities::billing_provider::BillingProvider,
    infra::{
        config::{AppConfig, ProviderConfig},
        db::ensure_schema,
        dummy_billing_client::DummyBillingClient,
        error::InfraError,
        http_client::try_build_client,
        postgres_persistence,
        stripe_billing_adapter::StripeBillingAdapter,
    },
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<AppConfig>,
    pub mirror: Arc<MirrorUseCases>,
    pub reconciliation: Arc<ReconciliationUseCases>,
}

/// Connect to the store, make sure the schema exists and wire the use cases.
pub async fn init_app_context(config: AppConfig) -> anyhow::Result<AppContext> {
    let postgres_arc = Arc::new(postgres_persistence(&config).await?);
    ensure_schema(postgres_arc.pool()).await?;

    let provider = build_provider(&config.provider)?;

    let user_repo_arc = postgres_arc.clone() as Arc<dyn UserRepoTrait>;
    let subscription_repo_arc = postgres_arc.clone() as Arc<dyn SubscriptionRepoTrait>;
    let payment_repo_arc = postgres_arc.clone() as Arc<dyn PaymentRepoTrait>;

    let mirror = MirrorUseCases::new(
        provider.clone(),
        user_repo_arc,
        subscription_repo_arc.clone(),
        payment_repo_arc,
    );
    let reconciliation = ReconciliationUseCases::new(provider, subscription_repo_arc);

    Ok(AppContext {
        config: Arc::new(config),
        mirror: Arc::new(mirror),
        reconciliation: Arc::new(reconciliation),
    })
}

/// Build the billing provider selected by `BILLING_PROVIDER`.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn BillingProviderPort>, InfraError> {
    let provider: Arc<dyn BillingProviderPort> = match config.billing_provider {
        BillingProvider::Stripe => {
            let http =
                try_build_client(config.provider_timeout).map_err(InfraError::HttpClient)?;
            Arc::new(StripeBillingAdapter::new(
                http,
                config.stripe_key.clone(),
                config.stripe_api_base.clone(),
            ))
        }
        BillingProvider::Dummy => Arc::new(DummyBillingClient::new()),
    };

    tracing::info!(
        provider = provider.provider().display_name(),
        remote = provider.provider().is_remote(),
        "Billing provider ready"
    );
    Ok(provider)
}

pub fn init_tracing(log_file: Option<&str>) -> Result<(), InfraError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "subscription_mirror=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don’t show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs), only when LOG_FILE is set
    let json_layer = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|source| InfraError::LogFile {
                path: path.to_string(),
                source,
            })?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(true)
                    .with_span_list(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    Ok(())
}
