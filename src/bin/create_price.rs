use dotenvy::dotenv;
use env_helpers::get_env_default;

use subscription_mirror::{
    application::{
        ports::billing_provider::BillingInterval,
        use_cases::catalog::{CatalogUseCases, CreatePlanInput},
    },
    infra::{
        config::{ProviderConfig, log_file_from_env},
        setup::{build_provider, init_tracing},
    },
};

/// Create the recurring product and price that subscriptions reference.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing(log_file_from_env().as_deref())?;

    let interval: BillingInterval = get_env_default("PLAN_INTERVAL", String::from("month"))
        .parse()
        .map_err(|_| anyhow::anyhow!("PLAN_INTERVAL must be one of: day, week, month, year"))?;

    let input = CreatePlanInput {
        name: get_env_default("PLAN_NAME", String::from("Starter Subscription")),
        description: Some(get_env_default(
            "PLAN_DESCRIPTION",
            String::from("$12/Month subscription"),
        )),
        unit_amount: get_env_default("PLAN_AMOUNT", 1200),
        currency: get_env_default("PLAN_CURRENCY", String::from("usd")),
        interval,
    };

    let provider = build_provider(&ProviderConfig::from_env())?;
    let catalog = CatalogUseCases::new(provider);

    let plan = catalog.create_recurring_plan(&input).await?;

    println!("Success! Product id: {}", plan.product_id);
    println!("Success! Price id: {}", plan.price_id);
    Ok(())
}
