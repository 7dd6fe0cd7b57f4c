use dotenvy::dotenv;
use env_helpers::{get_env, get_env_default};
use tracing::{error, info};

use subscription_mirror::infra::{
    config::AppConfig,
    setup::{init_app_context, init_tracing},
};

/// Walk one customer through the whole lifecycle: create, subscribe, cancel.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(config.log_file.as_deref())?;

    let name: String = get_env_default("DEMO_NAME", String::from("Jane Doe"));
    let email: String = get_env_default("DEMO_EMAIL", String::from("jane@example.com"));
    let price_id: String = get_env("DEMO_PRICE_ID");

    let ctx = init_app_context(config).await?;
    let mirror = &ctx.mirror;

    let user = mirror.create_user(&name, &email).await.inspect_err(|e| {
        error!(
            error = %e,
            code = e.code().as_str(),
            orphaned = ?e.orphaned_provider_id(),
            "Create user failed"
        );
    })?;

    let subscription = mirror
        .create_subscription(&user, &price_id)
        .await
        .inspect_err(|e| {
            error!(
                error = %e,
                code = e.code().as_str(),
                orphaned = ?e.orphaned_provider_id(),
                "Create subscription failed"
            );
        })?;

    println!("User created: {}", user.name);
    println!(
        "Subscription created, next billing on: {}",
        subscription.next_billing_day
    );

    let canceled = mirror
        .cancel_subscription(subscription.id)
        .await
        .inspect_err(|e| {
            error!(error = %e, code = e.code().as_str(), "Cancel subscription failed");
        })?;

    info!(
        subscription_id = canceled.id,
        status = %canceled.status,
        "Demo finished"
    );
    Ok(())
}
