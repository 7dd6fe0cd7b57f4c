use std::process::ExitCode;

use dotenvy::dotenv;

use subscription_mirror::infra::{
    config::AppConfig,
    setup::{init_app_context, init_tracing},
};

/// Print mirror drift as JSON. Exits with 1 when any drift was found.
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(config.log_file.as_deref())?;

    let ctx = init_app_context(config).await?;
    let report = ctx.reconciliation.diff_subscriptions().await?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
