use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    app_error::{AppError, AppResult},
    application::{
        ports::billing_provider::{
            BillingInterval, BillingProviderPort, PriceId, ProductId, RecurringPrice,
        },
        validators::is_valid_currency,
    },
};

/// Parameters for a recurring plan (one product with one monthly/yearly/... price)
#[derive(Debug, Clone)]
pub struct CreatePlanInput {
    pub name: String,
    pub description: Option<String>,
    /// Amount in cents
    pub unit_amount: i64,
    pub currency: String,
    pub interval: BillingInterval,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedPlan {
    pub product_id: ProductId,
    pub price_id: PriceId,
}

/// Creates products and prices in the billing provider.
///
/// Nothing is mirrored locally: prices are referenced by id when subscribing.
#[derive(Clone)]
pub struct CatalogUseCases {
    provider: Arc<dyn BillingProviderPort>,
}

impl CatalogUseCases {
    pub fn new(provider: Arc<dyn BillingProviderPort>) -> Self {
        Self { provider }
    }

    #[instrument(skip(self))]
    pub async fn create_recurring_plan(&self, input: &CreatePlanInput) -> AppResult<CreatedPlan> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("Product name must not be empty".into()));
        }
        if input.unit_amount <= 0 {
            return Err(AppError::InvalidInput(
                "Unit amount must be greater than zero".into(),
            ));
        }
        if !is_valid_currency(&input.currency) {
            return Err(AppError::InvalidInput(format!(
                "Invalid currency: {}",
                input.currency
            )));
        }

        let product_id = self
            .provider
            .create_product(name, input.description.as_deref())
            .await?;

        // A failure here leaves the product without a price; it can be reused
        // by id on the next run.
        let price_id = self
            .provider
            .create_price(
                &product_id,
                &RecurringPrice {
                    unit_amount: input.unit_amount,
                    currency: input.currency.to_lowercase(),
                    interval: input.interval,
                },
            )
            .await?;

        info!(%product_id, %price_id, "Recurring plan created");
        Ok(CreatedPlan {
            product_id,
            price_id,
        })
    }
}
