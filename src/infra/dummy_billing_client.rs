use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    app_error::{ProviderError, ProviderErrorKind},
    application::ports::billing_provider::{
        BillingInterval, BillingProviderPort, CustomerId, PriceId, ProductId,
        ProviderSubscription, RecurringPrice, SubscriptionId,
    },
    domain::entities::{billing_provider::BillingProvider, subscription::SubscriptionStatus},
};

/// Dummy billing client for running the drivers without a provider account.
///
/// Everything lives in process memory and is lost on exit. Prices created
/// here bill on their own interval; any other price id bills every 30 days.
#[derive(Default)]
pub struct DummyBillingClient {
    sequence: AtomicU64,
    prices: Mutex<HashMap<String, RecurringPrice>>,
    subscriptions: Mutex<HashMap<String, ProviderSubscription>>,
}

impl DummyBillingClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("dummy_{}_{}", prefix, n)
    }

    /// Calculate the end of the first billing period
    fn calculate_period_end(&self, price: &PriceId, start: DateTime<Utc>) -> DateTime<Utc> {
        let interval = self
            .prices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(price.as_str())
            .map(|p| p.interval);

        match interval {
            Some(BillingInterval::Day) => start + Duration::days(1),
            Some(BillingInterval::Week) => start + Duration::weeks(1),
            Some(BillingInterval::Year) => start + Duration::days(365),
            Some(BillingInterval::Month) | None => start + Duration::days(30),
        }
    }
}

#[async_trait]
impl BillingProviderPort for DummyBillingClient {
    fn provider(&self) -> BillingProvider {
        BillingProvider::Dummy
    }

    async fn create_customer(&self, name: &str, email: &str) -> Result<CustomerId, ProviderError> {
        let customer_id = CustomerId::new(self.next_id("cus"));
        tracing::debug!(
            customer_id = %customer_id,
            name = %name,
            email = %email,
            "Dummy: Created customer"
        );
        Ok(customer_id)
    }

    async fn create_subscription(
        &self,
        customer: &CustomerId,
        price: &PriceId,
    ) -> Result<ProviderSubscription, ProviderError> {
        let period_end = self.calculate_period_end(price, Utc::now());
        let subscription = ProviderSubscription {
            subscription_id: SubscriptionId::new(self.next_id("sub")),
            customer_id: customer.clone(),
            status: SubscriptionStatus::Active,
            current_period_end: period_end.timestamp(),
            price_id: price.clone(),
        };

        tracing::debug!(
            subscription_id = %subscription.subscription_id,
            customer_id = %customer,
            price_id = %price,
            "Dummy: Started subscription"
        );

        self.subscriptions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(
                subscription.subscription_id.as_str().to_string(),
                subscription.clone(),
            );
        Ok(subscription)
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<SubscriptionStatus, ProviderError> {
        let mut subscriptions = self.subscriptions.lock().unwrap_or_else(|e| e.into_inner());
        let subscription = subscriptions.get_mut(subscription_id.as_str()).ok_or_else(|| {
            ProviderError::new(
                ProviderErrorKind::NotFound,
                format!("No such subscription: '{}'", subscription_id),
            )
            .with_code(Some("resource_missing".to_string()))
        })?;

        subscription.status = SubscriptionStatus::Canceled;
        tracing::debug!(subscription_id = %subscription_id, "Dummy: Canceled subscription");
        Ok(SubscriptionStatus::Canceled)
    }

    async fn get_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Option<ProviderSubscription>, ProviderError> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(subscription_id.as_str())
            .cloned())
    }

    async fn create_product(
        &self,
        name: &str,
        _description: Option<&str>,
    ) -> Result<ProductId, ProviderError> {
        let product_id = ProductId::new(self.next_id("prod"));
        tracing::debug!(product_id = %product_id, name = %name, "Dummy: Created product");
        Ok(product_id)
    }

    async fn create_price(
        &self,
        product: &ProductId,
        price: &RecurringPrice,
    ) -> Result<PriceId, ProviderError> {
        let price_id = PriceId::new(self.next_id("price"));
        tracing::debug!(
            price_id = %price_id,
            product_id = %product,
            unit_amount = price.unit_amount,
            currency = %price.currency,
            interval = %price.interval,
            "Dummy: Created price"
        );
        self.prices
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(price_id.as_str().to_string(), price.clone());
        Ok(price_id)
    }
}
