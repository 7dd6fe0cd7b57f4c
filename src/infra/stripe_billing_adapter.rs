use async_trait::async_trait;
use reqwest::Client;
use secrecy::SecretString;

use crate::{
    app_error::{ProviderError, ProviderErrorKind},
    application::ports::billing_provider::{
        BillingProviderPort, CustomerId, PriceId, ProductId, ProviderSubscription,
        RecurringPrice, SubscriptionId,
    },
    domain::entities::{billing_provider::BillingProvider, subscription::SubscriptionStatus},
    infra::stripe_client::{StripeClient, StripeSubscription},
};

/// Adapter that wraps StripeClient to implement BillingProviderPort.
#[derive(Clone)]
pub struct StripeBillingAdapter {
    client: StripeClient,
}

impl StripeBillingAdapter {
    pub fn new(http: Client, secret_key: SecretString, api_base: impl Into<String>) -> Self {
        Self {
            client: StripeClient::new(http, secret_key, api_base),
        }
    }

    fn to_provider_subscription(
        sub: StripeSubscription,
    ) -> Result<ProviderSubscription, ProviderError> {
        let current_period_end = sub.period_end().ok_or_else(|| {
            ProviderError::new(
                ProviderErrorKind::Api,
                format!("Subscription {} has no current period end", sub.id),
            )
        })?;
        let price_id = PriceId::new(sub.price_id());
        Ok(ProviderSubscription {
            subscription_id: SubscriptionId::new(sub.id),
            customer_id: CustomerId::new(sub.customer),
            status: SubscriptionStatus::from_provider(&sub.status),
            current_period_end,
            price_id,
        })
    }
}

#[async_trait]
impl BillingProviderPort for StripeBillingAdapter {
    fn provider(&self) -> BillingProvider {
        BillingProvider::Stripe
    }

    async fn create_customer(&self, name: &str, email: &str) -> Result<CustomerId, ProviderError> {
        let customer = self.client.create_customer(name, email).await?;
        Ok(CustomerId::new(customer.id))
    }

    async fn create_subscription(
        &self,
        customer: &CustomerId,
        price: &PriceId,
    ) -> Result<ProviderSubscription, ProviderError> {
        let sub = self
            .client
            .create_subscription(customer.as_str(), price.as_str())
            .await?;
        Self::to_provider_subscription(sub)
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<SubscriptionStatus, ProviderError> {
        match self.client.cancel_subscription(subscription_id.as_str()).await {
            Ok(sub) => Ok(SubscriptionStatus::from_provider(&sub.status)),
            // Stripe rejects a DELETE on an already canceled subscription; confirm
            // the remote state before reporting failure.
            Err(err)
                if matches!(
                    err.kind,
                    ProviderErrorKind::InvalidRequest | ProviderErrorKind::NotFound
                ) =>
            {
                match self.client.get_subscription(subscription_id.as_str()).await {
                    Ok(sub) if SubscriptionStatus::from_provider(&sub.status).is_canceled() => {
                        tracing::info!(
                            subscription_id = %subscription_id,
                            "Subscription already canceled at provider"
                        );
                        Ok(SubscriptionStatus::Canceled)
                    }
                    _ => Err(err),
                }
            }
            Err(err) => Err(err),
        }
    }

    async fn get_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Option<ProviderSubscription>, ProviderError> {
        match self.client.get_subscription(subscription_id.as_str()).await {
            Ok(sub) => Self::to_provider_subscription(sub).map(Some),
            Err(err) if err.kind == ProviderErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn create_product(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<ProductId, ProviderError> {
        let product = self.client.create_product(name, description).await?;
        Ok(ProductId::new(product.id))
    }

    async fn create_price(
        &self,
        product: &ProductId,
        price: &RecurringPrice,
    ) -> Result<PriceId, ProviderError> {
        let created = self
            .client
            .create_price(
                product.as_str(),
                price.unit_amount,
                &price.currency,
                price.interval.as_ref(),
            )
            .await?;
        Ok(PriceId::new(created.id))
    }
}
