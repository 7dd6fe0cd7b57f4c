use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
    app_error::ProviderError,
    domain::entities::{billing_provider::BillingProvider, subscription::SubscriptionStatus},
};

// ============================================================================
// Port Types - Provider-agnostic identifiers and results
// ============================================================================

macro_rules! provider_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

provider_id!(
    /// Unique identifier for a customer in the billing provider
    CustomerId
);
provider_id!(
    /// Unique identifier for a subscription in the billing provider
    SubscriptionId
);
provider_id!(
    /// Unique identifier for a product in the billing provider
    ProductId
);
provider_id!(
    /// Unique identifier for a recurring price in the billing provider
    PriceId
);

/// Provider view of a subscription.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSubscription {
    pub subscription_id: SubscriptionId,
    pub customer_id: CustomerId,
    pub status: SubscriptionStatus,
    /// End of the current billing period, unix seconds
    pub current_period_end: i64,
    /// Price the provider actually attached (may differ from the requested one
    /// if the provider substitutes)
    pub price_id: PriceId,
}

/// Billing interval of a recurring price
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BillingInterval {
    Day,
    Week,
    Month,
    Year,
}

/// Parameters for a recurring price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringPrice {
    /// Amount in the currency's minor unit (cents)
    pub unit_amount: i64,
    /// Lowercase ISO currency code
    pub currency: String,
    pub interval: BillingInterval,
}

// ============================================================================
// Billing Provider Port
// ============================================================================

/// Billing provider port - the remote system of record for customers,
/// products, prices and subscriptions.
///
/// Every method is a single remote call. Implementations never retry.
#[async_trait]
pub trait BillingProviderPort: Send + Sync {
    /// Get the provider type
    fn provider(&self) -> BillingProvider;

    // ========================================================================
    // Customers
    // ========================================================================

    async fn create_customer(&self, name: &str, email: &str) -> Result<CustomerId, ProviderError>;

    // ========================================================================
    // Subscriptions
    // ========================================================================

    async fn create_subscription(
        &self,
        customer: &CustomerId,
        price: &PriceId,
    ) -> Result<ProviderSubscription, ProviderError>;

    /// Cancel a subscription immediately and return the resulting status.
    ///
    /// Canceling a subscription the provider already reports as canceled
    /// succeeds and returns `Canceled`.
    async fn cancel_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<SubscriptionStatus, ProviderError>;

    /// Fetch the provider's current view of a subscription.
    /// Returns `None` when the provider has no such subscription.
    async fn get_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Option<ProviderSubscription>, ProviderError>;

    // ========================================================================
    // Catalog
    // ========================================================================

    async fn create_product(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<ProductId, ProviderError>;

    async fn create_price(
        &self,
        product: &ProductId,
        price: &RecurringPrice,
    ) -> Result<PriceId, ProviderError>;
}
