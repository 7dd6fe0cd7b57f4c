use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::app_error::{ProviderError, ProviderErrorKind};

pub type StripeResult<T> = Result<T, ProviderError>;

/// Thin form-encoded client for the subset of the Stripe API the mirror uses.
#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    secret_key: SecretString,
    api_base: String,
}

impl StripeClient {
    pub fn new(client: Client, secret_key: SecretString, api_base: impl Into<String>) -> Self {
        Self {
            client,
            secret_key,
            api_base: api_base.into(),
        }
    }

    fn auth_header(&self) -> String {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:", self.secret_key.expose_secret()));
        format!("Basic {}", encoded)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    // ========================================================================
    // Products
    // ========================================================================

    pub async fn create_product(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> StripeResult<StripeProduct> {
        let mut params: Vec<(&str, String)> = vec![("name", name.to_string())];
        if let Some(desc) = description {
            params.push(("description", desc.to_string()));
        }

        let response = self
            .client
            .post(self.url("products"))
            .header("Authorization", self.auth_header())
            .form(&params)
            .send()
            .await
            .map_err(request_failed)?;

        self.handle_response(response).await
    }

    // ========================================================================
    // Prices
    // ========================================================================

    pub async fn create_price(
        &self,
        product_id: &str,
        unit_amount: i64,
        currency: &str,
        interval: &str,
    ) -> StripeResult<StripePrice> {
        let params: Vec<(&str, String)> = vec![
            ("product", product_id.to_string()),
            ("unit_amount", unit_amount.to_string()),
            ("currency", currency.to_lowercase()),
            ("recurring[interval]", interval.to_string()),
        ];

        let response = self
            .client
            .post(self.url("prices"))
            .header("Authorization", self.auth_header())
            .form(&params)
            .send()
            .await
            .map_err(request_failed)?;

        self.handle_response(response).await
    }

    // ========================================================================
    // Customers
    // ========================================================================

    pub async fn create_customer(&self, name: &str, email: &str) -> StripeResult<StripeCustomer> {
        let params = [("name", name), ("email", email)];

        let response = self
            .client
            .post(self.url("customers"))
            .header("Authorization", self.auth_header())
            .form(&params)
            .send()
            .await
            .map_err(request_failed)?;

        self.handle_response(response).await
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    pub async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
    ) -> StripeResult<StripeSubscription> {
        let params = subscription_params(customer_id, price_id);

        let response = self
            .client
            .post(self.url("subscriptions"))
            .header("Authorization", self.auth_header())
            .form(&params)
            .send()
            .await
            .map_err(request_failed)?;

        self.handle_response(response).await
    }

    pub async fn get_subscription(&self, subscription_id: &str) -> StripeResult<StripeSubscription> {
        let response = self
            .client
            .get(self.url(&format!("subscriptions/{}", subscription_id)))
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(request_failed)?;

        self.handle_response(response).await
    }

    /// Cancel immediately (not at period end)
    pub async fn cancel_subscription(
        &self,
        subscription_id: &str,
    ) -> StripeResult<StripeSubscription> {
        let response = self
            .client
            .delete(self.url(&format!("subscriptions/{}", subscription_id)))
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(request_failed)?;

        self.handle_response(response).await
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> StripeResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Stripe API error");
            return Err(error_from_response(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(body = %body, error = %e, "Failed to parse Stripe response");
            ProviderError::new(
                ProviderErrorKind::Api,
                format!("Failed to parse Stripe response: {}", e),
            )
        })
    }
}

fn request_failed(e: reqwest::Error) -> ProviderError {
    ProviderError::network(format!("Stripe request failed: {}", e))
}

fn subscription_params(customer_id: &str, price_id: &str) -> Vec<(&'static str, String)> {
    vec![
        ("customer", customer_id.to_string()),
        ("items[0][price]", price_id.to_string()),
    ]
}

/// Map a non-success Stripe response to a provider error, keeping Stripe's
/// own error code when the body carries one.
fn error_from_response(status: StatusCode, body: &str) -> ProviderError {
    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderErrorKind::Authentication,
        StatusCode::BAD_REQUEST | StatusCode::PAYMENT_REQUIRED => ProviderErrorKind::InvalidRequest,
        StatusCode::NOT_FOUND => ProviderErrorKind::NotFound,
        StatusCode::TOO_MANY_REQUESTS => ProviderErrorKind::RateLimited,
        _ => ProviderErrorKind::Api,
    };

    match serde_json::from_str::<StripeErrorResponse>(body) {
        Ok(parsed) => {
            let message = parsed
                .error
                .message
                .unwrap_or_else(|| parsed.error.error_type.clone());
            // Stripe answers 400 with code=resource_missing for unknown ids
            let kind = match parsed.error.code.as_deref() {
                Some("resource_missing") => ProviderErrorKind::NotFound,
                _ => kind,
            };
            ProviderError::new(kind, message).with_code(parsed.error.code)
        }
        Err(_) => ProviderError::new(kind, format!("Stripe API error: {} - {}", status, body)),
    }
}

// ============================================================================
// Stripe Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StripeProduct {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StripePrice {
    pub id: String,
    pub product: String,
    pub unit_amount: Option<i64>,
    pub currency: String,
    pub recurring: Option<StripePriceRecurring>,
}

#[derive(Debug, Deserialize)]
pub struct StripePriceRecurring {
    pub interval: String,
    pub interval_count: i32,
}

#[derive(Debug, Deserialize)]
pub struct StripeCustomer {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StripeSubscription {
    pub id: String,
    pub customer: String,
    pub status: String,
    /// Present on API versions before 2025-03-31; newer versions report it per item
    #[serde(default)]
    pub current_period_end: Option<i64>,
    pub items: StripeSubscriptionItems,
}

impl StripeSubscription {
    /// Get the first price ID from the subscription items
    pub fn price_id(&self) -> String {
        self.items
            .data
            .first()
            .map(|item| item.price.id.clone())
            .unwrap_or_default()
    }

    /// End of the current period, from the subscription or its first item
    pub fn period_end(&self) -> Option<i64> {
        self.current_period_end.or_else(|| {
            self.items
                .data
                .first()
                .and_then(|item| item.current_period_end)
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StripeSubscriptionItems {
    pub data: Vec<StripeSubscriptionItem>,
}

#[derive(Debug, Deserialize)]
pub struct StripeSubscriptionItem {
    pub id: String,
    pub price: StripePrice,
    #[serde(default)]
    pub current_period_end: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeError,
}

#[derive(Debug, Deserialize)]
pub struct StripeError {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: Option<String>,
    pub code: Option<String>,
}
