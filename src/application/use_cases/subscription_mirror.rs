use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{error, info, instrument, warn};

use crate::{
    app_error::{AppError, AppResult, ProviderError, ProviderErrorKind},
    application::{
        ports::billing_provider::{BillingProviderPort, CustomerId, PriceId, SubscriptionId},
        validators::{
            MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PROVIDER_ID_LEN, is_valid_display_name,
            is_valid_email, is_valid_price_id,
        },
    },
    domain::entities::{
        payment::Payment,
        subscription::{Subscription, SubscriptionStatus},
        user::User,
    },
};

// ============================================================================
// Inputs
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub name: String,
    pub email: String,
    pub stripe_id: String,
}

#[derive(Debug, Clone)]
pub struct CreateSubscriptionInput {
    pub user_id: i32,
    pub stripe_sub_id: String,
    pub plan_id: String,
    pub status: SubscriptionStatus,
    pub start_date: NaiveDateTime,
    pub next_billing_day: NaiveDateTime,
}

// ============================================================================
// Repository Traits
// ============================================================================

#[async_trait]
pub trait UserRepoTrait: Send + Sync {
    async fn create(&self, input: &CreateUserInput) -> AppResult<User>;
    async fn get_by_id(&self, id: i32) -> AppResult<Option<User>>;
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

#[async_trait]
pub trait SubscriptionRepoTrait: Send + Sync {
    async fn create(&self, input: &CreateSubscriptionInput) -> AppResult<Subscription>;
    async fn get_by_id(&self, id: i32) -> AppResult<Option<Subscription>>;
    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<Subscription>>;
    async fn list_all(&self) -> AppResult<Vec<Subscription>>;
    /// Set status to canceled. An existing cancel_date is kept, so repeating
    /// the call does not move the timestamp.
    async fn mark_canceled(&self, id: i32, canceled_at: NaiveDateTime)
    -> AppResult<Subscription>;
}

#[async_trait]
pub trait PaymentRepoTrait: Send + Sync {
    async fn list_by_subscription(&self, subscription_id: i32) -> AppResult<Vec<Payment>>;
}

// ============================================================================
// Use Cases
// ============================================================================

/// Keeps local users and subscriptions in lockstep with the billing provider.
///
/// Each mutating operation is one provider call followed by at most one local
/// write. Local rows are only written after the provider call succeeded; no
/// compensation is attempted when the local write fails afterwards; the
/// returned `Persistence` error carries the orphaned provider id instead.
#[derive(Clone)]
pub struct MirrorUseCases {
    provider: Arc<dyn BillingProviderPort>,
    user_repo: Arc<dyn UserRepoTrait>,
    subscription_repo: Arc<dyn SubscriptionRepoTrait>,
    payment_repo: Arc<dyn PaymentRepoTrait>,
}

impl MirrorUseCases {
    pub fn new(
        provider: Arc<dyn BillingProviderPort>,
        user_repo: Arc<dyn UserRepoTrait>,
        subscription_repo: Arc<dyn SubscriptionRepoTrait>,
        payment_repo: Arc<dyn PaymentRepoTrait>,
    ) -> Self {
        Self {
            provider,
            user_repo,
            subscription_repo,
            payment_repo,
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a provider customer, then mirror it as a local user.
    #[instrument(skip(self))]
    pub async fn create_user(&self, name: &str, email: &str) -> AppResult<User> {
        let name = name.trim();
        let email = email.trim();

        if name.is_empty() {
            return Err(AppError::InvalidInput("Name must not be empty".into()));
        }
        if !is_valid_display_name(name) {
            return Err(AppError::InvalidInput(format!(
                "Name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        if !is_valid_email(email) {
            return Err(AppError::InvalidInput(format!(
                "Invalid email address (at most {} characters)",
                MAX_EMAIL_LEN
            )));
        }

        let customer = self
            .provider
            .create_customer(name, email)
            .await
            .inspect_err(|e| warn!(error = %e, "Provider rejected customer creation"))?;

        let input = CreateUserInput {
            name: name.to_string(),
            email: email.to_string(),
            stripe_id: customer.as_str().to_string(),
        };

        let user = self.user_repo.create(&input).await.map_err(|e| {
            error!(
                stripe_id = %customer,
                error = %e,
                "Provider customer created but local insert failed; customer is orphaned"
            );
            e.orphaning(customer.as_str())
        })?;

        info!(user_id = user.id, stripe_id = %user.stripe_id, "User mirrored");
        Ok(user)
    }

    /// Subscribe an existing user to `price_id`, then mirror the subscription.
    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub async fn create_subscription(&self, user: &User, price_id: &str) -> AppResult<Subscription> {
        let price_id = price_id.trim();
        if price_id.is_empty() {
            return Err(AppError::InvalidInput("Price id must not be empty".into()));
        }
        if !is_valid_price_id(price_id) {
            return Err(AppError::InvalidInput(format!(
                "Price id must be at most {} characters",
                MAX_PROVIDER_ID_LEN
            )));
        }

        // The stored row is what the foreign key will check against.
        let owner = self
            .user_repo
            .get_by_id(user.id)
            .await?
            .ok_or(AppError::NotFound)?;

        let remote = self
            .provider
            .create_subscription(
                &CustomerId::new(&owner.stripe_id),
                &PriceId::new(price_id),
            )
            .await
            .inspect_err(|e| warn!(error = %e, "Provider rejected subscription creation"))?;

        let stripe_sub_id = remote.subscription_id.as_str();

        let next_billing_day = unix_to_naive(remote.current_period_end).ok_or_else(|| {
            error!(
                stripe_sub_id,
                period_end = remote.current_period_end,
                "Provider period end out of range; subscription is orphaned"
            );
            AppError::persistence(format!(
                "Provider period end {} is not a valid timestamp",
                remote.current_period_end
            ))
            .orphaning(stripe_sub_id)
        })?;

        let plan_id = if remote.price_id.as_str().is_empty() {
            price_id.to_string()
        } else {
            remote.price_id.as_str().to_string()
        };

        let input = CreateSubscriptionInput {
            user_id: owner.id,
            stripe_sub_id: stripe_sub_id.to_string(),
            plan_id,
            status: remote.status.clone(),
            start_date: Utc::now().naive_utc(),
            next_billing_day,
        };

        let subscription = self.subscription_repo.create(&input).await.map_err(|e| {
            error!(
                stripe_sub_id,
                error = %e,
                "Provider subscription created but local insert failed; subscription is orphaned"
            );
            e.orphaning(stripe_sub_id)
        })?;

        info!(
            subscription_id = subscription.id,
            stripe_sub_id,
            status = %subscription.status,
            "Subscription mirrored"
        );
        Ok(subscription)
    }

    /// Cancel a subscription at the provider, then record the cancellation.
    ///
    /// A subscription already recorded as canceled is returned as-is without
    /// contacting the provider. A provider that refuses to cancel because the
    /// subscription is already canceled there counts as success.
    #[instrument(skip(self))]
    pub async fn cancel_subscription(&self, subscription_id: i32) -> AppResult<Subscription> {
        let local = self
            .subscription_repo
            .get_by_id(subscription_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if local.is_canceled() {
            info!(stripe_sub_id = %local.stripe_sub_id, "Subscription already canceled");
            return Ok(local);
        }

        let remote_id = SubscriptionId::new(&local.stripe_sub_id);
        let remote_status = match self.provider.cancel_subscription(&remote_id).await {
            Ok(status) => status,
            Err(err) => self
                .confirm_remote_canceled(&remote_id, err)
                .await
                .inspect_err(|e| {
                    warn!(
                        stripe_sub_id = %local.stripe_sub_id,
                        error = %e,
                        "Provider cancel failed; local row left untouched"
                    )
                })?,
        };

        if !remote_status.is_canceled() {
            warn!(
                stripe_sub_id = %local.stripe_sub_id,
                remote_status = %remote_status,
                "Provider accepted cancel but reported a different status"
            );
        }

        let canceled = self
            .subscription_repo
            .mark_canceled(subscription_id, Utc::now().naive_utc())
            .await
            .map_err(|e| {
                error!(
                    stripe_sub_id = %local.stripe_sub_id,
                    error = %e,
                    "Provider canceled subscription but local update failed"
                );
                e.orphaning(&local.stripe_sub_id)
            })?;

        info!(stripe_sub_id = %canceled.stripe_sub_id, "Subscription canceled");
        Ok(canceled)
    }

    /// Turn a rejected cancel into success when the provider already reports
    /// the subscription as canceled. Otherwise the original error stands.
    async fn confirm_remote_canceled(
        &self,
        remote_id: &SubscriptionId,
        err: ProviderError,
    ) -> Result<SubscriptionStatus, ProviderError> {
        if !matches!(
            err.kind,
            ProviderErrorKind::InvalidRequest | ProviderErrorKind::NotFound
        ) {
            return Err(err);
        }
        match self.provider.get_subscription(remote_id).await {
            Ok(Some(remote)) if remote.status.is_canceled() => {
                info!(stripe_sub_id = %remote_id, "Subscription already canceled at provider");
                Ok(SubscriptionStatus::Canceled)
            }
            _ => Err(err),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<User> {
        self.user_repo
            .get_by_email(email.trim())
            .await?
            .ok_or(AppError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn get_subscription(&self, subscription_id: i32) -> AppResult<Subscription> {
        self.subscription_repo
            .get_by_id(subscription_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    #[instrument(skip(self))]
    pub async fn list_user_subscriptions(&self, user_id: i32) -> AppResult<Vec<Subscription>> {
        if self.user_repo.get_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        self.subscription_repo.list_by_user(user_id).await
    }

    #[instrument(skip(self))]
    pub async fn list_subscription_payments(&self, subscription_id: i32) -> AppResult<Vec<Payment>> {
        if self.subscription_repo.get_by_id(subscription_id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        self.payment_repo.list_by_subscription(subscription_id).await
    }
}

/// Convert provider unix seconds to the naive UTC timestamps the store uses
pub(crate) fn unix_to_naive(ts: i64) -> Option<NaiveDateTime> {
    DateTime::<Utc>::from_timestamp(ts, 0).map(|dt| dt.naive_utc())
}
