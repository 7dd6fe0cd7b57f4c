//! In-memory mock implementations for the mirror repository traits.
//!
//! They enforce the same constraints the Postgres schema does: unique email,
//! the subscription -> user foreign key, column widths, sequential ids
//! starting at 1.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    app_error::{AppError, AppResult},
    application::{
        use_cases::subscription_mirror::{
            CreateSubscriptionInput, CreateUserInput, PaymentRepoTrait, SubscriptionRepoTrait,
            UserRepoTrait,
        },
        validators::{MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PROVIDER_ID_LEN},
    },
    domain::entities::{
        payment::Payment,
        subscription::{Subscription, SubscriptionStatus},
        user::User,
    },
};

/// VARCHAR(n) check, counted in characters like Postgres does
fn check_width(value: &str, max: usize) -> AppResult<()> {
    if value.chars().count() > max {
        return Err(AppError::persistence("Value too long for column"));
    }
    Ok(())
}

// ============================================================================
// InMemoryUserRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<Vec<User>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    fn exists(&self, id: i32) -> bool {
        self.users.lock().unwrap().iter().any(|u| u.id == id)
    }
}

#[async_trait]
impl UserRepoTrait for InMemoryUserRepo {
    async fn create(&self, input: &CreateUserInput) -> AppResult<User> {
        check_width(&input.name, MAX_NAME_LEN)?;
        check_width(&input.email, MAX_EMAIL_LEN)?;
        check_width(&input.stripe_id, MAX_PROVIDER_ID_LEN)?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == input.email) {
            return Err(AppError::persistence("A record with this value already exists"));
        }

        let user = User {
            id: users.len() as i32 + 1,
            name: input.name.clone(),
            email: input.email.clone(),
            stripe_id: input.stripe_id.clone(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

// ============================================================================
// InMemorySubscriptionRepo
// ============================================================================

pub struct InMemorySubscriptionRepo {
    pub subscriptions: Mutex<Vec<Subscription>>,
    users: Arc<InMemoryUserRepo>,
    fail_writes: AtomicBool,
}

impl InMemorySubscriptionRepo {
    pub fn new(users: Arc<InMemoryUserRepo>) -> Self {
        Self {
            subscriptions: Mutex::new(Vec::new()),
            users,
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make every following write fail as if the database were unreachable
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.subscriptions.lock().unwrap().len()
    }

    fn check_writable(&self) -> AppResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::persistence("Database operation failed"));
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriptionRepoTrait for InMemorySubscriptionRepo {
    async fn create(&self, input: &CreateSubscriptionInput) -> AppResult<Subscription> {
        self.check_writable()?;
        check_width(&input.stripe_sub_id, MAX_PROVIDER_ID_LEN)?;
        check_width(&input.plan_id, MAX_PROVIDER_ID_LEN)?;
        if !self.users.exists(input.user_id) {
            return Err(AppError::persistence("Referenced record does not exist"));
        }

        let mut subscriptions = self.subscriptions.lock().unwrap();
        let subscription = Subscription {
            id: subscriptions.len() as i32 + 1,
            user_id: input.user_id,
            stripe_sub_id: input.stripe_sub_id.clone(),
            plan_id: input.plan_id.clone(),
            status: input.status.clone(),
            start_date: input.start_date,
            cancel_date: None,
            next_billing_day: input.next_billing_day,
        };
        subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Subscription>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<Subscription>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> AppResult<Vec<Subscription>> {
        Ok(self.subscriptions.lock().unwrap().clone())
    }

    async fn mark_canceled(
        &self,
        id: i32,
        canceled_at: NaiveDateTime,
    ) -> AppResult<Subscription> {
        self.check_writable()?;
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let subscription = subscriptions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(AppError::NotFound)?;

        subscription.status = SubscriptionStatus::Canceled;
        subscription.cancel_date.get_or_insert(canceled_at);
        Ok(subscription.clone())
    }
}

// ============================================================================
// InMemoryPaymentRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryPaymentRepo {
    pub payments: Mutex<Vec<Payment>>,
}

impl InMemoryPaymentRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, payment: Payment) {
        self.payments.lock().unwrap().push(payment);
    }
}

#[async_trait]
impl PaymentRepoTrait for InMemoryPaymentRepo {
    async fn list_by_subscription(&self, subscription_id: i32) -> AppResult<Vec<Payment>> {
        let mut payments: Vec<Payment> = self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.subscription_id == subscription_id)
            .cloned()
            .collect();
        payments.sort_by(|a, b| b.payment_date.cmp(&a.payment_date).then(b.id.cmp(&a.id)));
        Ok(payments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_payment, create_test_subscription_input, test_datetime};

    fn user_input(email: &str) -> CreateUserInput {
        CreateUserInput {
            name: "Jane Doe".into(),
            email: email.into(),
            stripe_id: "cus_123".into(),
        }
    }

    #[tokio::test]
    async fn test_subscription_requires_existing_user() {
        let users = Arc::new(InMemoryUserRepo::new());
        let repo = InMemorySubscriptionRepo::new(users.clone());

        let err = repo
            .create(&create_test_subscription_input(1, |_| {}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Persistence { .. }));

        users.create(&user_input("jane@example.com")).await.unwrap();
        let sub = repo
            .create(&create_test_subscription_input(1, |_| {}))
            .await
            .unwrap();
        assert_eq!(sub.id, 1);
    }

    #[tokio::test]
    async fn test_rejects_values_wider_than_columns() {
        let users = Arc::new(InMemoryUserRepo::new());
        let mut input = user_input("jane@example.com");
        input.name = "x".repeat(MAX_NAME_LEN + 1);
        let err = users.create(&input).await.unwrap_err();
        assert!(matches!(err, AppError::Persistence { .. }));
        assert_eq!(users.count(), 0);

        users.create(&user_input("jane@example.com")).await.unwrap();
        let repo = InMemorySubscriptionRepo::new(users);
        let err = repo
            .create(&create_test_subscription_input(1, |s| {
                s.plan_id = "p".repeat(MAX_PROVIDER_ID_LEN + 1)
            }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Persistence { .. }));
        assert_eq!(repo.count(), 0);
    }

    #[tokio::test]
    async fn test_mark_canceled_keeps_first_cancel_date() {
        let users = Arc::new(InMemoryUserRepo::new());
        users.create(&user_input("jane@example.com")).await.unwrap();
        let repo = InMemorySubscriptionRepo::new(users);
        let sub = repo
            .create(&create_test_subscription_input(1, |_| {}))
            .await
            .unwrap();

        let first = test_datetime();
        let later = first + chrono::Duration::hours(1);
        repo.mark_canceled(sub.id, first).await.unwrap();
        let again = repo.mark_canceled(sub.id, later).await.unwrap();

        assert_eq!(again.cancel_date, Some(first));
        assert!(again.is_canceled());
    }

    #[tokio::test]
    async fn test_payments_newest_first() {
        let repo = InMemoryPaymentRepo::new();
        repo.insert(create_test_payment(1, |p| p.id = 1));
        repo.insert(create_test_payment(1, |p| {
            p.id = 2;
            p.payment_date = test_datetime() + chrono::Duration::days(30);
        }));

        let payments = repo.list_by_subscription(1).await.unwrap();
        assert_eq!(payments.iter().map(|p| p.id).collect::<Vec<_>>(), vec![2, 1]);
    }
}
