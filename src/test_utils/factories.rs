//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::{
    application::use_cases::subscription_mirror::CreateSubscriptionInput,
    domain::entities::{payment::Payment, subscription::SubscriptionStatus},
};

/// Create a subscription insert for `user_id` with sensible defaults.
pub fn create_test_subscription_input(
    user_id: i32,
    overrides: impl FnOnce(&mut CreateSubscriptionInput),
) -> CreateSubscriptionInput {
    let mut input = CreateSubscriptionInput {
        user_id,
        stripe_sub_id: "sub_test".to_string(),
        plan_id: "price_test".to_string(),
        status: SubscriptionStatus::Active,
        start_date: test_datetime(),
        next_billing_day: test_datetime() + chrono::Duration::days(30),
    };
    overrides(&mut input);
    input
}

/// Create a test payment with sensible defaults.
pub fn create_test_payment(subscription_id: i32, overrides: impl FnOnce(&mut Payment)) -> Payment {
    let mut payment = Payment {
        id: subscription_id,
        subscription_id,
        amount: Decimal::new(1200, 2),
        status: "succeeded".to_string(),
        payment_date: test_datetime(),
        invoice_url: None,
    };
    overrides(&mut payment);
    payment
}

/// Fixed timestamp for deterministic tests.
pub fn test_datetime() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-01-15 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_payment_with_defaults() {
        let payment = create_test_payment(3, |_| {});
        assert_eq!(payment.subscription_id, 3);
        assert_eq!(payment.amount.to_string(), "12.00");
        assert!(payment.invoice_url.is_none());
    }

    #[test]
    fn test_create_subscription_input_with_overrides() {
        let input = create_test_subscription_input(1, |s| {
            s.status = SubscriptionStatus::Trialing;
            s.plan_id = "price_custom".to_string();
        });
        assert_eq!(input.user_id, 1);
        assert_eq!(input.status, SubscriptionStatus::Trialing);
        assert_eq!(input.plan_id, "price_custom");
    }
}
