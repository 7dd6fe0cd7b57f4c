use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

/// A payment recorded against a subscription.
///
/// The table exists in the mirror schema but nothing in this crate writes to
/// it; rows can only be read.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Payment {
    pub id: i32,
    pub subscription_id: i32,
    pub amount: Decimal,
    pub status: String,
    pub payment_date: NaiveDateTime,
    pub invoice_url: Option<String>,
}
