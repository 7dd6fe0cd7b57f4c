use serde::Serialize;

/// A local user mirrored from a provider customer.
///
/// `stripe_id` is assigned once when the row is inserted and is never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub stripe_id: String,
}
