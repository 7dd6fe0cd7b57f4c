use async_trait::async_trait;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::subscription_mirror::PaymentRepoTrait,
    domain::entities::payment::Payment,
};

#[async_trait]
impl PaymentRepoTrait for PostgresPersistence {
    async fn list_by_subscription(&self, subscription_id: i32) -> AppResult<Vec<Payment>> {
        sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, subscription_id, amount, status, payment_date, invoice_url
            FROM payments
            WHERE subscription_id = $1
            ORDER BY payment_date DESC, id DESC
            "#,
        )
        .bind(subscription_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
