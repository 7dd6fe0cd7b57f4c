use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::Row;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::subscription_mirror::{CreateSubscriptionInput, SubscriptionRepoTrait},
    domain::entities::subscription::{Subscription, SubscriptionStatus},
};

fn row_to_subscription(row: &sqlx::postgres::PgRow) -> Subscription {
    Subscription {
        id: row.get("id"),
        user_id: row.get("user_id"),
        stripe_sub_id: row.get("stripe_sub_id"),
        plan_id: row.get("plan_id"),
        status: SubscriptionStatus::from(row.get::<String, _>("status")),
        start_date: row.get("start_date"),
        cancel_date: row.get("cancel_date"),
        next_billing_day: row.get("next_billing_day"),
    }
}

const SELECT_COLS: &str = r#"
    id, user_id, stripe_sub_id, plan_id, status,
    start_date, cancel_date, next_billing_day
"#;

#[async_trait]
impl SubscriptionRepoTrait for PostgresPersistence {
    async fn create(&self, input: &CreateSubscriptionInput) -> AppResult<Subscription> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO subscriptions (
                user_id, stripe_sub_id, plan_id, status, start_date, next_billing_day
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(input.user_id)
        .bind(&input.stripe_sub_id)
        .bind(&input.plan_id)
        .bind(input.status.as_str())
        .bind(input.start_date)
        .bind(input.next_billing_day)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_subscription(&row))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<Subscription>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE id = $1",
            SELECT_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row.as_ref().map(row_to_subscription))
    }

    async fn list_by_user(&self, user_id: i32) -> AppResult<Vec<Subscription>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM subscriptions WHERE user_id = $1 ORDER BY id",
            SELECT_COLS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.iter().map(row_to_subscription).collect())
    }

    async fn list_all(&self) -> AppResult<Vec<Subscription>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM subscriptions ORDER BY id",
            SELECT_COLS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(rows.iter().map(row_to_subscription).collect())
    }

    async fn mark_canceled(
        &self,
        id: i32,
        canceled_at: NaiveDateTime,
    ) -> AppResult<Subscription> {
        // RowNotFound (row vanished since the lookup) maps to AppError::NotFound.
        let row = sqlx::query(&format!(
            r#"
            UPDATE subscriptions
            SET status = 'canceled',
                cancel_date = COALESCE(cancel_date, $1)
            WHERE id = $2
            RETURNING {}
            "#,
            SELECT_COLS
        ))
        .bind(canceled_at)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(row_to_subscription(&row))
    }
}
