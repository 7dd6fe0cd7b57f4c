use async_trait::async_trait;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::use_cases::subscription_mirror::{CreateUserInput, UserRepoTrait},
    domain::entities::user::User,
};

#[async_trait]
impl UserRepoTrait for PostgresPersistence {
    async fn create(&self, input: &CreateUserInput) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, stripe_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, stripe_id
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.stripe_id)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, name, email, stripe_id FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, name, email, stripe_id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }
}
