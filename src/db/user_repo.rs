use async_trait::async_trait;

use super::{Database, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{NewUser, User};

const USER_COLUMNS: &str = "id, email, hashed_password, full_name, is_active, created_at";

#[async_trait]
impl UserRepository for Database {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        let sql = format!(
            "INSERT INTO users (email, hashed_password, full_name) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.hashed_password)
            .bind(&user.full_name)
            .fetch_one(&self.pg)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    AppError::Conflict("Email already registered".to_string())
                }
                other => AppError::Database(other),
            })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pg)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pg)
            .await?;
        Ok(user)
    }
}
