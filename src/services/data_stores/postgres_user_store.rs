use color_eyre::eyre::eyre;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::{User, UserId, UserStore, UserStoreError, Username};

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> Result<User, UserStoreError> {
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;
    let username: String = row
        .try_get("username")
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;
    let is_active: bool = row
        .try_get("is_active")
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;

    Ok(User {
        user_id: UserId::parse(user_id)
            .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?,
        username: Username::parse(username)
            .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?,
        is_active,
    })
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, username, is_active) VALUES ($1, $2, $3)
            "#,
        )
        .bind(user.user_id.as_ref())
        .bind(user.username.as_ref())
        .bind(user.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                UserStoreError::UserAlreadyExists
            }
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn get_user(&self, user_id: &UserId) -> Result<User, UserStoreError> {
        let row = sqlx::query(
            r#"
                    SELECT user_id, username, is_active
                    FROM users
                    WHERE user_id = $1
                    "#,
        )
        .bind(user_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => UserStoreError::UserNotFound,
            err => UserStoreError::UnexpectedError(eyre!(err)),
        })?;

        user_from_row(&row)
    }

    #[tracing::instrument(name = "Retrieving users from PostgreSQL", skip_all)]
    async fn get_users(
        &self,
        user_ids: &[UserId],
    ) -> Result<Vec<User>, UserStoreError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> =
            user_ids.iter().map(|id| id.as_ref().to_owned()).collect();
        let rows = sqlx::query(
            r#"
                SELECT user_id, username, is_active
                FROM users
                WHERE user_id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;

        let mut found = rows
            .iter()
            .map(user_from_row)
            .collect::<Result<Vec<User>, UserStoreError>>()?;
        found.sort_by_key(|user| {
            user_ids
                .iter()
                .position(|id| id == &user.user_id)
                .unwrap_or(usize::MAX)
        });
        Ok(found)
    }

    #[tracing::instrument(name = "Updating user in PostgreSQL", skip_all)]
    async fn update_user(&mut self, user: &User) -> Result<(), UserStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET username = $2, is_active = $3
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.as_ref())
        .bind(user.username.as_ref())
        .bind(user.is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Setting user activity in PostgreSQL", skip_all)]
    async fn set_active(
        &mut self,
        user_id: &UserId,
        is_active: bool,
    ) -> Result<(), UserStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET is_active = $2 WHERE user_id = $1
            "#,
        )
        .bind(user_id.as_ref())
        .bind(is_active)
        .execute(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Deleting user from PostgreSQL", skip_all)]
    async fn delete_user(
        &mut self,
        user_id: &UserId,
    ) -> Result<(), UserStoreError> {
        let result = sqlx::query(
            r#"
               DELETE FROM users WHERE user_id = $1
               "#,
        )
        .bind(user_id.as_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }
}
