use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::repo_types::User,
    db::PgStore,
    error::AppResult,
    types::{Pagination, Role},
};

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>>;
    /// Fails with `Conflict` when the email is taken.
    async fn insert(&self, user: &User) -> AppResult<User>;
    async fn update_profile(&self, id: Uuid, changes: &UserChanges) -> AppResult<Option<User>>;
    /// Stores a new hash and clears any pending reset token.
    async fn set_password(&self, id: Uuid, password_hash: &str) -> AppResult<()>;
    async fn set_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expires: OffsetDateTime,
    ) -> AppResult<()>;
    async fn record_login(&self, id: Uuid, at: OffsetDateTime) -> AppResult<()>;
    async fn set_role(&self, id: Uuid, role: Role) -> AppResult<Option<User>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
    async fn list(&self, page: Pagination) -> AppResult<Vec<User>>;
    async fn count(&self, role: Option<Role>) -> AppResult<i64>;
}

const USER_COLUMNS: &str = "id, email, name, password_hash, role, reset_token, \
     reset_token_expires, last_login_at, created_at, updated_at";

#[async_trait]
impl UserRepo for PgStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE reset_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: &User) -> AppResult<User> {
        let row = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, name, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_profile(&self, id: Uuid, changes: &UserChanges) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET name = COALESCE($2, name),
                   email = COALESCE($3, email),
                   updated_at = now()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn set_password(&self, id: Uuid, password_hash: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
               SET password_hash = $2, reset_token = NULL, reset_token_expires = NULL,
                   updated_at = now()
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expires: OffsetDateTime,
    ) -> AppResult<()> {
        sqlx::query(
            "UPDATE users SET reset_token = $2, reset_token_expires = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(token)
        .bind(expires)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn record_login(&self, id: Uuid, at: OffsetDateTime) -> AppResult<()> {
        sqlx::query("UPDATE users SET last_login_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET role = $2, updated_at = now() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn list(&self, page: Pagination) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count(&self, role: Option<Role>) -> AppResult<i64> {
        let n: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE ($1::user_role IS NULL OR role = $1)",
        )
        .bind(role)
        .fetch_one(&self.pool)
        .await?;
        Ok(n)
    }
}
