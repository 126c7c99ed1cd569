use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Persisted refresh token, one per user.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub refresh_token: String,
}

#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    async fn find_by_refresh_token(&self, token: &str)
        -> Result<Option<RefreshToken>, sqlx::Error>;
    /// Inserts, or replaces the token already held by `user_id`.
    async fn save(&self, user_id: Uuid, token: &str) -> Result<RefreshToken, sqlx::Error>;
    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<(), sqlx::Error>;
}

#[derive(Clone)]
pub struct PgRefreshTokenStore {
    db: PgPool,
}

impl PgRefreshTokenStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RefreshTokenStore for PgRefreshTokenStore {
    async fn find_by_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshToken>, sqlx::Error> {
        sqlx::query_as::<_, RefreshToken>(
            r#"
            SELECT id, user_id, refresh_token
            FROM refresh_token
            WHERE refresh_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await
    }

    async fn save(&self, user_id: Uuid, token: &str) -> Result<RefreshToken, sqlx::Error> {
        sqlx::query_as::<_, RefreshToken>(
            r#"
            INSERT INTO refresh_token (user_id, refresh_token)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET refresh_token = EXCLUDED.refresh_token
            RETURNING id, user_id, refresh_token
            "#,
        )
        .bind(user_id)
        .bind(token)
        .fetch_one(&self.db)
        .await
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM refresh_token WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
