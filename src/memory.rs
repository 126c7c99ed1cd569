//! In-memory stores backing `AppState::fake()`.

use std::{error::Error as StdError, fmt, sync::Mutex};

use async_trait::async_trait;
use sqlx::error::{DatabaseError, ErrorKind};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    articles::repo::{Article, ArticleStore},
    auth::repo::{RefreshToken, RefreshTokenStore},
    users::repo::{User, UserStore},
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    articles: Mutex<Vec<Article>>,
    refresh_tokens: Mutex<Vec<RefreshToken>>,
}

/// Mirrors the error PostgreSQL raises for `users.email UNIQUE`.
#[derive(Debug)]
struct UniqueViolation {
    message: String,
}

impl fmt::Display for UniqueViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for UniqueViolation {}

impl DatabaseError for UniqueViolation {
    fn message(&self) -> &str {
        &self.message
    }

    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }

    fn constraint(&self) -> Option<&str> {
        Some("users_email_key")
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::UniqueViolation
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> sqlx::Error {
    sqlx::Error::PoolClosed
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let users = self.users.lock().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let users = self.users.lock().map_err(poisoned)?;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> Result<User, sqlx::Error> {
        let mut users = self.users.lock().map_err(poisoned)?;
        if users.iter().any(|u| u.email == email) {
            let message = format!("duplicate key value violates users_email_key: {email}");
            return Err(sqlx::Error::Database(Box::new(UniqueViolation { message })));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn create(&self, title: &str, content: &str) -> Result<Article, sqlx::Error> {
        let now = OffsetDateTime::now_utc();
        let article = Article {
            id: Uuid::new_v4(),
            title: title.to_owned(),
            content: content.to_owned(),
            created_at: now,
            updated_at: now,
        };
        self.articles
            .lock()
            .map_err(poisoned)?
            .push(article.clone());
        Ok(article)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, sqlx::Error> {
        let articles = self.articles.lock().map_err(poisoned)?;
        Ok(articles.iter().find(|a| a.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Article>, sqlx::Error> {
        Ok(self.articles.lock().map_err(poisoned)?.clone())
    }

    async fn update(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<Article>, sqlx::Error> {
        let mut articles = self.articles.lock().map_err(poisoned)?;
        let Some(slot) = articles.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        let revised = slot.clone().revised(title.to_owned(), content.to_owned());
        *slot = revised.clone();
        Ok(Some(revised))
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let mut articles = self.articles.lock().map_err(poisoned)?;
        let before = articles.len();
        articles.retain(|a| a.id != id);
        if articles.len() == before {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl RefreshTokenStore for MemoryStore {
    async fn find_by_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshToken>, sqlx::Error> {
        let tokens = self.refresh_tokens.lock().map_err(poisoned)?;
        Ok(tokens.iter().find(|t| t.refresh_token == token).cloned())
    }

    async fn save(&self, user_id: Uuid, token: &str) -> Result<RefreshToken, sqlx::Error> {
        let mut tokens = self.refresh_tokens.lock().map_err(poisoned)?;
        if let Some(existing) = tokens.iter_mut().find(|t| t.user_id == user_id) {
            existing.refresh_token = token.to_owned();
            return Ok(existing.clone());
        }
        let saved = RefreshToken {
            id: Uuid::new_v4(),
            user_id,
            refresh_token: token.to_owned(),
        };
        tokens.push(saved.clone());
        Ok(saved)
    }

    async fn delete_by_user_id(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        self.refresh_tokens
            .lock()
            .map_err(poisoned)?
            .retain(|t| t.user_id != user_id);
        Ok(())
    }
}
