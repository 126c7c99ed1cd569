use std::sync::Arc;

use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::password::{self, PasswordError},
    state::AppState,
    users::repo::{User, UserStore},
};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("unexpected user")]
    NotFound,

    #[error("invalid email")]
    InvalidEmail,

    #[error("password too short")]
    PasswordTooShort,

    #[error("email already registered")]
    EmailTaken,

    #[error(transparent)]
    Hashing(#[from] PasswordError),

    #[error("data access failure: {0}")]
    DataAccess(#[from] sqlx::Error),
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone())
    }
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Registers a user and returns the stored record.
    pub async fn save(&self, email: &str, password: &str) -> Result<User, UserError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            warn!(%email, "invalid email");
            return Err(UserError::InvalidEmail);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            warn!("password too short");
            return Err(UserError::PasswordTooShort);
        }
        if self.store.find_by_email(&email).await?.is_some() {
            warn!(%email, "email already registered");
            return Err(UserError::EmailTaken);
        }

        let hash = password::hash(password)?;
        let user = match self.store.create(&email, &hash).await {
            Ok(user) => user,
            // lost a race with a concurrent signup for the same email
            Err(e) if is_unique_violation(&e) => {
                warn!(%email, "email already registered");
                return Err(UserError::EmailTaken);
            }
            Err(e) => return Err(e.into()),
        };
        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User, UserError> {
        self.store.find_by_id(id).await?.ok_or(UserError::NotFound)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self.store.find_by_email(&normalize_email(email)).await?)
    }

    /// Lookup used by the login flow, where the username is the email.
    pub async fn load_user_by_username(&self, username: &str) -> Result<User, UserError> {
        self.find_by_email(username).await?.ok_or(UserError::NotFound)
    }
}
