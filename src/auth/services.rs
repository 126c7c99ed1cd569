use std::sync::Arc;

use axum::extract::FromRef;
use thiserror::Error;
use time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        jwt::TokenProvider,
        password::{self, PasswordError},
        repo::RefreshTokenStore,
    },
    state::AppState,
    users::{
        repo::User,
        services::{UserError, UserService},
    },
};

/// Lifetime of every access token, at login and on refresh.
pub const ACCESS_TOKEN_TTL: Duration = Duration::hours(2);

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,

    #[error("unexpected token")]
    UnexpectedToken,

    #[error("unexpected user")]
    UnexpectedUser,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("data access failure: {0}")]
    DataAccess(#[from] sqlx::Error),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => AuthError::UnexpectedUser,
            UserError::DataAccess(e) => AuthError::DataAccess(e),
            UserError::Hashing(e) => AuthError::Password(e),
            UserError::InvalidEmail | UserError::PasswordTooShort | UserError::EmailTaken => {
                AuthError::InvalidCredentials
            }
        }
    }
}

/// Tokens handed out by a successful login.
#[derive(Debug)]
pub struct LoginTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct TokenService {
    tokens: TokenProvider,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    users: UserService,
    refresh_ttl: Duration,
}

impl FromRef<AppState> for TokenService {
    fn from_ref(state: &AppState) -> Self {
        Self {
            tokens: TokenProvider::from_ref(state),
            refresh_tokens: state.refresh_tokens.clone(),
            users: UserService::from_ref(state),
            refresh_ttl: Duration::days(state.config.jwt.refresh_ttl_days),
        }
    }
}

impl TokenService {
    /// Exchanges a persisted refresh token for a new access token.
    /// The refresh token itself is not rotated.
    pub async fn create_new_access_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        if !self.tokens.validate(refresh_token) {
            warn!("refresh rejected: invalid token");
            return Err(AuthError::InvalidToken);
        }

        let stored = self
            .refresh_tokens
            .find_by_refresh_token(refresh_token)
            .await?
            .ok_or_else(|| {
                warn!("refresh rejected: token not on record");
                AuthError::UnexpectedToken
            })?;

        let user = self.users.find_by_id(stored.user_id).await?;
        let access_token = self.tokens.issue(&user, ACCESS_TOKEN_TTL)?;
        info!(user_id = %user.id, "access token refreshed");
        Ok(access_token)
    }

    /// Verifies credentials, then issues an access token and stores a fresh refresh token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginTokens, AuthError> {
        let user = match self.users.load_user_by_username(email).await {
            Ok(u) => u,
            Err(UserError::NotFound) => {
                warn!(%email, "login unknown email");
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        };

        if !password::verify(password, &user.password_hash)? {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(&user, ACCESS_TOKEN_TTL)?;
        let refresh_token = self.tokens.issue(&user, self.refresh_ttl)?;
        self.refresh_tokens.save(user.id, &refresh_token).await?;

        info!(user_id = %user.id, email = %user.email, "user logged in");
        Ok(LoginTokens {
            access_token,
            refresh_token,
            user,
        })
    }

    pub async fn logout(&self, user_id: Uuid) -> Result<(), AuthError> {
        self.refresh_tokens.delete_by_user_id(user_id).await?;
        info!(%user_id, "user logged out");
        Ok(())
    }

    /// Logout for a caller whose access token is gone or expired. The stored
    /// row is matched by value, so an expired refresh token still resolves.
    pub async fn logout_by_refresh_token(&self, refresh_token: &str) -> Result<(), AuthError> {
        match self.refresh_tokens.find_by_refresh_token(refresh_token).await? {
            Some(stored) => self.logout(stored.user_id).await,
            None => {
                debug!("logout with unknown refresh token");
                Ok(())
            }
        }
    }
}
