use axum::extract::FromRef;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::{claims::Claims, identity::Identity};
use crate::{config::JwtConfig, state::AppState, users::repo::User};

/// Outcome of checking a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    Valid,
    Expired,
    BadSignature,
    /// Undecodable, wrong issuer, or missing claims.
    Malformed,
}

/// Signs and verifies HS256 tokens. Holds no mutable state.
#[derive(Clone)]
pub struct TokenProvider {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
}

impl FromRef<AppState> for TokenProvider {
    fn from_ref(state: &AppState) -> Self {
        Self::from_config(&state.config.jwt)
    }
}

impl TokenProvider {
    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
        }
    }

    pub fn issue(&self, user: &User, ttl: Duration) -> Result<String, jsonwebtoken::errors::Error> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            iss: self.issuer.clone(),
            iat: now.unix_timestamp(),
            exp: (now + ttl).unix_timestamp(),
            sub: user.email.clone(),
            id: user.id,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id = %user.id, "jwt signed");
        Ok(token)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        validation
    }

    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation())?;
        debug!(user_id = %data.claims.id, "jwt verified");
        Ok(data.claims)
    }

    pub fn inspect(&self, token: &str) -> TokenStatus {
        match self.decode(token) {
            Ok(_) => TokenStatus::Valid,
            Err(e) => {
                let status = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenStatus::Expired,
                    ErrorKind::InvalidSignature => TokenStatus::BadSignature,
                    _ => TokenStatus::Malformed,
                };
                debug!(?status, error = %e, "jwt rejected");
                status
            }
        }
    }

    pub fn validate(&self, token: &str) -> bool {
        self.inspect(token) == TokenStatus::Valid
    }

    pub fn authenticate(&self, token: &str) -> Result<Identity, jsonwebtoken::errors::Error> {
        self.decode(token).map(Identity::from)
    }

    pub fn user_id(&self, token: &str) -> Result<Uuid, jsonwebtoken::errors::Error> {
        self.decode(token).map(|claims| claims.id)
    }
}
