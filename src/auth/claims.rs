use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload carried by access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub iss: String, // issuer
    pub iat: i64,    // issued at (unix timestamp)
    pub exp: i64,    // expires at (unix timestamp)
    pub sub: String, // user email
    pub id: Uuid,    // user ID
}
