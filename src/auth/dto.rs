use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Form body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Form body of `POST /signup` and `POST /user`.
#[derive(Debug, Deserialize)]
pub struct AddUserForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAccessTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct CreateAccessTokenResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
}
