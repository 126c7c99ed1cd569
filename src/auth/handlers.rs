use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{
            AddUserForm, CreateAccessTokenRequest, CreateAccessTokenResponse, LoginForm,
            LoginResponse, PublicUser,
        },
        extractors::{cookie, session_cookie, AuthUser, ACCESS_COOKIE, REFRESH_COOKIE},
        services::{TokenService, ACCESS_TOKEN_TTL},
    },
    error::ApiError,
    state::AppState,
    users::services::UserService,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/signup", post(signup))
        .route("/user", post(signup))
        .route("/logout", get(logout))
        .route("/api/token", post(create_new_access_token))
}

#[instrument(skip_all)]
pub async fn signup(
    State(users): State<UserService>,
    Form(form): Form<AddUserForm>,
) -> Result<Redirect, ApiError> {
    users.save(&form.email, &form.password).await?;
    Ok(Redirect::to("/login"))
}

#[instrument(skip_all)]
pub async fn login(
    State(tokens): State<TokenService>,
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    let issued = tokens.login(&form.email, &form.password).await?;

    let refresh_max_age = state.config.jwt.refresh_ttl_days * 24 * 60 * 60;
    let cookies = AppendHeaders([
        (
            header::SET_COOKIE,
            session_cookie(
                ACCESS_COOKIE,
                &issued.access_token,
                ACCESS_TOKEN_TTL.whole_seconds(),
            ),
        ),
        (
            header::SET_COOKIE,
            session_cookie(REFRESH_COOKIE, &issued.refresh_token, refresh_max_age),
        ),
    ]);

    Ok((
        cookies,
        Json(LoginResponse {
            access_token: issued.access_token,
            refresh_token: issued.refresh_token,
            user: PublicUser {
                id: issued.user.id,
                email: issued.user.email,
            },
        }),
    ))
}

#[instrument(skip_all)]
pub async fn logout(
    State(tokens): State<TokenService>,
    caller: Option<AuthUser>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    match (caller, cookie(&headers, REFRESH_COOKIE)) {
        (Some(AuthUser(identity)), _) => tokens.logout(identity.user_id).await?,
        (None, Some(refresh)) if !refresh.is_empty() => {
            tokens.logout_by_refresh_token(refresh).await?
        }
        (None, _) => {}
    }
    let cleared = AppendHeaders([
        (header::SET_COOKIE, session_cookie(ACCESS_COOKIE, "", 0)),
        (header::SET_COOKIE, session_cookie(REFRESH_COOKIE, "", 0)),
    ]);
    Ok((cleared, Redirect::to("/login")))
}

#[instrument(skip_all)]
pub async fn create_new_access_token(
    State(tokens): State<TokenService>,
    Json(request): Json<CreateAccessTokenRequest>,
) -> Result<(StatusCode, Json<CreateAccessTokenResponse>), ApiError> {
    let access_token = tokens
        .create_new_access_token(&request.refresh_token)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateAccessTokenResponse { access_token }),
    ))
}
