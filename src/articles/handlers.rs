use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    articles::{
        dto::{AddArticleRequest, ArticleListItem, ArticleResponse, UpdateArticleRequest},
        repo::Article,
        services::BlogService,
    },
    auth::extractors::AuthUser,
    error::ApiError,
    state::AppState,
};

pub fn article_routes() -> Router<AppState> {
    Router::new()
        .route("/api/articles", get(find_all_articles).post(add_article))
        .route(
            "/api/articles/:id",
            get(find_article).put(update_article).delete(delete_article),
        )
}

#[instrument(skip(blog, identity, request), fields(user = %identity.username))]
pub async fn add_article(
    State(blog): State<BlogService>,
    AuthUser(identity): AuthUser,
    Json(request): Json<AddArticleRequest>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let saved = blog.save(request).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

#[instrument(skip(blog, identity), fields(user = %identity.username))]
pub async fn find_all_articles(
    State(blog): State<BlogService>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<ArticleListItem>>, ApiError> {
    let items = blog
        .find_all()
        .await?
        .into_iter()
        .map(ArticleListItem::from)
        .collect();
    Ok(Json(items))
}

#[instrument(skip(blog, identity), fields(user = %identity.username))]
pub async fn find_article(
    State(blog): State<BlogService>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let article = blog.find_by_id(id).await?;
    Ok(Json(article.into()))
}

#[instrument(skip(blog, identity, request), fields(user = %identity.username))]
pub async fn update_article(
    State(blog): State<BlogService>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateArticleRequest>,
) -> Result<Json<Article>, ApiError> {
    let updated = blog.update(id, request).await?;
    Ok(Json(updated))
}

#[instrument(skip(blog, identity), fields(user = %identity.username))]
pub async fn delete_article(
    State(blog): State<BlogService>,
    AuthUser(identity): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    blog.delete(id).await?;
    Ok(StatusCode::OK)
}
