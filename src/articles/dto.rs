use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::articles::repo::Article;

#[derive(Debug, Serialize, Deserialize)]
pub struct AddArticleRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: String,
    pub content: String,
}

/// Item of `GET /api/articles`.
#[derive(Debug, Serialize)]
pub struct ArticleListItem {
    pub id: Uuid,
    pub title: String,
    pub content: String,
}

/// Body of `GET /api/articles/{id}`.
#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub title: String,
    pub content: String,
}

impl From<Article> for ArticleListItem {
    fn from(a: Article) -> Self {
        Self {
            id: a.id,
            title: a.title,
            content: a.content,
        }
    }
}

impl From<Article> for ArticleResponse {
    fn from(a: Article) -> Self {
        Self {
            title: a.title,
            content: a.content,
        }
    }
}
