use std::sync::Arc;

use axum::extract::FromRef;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{
    articles::{
        dto::{AddArticleRequest, UpdateArticleRequest},
        repo::{Article, ArticleStore},
    },
    state::AppState,
};

#[derive(Debug, Error)]
pub enum ArticleError {
    #[error("not found: {0}")]
    NotFound(Uuid),

    #[error("data access failure: {0}")]
    DataAccess(#[from] sqlx::Error),
}

#[derive(Clone)]
pub struct BlogService {
    store: Arc<dyn ArticleStore>,
}

impl FromRef<AppState> for BlogService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.articles.clone())
    }
}

impl BlogService {
    pub fn new(store: Arc<dyn ArticleStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, request: AddArticleRequest) -> Result<Article, ArticleError> {
        let article = self.store.create(&request.title, &request.content).await?;
        debug!(article_id = %article.id, "article created");
        Ok(article)
    }

    pub async fn find_all(&self) -> Result<Vec<Article>, ArticleError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Article, ArticleError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ArticleError::NotFound(id))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateArticleRequest,
    ) -> Result<Article, ArticleError> {
        let article = self
            .store
            .update(id, &request.title, &request.content)
            .await?
            .ok_or(ArticleError::NotFound(id))?;
        debug!(article_id = %article.id, "article updated");
        Ok(article)
    }

    /// A missing id is reported by the store, not translated into `NotFound`.
    pub async fn delete(&self, id: Uuid) -> Result<(), ArticleError> {
        self.store.delete(id).await?;
        debug!(article_id = %id, "article deleted");
        Ok(())
    }
}
