use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Article {
    /// Returns a new value carrying the given fields; id and created_at are kept.
    /// updated_at never moves backwards, even if the clock does.
    pub fn revised(self, title: String, content: String) -> Self {
        let updated_at = OffsetDateTime::now_utc().max(self.updated_at);
        Self {
            title,
            content,
            updated_at,
            ..self
        }
    }
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn create(&self, title: &str, content: &str) -> Result<Article, sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, sqlx::Error>;
    async fn find_all(&self) -> Result<Vec<Article>, sqlx::Error>;
    /// Replaces title and content of an existing article. `None` when the id is unknown.
    async fn update(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<Article>, sqlx::Error>;
    /// Fails with `sqlx::Error::RowNotFound` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error>;
}

#[derive(Clone)]
pub struct PgArticleStore {
    db: PgPool,
}

impl PgArticleStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    async fn create(&self, title: &str, content: &str) -> Result<Article, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            INSERT INTO article (title, content)
            VALUES ($1, $2)
            RETURNING id, title, content, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(content)
        .fetch_one(&self.db)
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, created_at, updated_at
            FROM article
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
    }

    async fn find_all(&self) -> Result<Vec<Article>, sqlx::Error> {
        sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, created_at, updated_at
            FROM article
            "#,
        )
        .fetch_all(&self.db)
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        title: &str,
        content: &str,
    ) -> Result<Option<Article>, sqlx::Error> {
        let mut tx = self.db.begin().await?;

        let current = sqlx::query_as::<_, Article>(
            r#"
            SELECT id, title, content, created_at, updated_at
            FROM article
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            tx.rollback().await?;
            return Ok(None);
        };

        let revised = current.revised(title.to_owned(), content.to_owned());
        let saved = sqlx::query_as::<_, Article>(
            r#"
            UPDATE article
               SET title = $2, content = $3, updated_at = $4
             WHERE id = $1
            RETURNING id, title, content, created_at, updated_at
            "#,
        )
        .bind(revised.id)
        .bind(&revised.title)
        .bind(&revised.content)
        .bind(revised.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(saved))
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        let done = sqlx::query("DELETE FROM article WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if done.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn revised_keeps_identity_and_moves_updated_at_forward() {
        let created = datetime!(2024-01-01 0:00 UTC);
        let article = Article {
            id: Uuid::new_v4(),
            title: "title".into(),
            content: "content".into(),
            created_at: created,
            updated_at: created,
        };
        let id = article.id;

        let revised = article.revised("new title".into(), "new content".into());
        assert_eq!(revised.id, id);
        assert_eq!(revised.title, "new title");
        assert_eq!(revised.content, "new content");
        assert_eq!(revised.created_at, created);
        assert!(revised.updated_at >= revised.created_at);
    }

    #[test]
    fn revised_never_precedes_creation() {
        let future = OffsetDateTime::now_utc() + time::Duration::days(1);
        let article = Article {
            id: Uuid::new_v4(),
            title: "t".into(),
            content: "c".into(),
            created_at: future,
            updated_at: future,
        };
        let revised = article.revised("t2".into(), "c2".into());
        assert_eq!(revised.updated_at, future);
    }

    #[test]
    fn revised_never_precedes_last_update() {
        let created = datetime!(2024-01-01 0:00 UTC);
        let last_update = OffsetDateTime::now_utc() + time::Duration::hours(1);
        let article = Article {
            id: Uuid::new_v4(),
            title: "t".into(),
            content: "c".into(),
            created_at: created,
            updated_at: last_update,
        };

        let revised = article.revised("t2".into(), "c2".into());
        assert_eq!(revised.updated_at, last_update);
        assert_eq!(revised.created_at, created);
    }
}
