use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    domain::comment::Comment,
    repository::errors::RepositoryError,
    usecase::contracts::CommentRepository,
};

pub struct PostgresCommentRepository {
    pool: PgPool,
}

impl PostgresCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CommentRepository for PostgresCommentRepository {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Comment>, RepositoryError> {
        tracing::debug!("listing comments");

        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, author, text, image, date, likes, parent
            FROM comments
            ORDER BY date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(count = comments.len(), "found comments");
        Ok(comments)
    }

    #[tracing::instrument(skip(self), fields(comment_id = %id))]
    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM comments WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(count.0 > 0)
    }

    #[tracing::instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn create(&self, comment: &Comment) -> Result<(), RepositoryError> {
        tracing::debug!("creating comment");

        sqlx::query(
            r#"
            INSERT INTO comments (id, author, text, image, date, likes, parent)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(comment.id)
        .bind(&comment.author)
        .bind(&comment.text)
        .bind(&comment.image)
        .bind(comment.date)
        .bind(comment.likes)
        .bind(comment.parent)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(comment_id = %comment.id, "comment created successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self, text), fields(comment_id = %id, %author))]
    async fn update_text(&self, id: Uuid, text: &str, author: &str) -> Result<Comment, RepositoryError> {
        tracing::debug!("updating comment text");

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET text = $2, author = $3, date = $4
            WHERE id = $1
            RETURNING id, author, text, image, date, likes, parent
            "#,
        )
        .bind(id)
        .bind(text)
        .bind(author)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        tracing::debug!(comment_id = %id, "comment updated successfully");
        Ok(comment)
    }

    #[tracing::instrument(skip(self), fields(comment_id = %id))]
    async fn like_delta(&self, id: Uuid, increment: bool) -> Result<Comment, RepositoryError> {
        tracing::debug!("applying like delta");

        let delta: i32 = if increment { 1 } else { -1 };

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET likes = likes + $2
            WHERE id = $1
            RETURNING id, author, text, image, date, likes, parent
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        tracing::debug!(comment_id = %id, likes = comment.likes, "like delta applied");
        Ok(comment)
    }

    #[tracing::instrument(skip(self), fields(comment_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        tracing::debug!("deleting comment");

        let result = sqlx::query(
            r#"
            DELETE FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::debug!(comment_id = %id, "comment deleted successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self, comments), fields(count = comments.len()))]
    async fn bulk_import(&self, comments: Vec<Comment>) -> Result<u64, RepositoryError> {
        tracing::debug!("importing comments");

        let mut tx = self.pool.begin().await?;
        let mut imported = 0;

        for comment in &comments {
            sqlx::query(
                r#"
                INSERT INTO comments (id, author, text, image, date, likes, parent)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(comment.id)
            .bind(&comment.author)
            .bind(&comment.text)
            .bind(&comment.image)
            .bind(comment.date)
            .bind(comment.likes)
            .bind(comment.parent)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                tracing::error!(comment_id = %comment.id, error = %e, "import insert failed, rolling back");
                RepositoryError::DatabaseError(e.to_string())
            })?;
            imported += 1;
        }

        tx.commit().await?;

        tracing::debug!(imported, "comments imported successfully");
        Ok(imported)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        tracing::debug!("deleting all comments");

        let result = sqlx::query("DELETE FROM comments")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tracing::debug!(deleted = result.rows_affected(), "all comments deleted");
        Ok(result.rows_affected())
    }
}

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}
