use std::collections::HashSet;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    domain::comment::Comment,
    repository::errors::RepositoryError,
    usecase::contracts::CommentRepository,
};

/// Process-local store with the same contract as the Postgres repository.
/// Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryCommentRepository {
    comments: RwLock<Vec<Comment>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CommentRepository for InMemoryCommentRepository {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Comment>, RepositoryError> {
        let mut comments = self.comments.read().await.clone();
        comments.sort_by(|a, b| b.date.cmp(&a.date));

        tracing::debug!(count = comments.len(), "found comments");
        Ok(comments)
    }

    #[tracing::instrument(skip(self), fields(comment_id = %id))]
    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.comments.read().await.iter().any(|c| c.id == id))
    }

    #[tracing::instrument(skip(self, comment), fields(comment_id = %comment.id))]
    async fn create(&self, comment: &Comment) -> Result<(), RepositoryError> {
        let mut comments = self.comments.write().await;
        if comments.iter().any(|c| c.id == comment.id) {
            return Err(RepositoryError::DatabaseError(format!(
                "duplicate comment id {}",
                comment.id
            )));
        }
        comments.push(comment.clone());

        tracing::debug!(comment_id = %comment.id, "comment created successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self, text), fields(comment_id = %id, %author))]
    async fn update_text(&self, id: Uuid, text: &str, author: &str) -> Result<Comment, RepositoryError> {
        let mut comments = self.comments.write().await;
        let comment = comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;

        comment.text = text.to_string();
        comment.author = author.to_string();
        comment.date = Utc::now();

        Ok(comment.clone())
    }

    #[tracing::instrument(skip(self), fields(comment_id = %id))]
    async fn like_delta(&self, id: Uuid, increment: bool) -> Result<Comment, RepositoryError> {
        let mut comments = self.comments.write().await;
        let comment = comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;

        comment.likes += if increment { 1 } else { -1 };

        Ok(comment.clone())
    }

    #[tracing::instrument(skip(self), fields(comment_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut comments = self.comments.write().await;
        let before = comments.len();
        comments.retain(|c| c.id != id);

        if comments.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, batch), fields(count = batch.len()))]
    async fn bulk_import(&self, batch: Vec<Comment>) -> Result<u64, RepositoryError> {
        let mut comments = self.comments.write().await;

        // validate the whole batch before touching the store
        let mut seen: HashSet<Uuid> = comments.iter().map(|c| c.id).collect();
        for comment in &batch {
            if !seen.insert(comment.id) {
                return Err(RepositoryError::DatabaseError(format!(
                    "duplicate comment id {}",
                    comment.id
                )));
            }
        }

        let imported = batch.len() as u64;
        comments.extend(batch);

        tracing::debug!(imported, "comments imported successfully");
        Ok(imported)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let mut comments = self.comments.write().await;
        let deleted = comments.len() as u64;
        comments.clear();
        Ok(deleted)
    }
}
