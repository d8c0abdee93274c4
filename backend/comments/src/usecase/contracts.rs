use uuid::Uuid;

use crate::{domain::comment::Comment, repository::errors::RepositoryError};

#[cfg_attr(test, mockall::automock)]
pub trait CommentRepository: Send + Sync {
    /// All comments, newest first.
    async fn list(&self) -> Result<Vec<Comment>, RepositoryError>;
    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError>;
    async fn create(&self, comment: &Comment) -> Result<(), RepositoryError>;
    /// Overwrites text and author and stamps the edit time.
    async fn update_text(&self, id: Uuid, text: &str, author: &str) -> Result<Comment, RepositoryError>;
    async fn like_delta(&self, id: Uuid, increment: bool) -> Result<Comment, RepositoryError>;
    /// Removes one row. Replies are left in place.
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
    /// Inserts the whole batch or nothing.
    async fn bulk_import(&self, comments: Vec<Comment>) -> Result<u64, RepositoryError>;
    async fn delete_all(&self) -> Result<u64, RepositoryError>;
}
