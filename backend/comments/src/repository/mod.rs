pub mod errors;
pub mod memory;
pub mod postgres;

use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::repository::errors::RepositoryError;
use crate::repository::memory::InMemoryCommentRepository;
use crate::repository::postgres::PostgresCommentRepository;
use crate::usecase::contracts::CommentRepository;

/// The storage backend picked at startup.
pub enum CommentStore {
    Postgres(PostgresCommentRepository),
    Memory(InMemoryCommentRepository),
}

impl CommentStore {
    pub fn backend_name(&self) -> &'static str {
        match self {
            CommentStore::Postgres(_) => "postgres",
            CommentStore::Memory(_) => "memory",
        }
    }
}

impl CommentRepository for CommentStore {
    async fn list(&self) -> Result<Vec<Comment>, RepositoryError> {
        match self {
            CommentStore::Postgres(repo) => repo.list().await,
            CommentStore::Memory(repo) => repo.list().await,
        }
    }

    async fn exists(&self, id: Uuid) -> Result<bool, RepositoryError> {
        match self {
            CommentStore::Postgres(repo) => repo.exists(id).await,
            CommentStore::Memory(repo) => repo.exists(id).await,
        }
    }

    async fn create(&self, comment: &Comment) -> Result<(), RepositoryError> {
        match self {
            CommentStore::Postgres(repo) => repo.create(comment).await,
            CommentStore::Memory(repo) => repo.create(comment).await,
        }
    }

    async fn update_text(&self, id: Uuid, text: &str, author: &str) -> Result<Comment, RepositoryError> {
        match self {
            CommentStore::Postgres(repo) => repo.update_text(id, text, author).await,
            CommentStore::Memory(repo) => repo.update_text(id, text, author).await,
        }
    }

    async fn like_delta(&self, id: Uuid, increment: bool) -> Result<Comment, RepositoryError> {
        match self {
            CommentStore::Postgres(repo) => repo.like_delta(id, increment).await,
            CommentStore::Memory(repo) => repo.like_delta(id, increment).await,
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        match self {
            CommentStore::Postgres(repo) => repo.delete(id).await,
            CommentStore::Memory(repo) => repo.delete(id).await,
        }
    }

    async fn bulk_import(&self, comments: Vec<Comment>) -> Result<u64, RepositoryError> {
        match self {
            CommentStore::Postgres(repo) => repo.bulk_import(comments).await,
            CommentStore::Memory(repo) => repo.bulk_import(comments).await,
        }
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        match self {
            CommentStore::Postgres(repo) => repo.delete_all().await,
            CommentStore::Memory(repo) => repo.delete_all().await,
        }
    }
}
