use uuid::Uuid;

use crate::domain::actor::Actor;
use crate::domain::comment::Comment;
use crate::usecase::contracts::CommentRepository;
use crate::usecase::error::UsecaseError;

/// Fields a client may supply when creating a comment.
#[derive(Debug, Clone, Default)]
pub struct NewCommentInput {
    pub text: String,
    pub image: Option<String>,
    pub author: Option<String>,
    pub parent: Option<Uuid>,
}

pub struct CommentsUseCase<C>
where
    C: CommentRepository,
{
    comment_repository: C,
}

impl<C> CommentsUseCase<C>
where
    C: CommentRepository,
{
    pub fn new(comment_repository: C) -> Self {
        Self { comment_repository }
    }

    pub fn hi(&self) -> &'static str {
        "hi"
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_comments(&self) -> Result<Vec<Comment>, UsecaseError> {
        tracing::debug!("listing comments");

        let comments = self.comment_repository.list().await?;

        tracing::debug!(count = comments.len(), "retrieved comments");
        Ok(comments)
    }

    #[tracing::instrument(skip(self, input), fields(actor = %actor.name, parent = ?input.parent))]
    pub async fn create_comment(&self, actor: &Actor, input: NewCommentInput) -> Result<Comment, UsecaseError> {
        tracing::debug!("creating comment");

        let author = actor.author_for(input.author);
        let comment = Comment::new(author, input.text, input.image, input.parent);
        self.comment_repository.create(&comment).await?;

        metrics::counter!("comments_created_total").increment(1);
        tracing::info!(comment_id = %comment.id, "comment created successfully");
        Ok(comment)
    }

    #[tracing::instrument(skip(self), fields(comment_id = %id))]
    pub async fn like_comment(&self, id: Uuid, increment: bool) -> Result<Comment, UsecaseError> {
        tracing::debug!("liking comment");

        self.ensure_exists(id).await?;
        let comment = self.comment_repository.like_delta(id, increment).await?;

        metrics::counter!("comment_likes_total", "direction" => if increment { "up" } else { "down" })
            .increment(1);
        tracing::info!(comment_id = %id, likes = comment.likes, "comment like applied");
        Ok(comment)
    }

    #[tracing::instrument(skip(self, text), fields(comment_id = %id, actor = %actor.name))]
    pub async fn update_comment(&self, actor: &Actor, id: Uuid, text: String) -> Result<Comment, UsecaseError> {
        tracing::debug!("updating comment");

        self.ensure_exists(id).await?;
        let comment = self
            .comment_repository
            .update_text(id, &text, &actor.name)
            .await?;

        metrics::counter!("comments_updated_total").increment(1);
        tracing::info!(comment_id = %id, "comment updated successfully");
        Ok(comment)
    }

    #[tracing::instrument(skip(self), fields(comment_id = %id))]
    pub async fn delete_comment(&self, id: Uuid) -> Result<(), UsecaseError> {
        tracing::debug!("deleting comment");

        self.ensure_exists(id).await?;
        self.comment_repository.delete(id).await?;

        metrics::counter!("comments_deleted_total").increment(1);
        tracing::info!(comment_id = %id, "comment deleted successfully");
        Ok(())
    }

    #[tracing::instrument(skip(self, comments), fields(count = comments.len()))]
    pub async fn import_comments(&self, comments: Vec<Comment>) -> Result<u64, UsecaseError> {
        tracing::debug!("importing comments");

        let imported = self.comment_repository.bulk_import(comments).await?;

        tracing::info!(imported, "comments imported successfully");
        Ok(imported)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_all_comments(&self) -> Result<u64, UsecaseError> {
        tracing::debug!("deleting all comments");

        let deleted = self.comment_repository.delete_all().await?;

        tracing::info!(deleted, "all comments deleted");
        Ok(deleted)
    }

    async fn ensure_exists(&self, id: Uuid) -> Result<(), UsecaseError> {
        if self.comment_repository.exists(id).await? {
            Ok(())
        } else {
            Err(UsecaseError::comment_not_found())
        }
    }
}
