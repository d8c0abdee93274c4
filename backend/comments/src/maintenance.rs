use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::domain::comment::{Comment, ImportedComment};
use crate::usecase::comments::CommentsUseCase;
use crate::usecase::contracts::CommentRepository;

/// Layout of the seed file: `{"comments": [...]}`.
#[derive(Debug, Deserialize)]
pub struct CommentFixture {
    pub comments: Vec<ImportedComment>,
}

pub fn read_fixture(path: &Path) -> anyhow::Result<Vec<Comment>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read fixture {}", path.display()))?;
    let fixture: CommentFixture = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse fixture {}", path.display()))?;

    Ok(fixture.comments.into_iter().map(Comment::from).collect())
}

pub async fn import_comments<C: CommentRepository>(
    usecase: &CommentsUseCase<C>,
    path: &Path,
) -> anyhow::Result<u64> {
    let comments = read_fixture(path)?;
    tracing::info!(path = %path.display(), count = comments.len(), "importing fixture");

    let imported = usecase
        .import_comments(comments)
        .await
        .context("failed to import comments")?;

    tracing::info!(imported, "comments imported");
    Ok(imported)
}

pub async fn delete_all_comments<C: CommentRepository>(usecase: &CommentsUseCase<C>) -> anyhow::Result<u64> {
    let deleted = usecase
        .delete_all_comments()
        .await
        .context("failed to delete all comments")?;

    tracing::info!(deleted, "all data deleted from the database");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::repository::memory::InMemoryCommentRepository;

    const FIXTURE: &str = r#"{
        "comments": [
            {
                "id": "0d9b6c1e-4c9a-4f55-a9f4-8f0b7b0e2c01",
                "author": "Admin",
                "text": "Root",
                "date": "2024-01-02T00:00:00Z",
                "likes": 4,
                "image": "https://example.com/root.png"
            },
            {
                "id": "0d9b6c1e-4c9a-4f55-a9f4-8f0b7b0e2c02",
                "author": "Guest",
                "text": "Reply",
                "date": "2024-01-01T00:00:00Z",
                "likes": -1,
                "image": "",
                "parent": "0d9b6c1e-4c9a-4f55-a9f4-8f0b7b0e2c01"
            }
        ]
    }"#;

    fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_import_preserves_fields() {
        let file = write_fixture(FIXTURE);
        let usecase = CommentsUseCase::new(InMemoryCommentRepository::new());

        let imported = import_comments(&usecase, file.path()).await.unwrap();
        assert_eq!(imported, 2);

        let comments = usecase.list_comments().await.unwrap();
        assert_eq!(comments.len(), 2);

        let root = &comments[0];
        assert_eq!(root.id.to_string(), "0d9b6c1e-4c9a-4f55-a9f4-8f0b7b0e2c01");
        assert_eq!(root.author, "Admin");
        assert_eq!(root.text, "Root");
        assert_eq!(root.likes, 4);
        assert_eq!(root.image.as_deref(), Some("https://example.com/root.png"));
        assert!(root.parent.is_none());

        let reply = &comments[1];
        assert_eq!(reply.author, "Guest");
        assert_eq!(reply.likes, -1);
        assert!(reply.image.is_none());
        assert_eq!(reply.parent, Some(root.id));
        assert_eq!(reply.date.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_import_reads_blank_parent_as_root() {
        let file = write_fixture(
            r#"{
                "comments": [
                    {
                        "id": "0d9b6c1e-4c9a-4f55-a9f4-8f0b7b0e2c03",
                        "author": "Admin",
                        "text": "Exported root",
                        "date": "2024-01-03T00:00:00Z",
                        "likes": 0,
                        "image": "",
                        "parent": ""
                    }
                ]
            }"#,
        );
        let usecase = CommentsUseCase::new(InMemoryCommentRepository::new());

        assert_eq!(import_comments(&usecase, file.path()).await.unwrap(), 1);

        let comments = usecase.list_comments().await.unwrap();
        assert_eq!(comments.len(), 1);
        assert!(comments[0].is_root());
        assert!(comments[0].image.is_none());
    }

    #[tokio::test]
    async fn test_import_twice_fails_without_partial_writes() {
        let file = write_fixture(FIXTURE);
        let usecase = CommentsUseCase::new(InMemoryCommentRepository::new());

        import_comments(&usecase, file.path()).await.unwrap();
        assert!(import_comments(&usecase, file.path()).await.is_err());
        assert_eq!(usecase.list_comments().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_fixture_is_an_error() {
        let file = write_fixture(r#"{"items": []}"#);
        let usecase = CommentsUseCase::new(InMemoryCommentRepository::new());

        let err = import_comments(&usecase, file.path()).await.unwrap_err();
        assert!(err.to_string().contains("failed to parse fixture"));
    }

    #[tokio::test]
    async fn test_delete_all_comments() {
        let file = write_fixture(FIXTURE);
        let usecase = CommentsUseCase::new(InMemoryCommentRepository::new());
        import_comments(&usecase, file.path()).await.unwrap();

        assert_eq!(delete_all_comments(&usecase).await.unwrap(), 2);
        assert!(usecase.list_comments().await.unwrap().is_empty());
    }
}
