use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use comments_client::api::{ApiError, CommentsApi};
use comments_client::comment::{Comment, NewComment};
use comments_client::forest::Forest;
use comments_client::view::{ComposeForm, CommentsView, Mode};

fn comment(id: &str, parent: &str, day: u32) -> Comment {
    Comment {
        id: id.to_string(),
        author: "Admin".to_string(),
        text: format!("text of {id}"),
        image: None,
        date: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        likes: 0,
        parent: Some(parent.to_string()),
    }
}

/// Serves a fixed list and records every call.
struct RecordingApi {
    comments: Vec<Comment>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingApi {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn lookup(&self, id: &str) -> Result<Comment, ApiError> {
        self.comments
            .iter()
            .find(|comment| comment.id == id)
            .cloned()
            .ok_or(ApiError::Server {
                status: 400,
                message: Some("Comment not found.".to_string()),
            })
    }
}

impl CommentsApi for RecordingApi {
    async fn hi(&self) -> Result<String, ApiError> {
        self.record("hi");
        Ok("hi".to_string())
    }

    async fn list(&self) -> Result<Vec<Comment>, ApiError> {
        self.record("list");
        Ok(self.comments.clone())
    }

    async fn like(&self, id: &str, increment: bool) -> Result<Comment, ApiError> {
        self.record(format!("like {id} {increment}"));
        self.lookup(id)
    }

    async fn update(&self, id: &str, text: &str) -> Result<Comment, ApiError> {
        self.record(format!("update {id} {text}"));
        self.lookup(id)
    }

    async fn create(&self, new_comment: &NewComment) -> Result<Comment, ApiError> {
        self.record(format!("create {}", new_comment.text));
        Ok(comment("created", "", 9))
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.record(format!("delete {id}"));
        self.lookup(id).map(|_| ())
    }
}

fn view_over(comments: Vec<Comment>) -> (CommentsView<RecordingApi>, Arc<Mutex<Vec<String>>>) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let api = RecordingApi {
        comments,
        calls: calls.clone(),
    };
    (CommentsView::new(api), calls)
}

#[test]
fn test_forest_traversal_through_public_api() {
    let forest = Forest::build(vec![
        comment("old", "", 1),
        comment("new", "", 2),
        comment("reply", "old", 3),
        comment("stray", "gone", 4),
    ]);

    let roots: Vec<_> = forest.roots().collect();
    assert_eq!(roots.len(), 2);
    assert_eq!(roots[0].comment().id, "new");
    assert!(roots[0].comment().is_root());

    let replies: Vec<_> = roots[1].replies().map(|node| node.comment().id.clone()).collect();
    assert_eq!(replies, vec!["reply"]);

    assert_eq!(forest.visible_count(), 3);
    assert_eq!(forest.orphans().count(), 1);
}

#[tokio::test]
async fn test_cancel_edit_returns_to_viewing_without_calls() {
    let (mut view, calls) = view_over(vec![comment("a", "", 1)]);
    view.refresh().await;

    assert!(view.begin_edit("a"));
    view.set_edit_text("draft");
    assert_eq!(view.mode("a"), Mode::Editing);

    view.cancel_edit();

    assert_eq!(view.mode("a"), Mode::Viewing);
    assert!(view.render().contains("text of a"));
    assert!(view.notifications().is_empty());
    assert_eq!(*calls.lock().unwrap(), vec!["list".to_string()]);
}

#[tokio::test]
async fn test_mutations_refetch() {
    let (mut view, calls) = view_over(vec![comment("a", "", 1)]);
    view.refresh().await;

    view.begin_edit("a");
    view.set_edit_text("edited");
    view.save_edit().await;
    view.like("a", true).await;
    view.set_compose_text("hello");
    assert!(view.submit_compose().await);
    assert_eq!(view.compose(), &ComposeForm::default());
    view.delete("missing").await;

    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            "list", "update a edited", "list", "like a true", "list", "create hello", "list", "delete missing",
            "list",
        ]
    );
    assert_eq!(view.notifications(), ["Comment not found.".to_string()]);
}
