use std::fmt::Write;

use crate::api::{ApiError, CommentsApi};
use crate::comment::{Comment, NewComment};
use crate::forest::Forest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Viewing,
    Editing,
}

#[derive(Debug)]
struct EditState {
    id: String,
    buffer: String,
}

/// The new-comment form. `parent` is set when replying.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ComposeForm {
    pub text: String,
    pub image: String,
    pub parent: Option<String>,
}

impl ComposeForm {
    fn to_request(&self) -> NewComment {
        let image = self.image.trim();
        NewComment {
            text: self.text.clone(),
            image: (!image.is_empty()).then(|| image.to_string()),
            parent: self.parent.clone(),
        }
    }
}

/// Client-side state of the comment page. Every mutation is followed by a
/// full refetch; API failures end up in `notifications` instead of being
/// returned.
pub struct CommentsView<A: CommentsApi> {
    api: A,
    forest: Forest,
    editing: Option<EditState>,
    compose: ComposeForm,
    notifications: Vec<String>,
}

impl<A: CommentsApi> CommentsView<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            forest: Forest::default(),
            editing: None,
            compose: ComposeForm::default(),
            notifications: Vec::new(),
        }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notifications)
    }

    fn notify(&mut self, error: ApiError) {
        tracing::warn!(error = %error, "comments API call failed");
        self.notifications.push(error.user_message());
    }

    pub async fn refresh(&mut self) {
        let result = self.api.list().await;
        match result {
            Ok(comments) => {
                tracing::debug!(count = comments.len(), "comments fetched");
                self.forest = Forest::build(comments);
            }
            Err(e) => self.notify(e),
        }
    }

    fn find(&self, id: &str) -> Option<&Comment> {
        self.forest
            .walk()
            .into_iter()
            .map(|(_, comment)| comment)
            .find(|comment| comment.id == id)
    }

    pub fn mode(&self, id: &str) -> Mode {
        match &self.editing {
            Some(edit) if edit.id == id => Mode::Editing,
            _ => Mode::Viewing,
        }
    }

    /// Starts editing `id` with its current text. Any other edit in progress
    /// is discarded. Returns false if the comment is not shown.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        let Some(text) = self.find(id).map(|comment| comment.text.clone()) else {
            return false;
        };
        self.editing = Some(EditState {
            id: id.to_string(),
            buffer: text,
        });
        true
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        self.editing.as_ref().map(|edit| edit.buffer.as_str())
    }

    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(edit) = self.editing.as_mut() {
            edit.buffer = text.into();
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Submits the edit buffer. On failure the comment stays in edit mode.
    pub async fn save_edit(&mut self) {
        let Some(edit) = self.editing.as_ref() else {
            return;
        };

        let result = self.api.update(&edit.id, &edit.buffer).await;
        match result {
            Ok(_) => {
                self.editing = None;
                self.refresh().await;
            }
            Err(e) => self.notify(e),
        }
    }

    pub async fn like(&mut self, id: &str, increment: bool) {
        let result = self.api.like(id, increment).await;
        if let Err(e) = result {
            self.notify(e);
        }
        self.refresh().await;
    }

    pub async fn delete(&mut self, id: &str) {
        let result = self.api.delete(id).await;
        if let Err(e) = result {
            self.notify(e);
        }
        if self.editing.as_ref().is_some_and(|edit| edit.id == id) {
            self.editing = None;
        }
        self.refresh().await;
    }

    pub fn compose(&self) -> &ComposeForm {
        &self.compose
    }

    pub fn set_compose_text(&mut self, text: impl Into<String>) {
        self.compose.text = text.into();
    }

    pub fn set_compose_image(&mut self, image: impl Into<String>) {
        self.compose.image = image.into();
    }

    pub fn reply_to(&mut self, parent: Option<String>) {
        self.compose.parent = parent;
    }

    pub fn can_submit(&self) -> bool {
        !self.compose.text.trim().is_empty()
    }

    /// Creates the composed comment. Refused while the text is blank; the
    /// form is only cleared once the server accepted it.
    pub async fn submit_compose(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }

        let result = self.api.create(&self.compose.to_request()).await;
        match result {
            Ok(created) => {
                tracing::debug!(id = %created.id, "comment created");
                self.compose = ComposeForm::default();
                self.refresh().await;
                true
            }
            Err(e) => {
                self.notify(e);
                false
            }
        }
    }

    /// Plain-text rendering of the forest, two spaces of indent per level.
    pub fn render(&self) -> String {
        if self.forest.is_empty() {
            return "No comments yet.\n".to_string();
        }

        let mut out = String::new();
        for (depth, comment) in self.forest.walk() {
            let indent = "  ".repeat(depth);
            let _ = writeln!(
                out,
                "{indent}[{}] {} | {} | {} likes",
                comment.id,
                comment.author,
                comment.date.format("%Y-%m-%d %H:%M"),
                comment.likes
            );

            match (self.mode(&comment.id), self.edit_buffer()) {
                (Mode::Editing, Some(buffer)) => {
                    let _ = writeln!(out, "{indent}  (editing) {buffer}");
                }
                _ => {
                    let _ = writeln!(out, "{indent}  {}", comment.text);
                }
            }

            if let Some(image) = &comment.image {
                let _ = writeln!(out, "{indent}  image: {image}");
            }
        }
        out
    }
}
