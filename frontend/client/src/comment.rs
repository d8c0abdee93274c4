use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment as the API returns it. Ids are opaque to the client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author: String,
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    pub date: DateTime<Utc>,
    pub likes: i64,
    #[serde(default)]
    pub parent: Option<String>,
}

impl Comment {
    /// Parent id, with `""` read as no parent.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref().filter(|parent| !parent.is_empty())
    }

    pub fn is_root(&self) -> bool {
        self.parent_id().is_none()
    }
}

/// Body of `POST /comments/create`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewComment {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_parent_is_root() {
        let comment: Comment = serde_json::from_value(serde_json::json!({
            "id": "a",
            "author": "Admin",
            "text": "hello",
            "date": "2024-01-01T00:00:00Z",
            "likes": 0,
            "parent": ""
        }))
        .unwrap();

        assert!(comment.is_root());
        assert!(comment.image.is_none());
    }

    #[test]
    fn test_new_comment_skips_unset_fields() {
        let body = serde_json::to_value(NewComment {
            text: "hi".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({ "text": "hi" }));
    }
}
