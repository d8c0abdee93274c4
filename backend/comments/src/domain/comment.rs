use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub author: String,
    pub text: String,
    pub image: Option<String>,
    pub date: DateTime<Utc>,
    pub likes: i32,
    pub parent: Option<Uuid>,
}

impl Comment {
    pub fn new(author: String, text: String, image: Option<String>, parent: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author,
            text,
            image: image.filter(|url| !url.trim().is_empty()),
            date: Utc::now(),
            likes: 0,
            parent,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A fully specified record from a fixture file. Unlike [`Comment::new`],
/// nothing is generated: id, date and likes are taken as given.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportedComment {
    pub id: Uuid,
    pub author: String,
    pub text: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub likes: i32,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "blank_uuid_as_none")]
    pub parent: Option<Uuid>,
}

/// Reads an optional UUID where `""` also means "none".
pub fn blank_uuid_as_none<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => Uuid::parse_str(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl From<ImportedComment> for Comment {
    fn from(record: ImportedComment) -> Self {
        Self {
            id: record.id,
            author: record.author,
            text: record.text,
            image: record.image.filter(|url| !url.trim().is_empty()),
            date: record.date,
            likes: record.likes,
            parent: record.parent,
        }
    }
}
