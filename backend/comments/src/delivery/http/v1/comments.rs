use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::delivery::http::v1::envelope::Envelope;
use crate::domain::actor::Actor;
use crate::domain::comment::{blank_uuid_as_none, Comment};
use crate::usecase::comments::NewCommentInput;
use crate::usecase::error::UsecaseError;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, message = "Comment text is required."))]
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "blank_uuid_as_none")]
    pub parent: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, message = "Comment text is required."))]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct LikeCommentRequest {
    pub increment: bool,
}

/// Ids that are not UUIDs cannot name a stored comment.
fn parse_comment_id(raw: &str) -> Result<Uuid, UsecaseError> {
    Uuid::parse_str(raw).map_err(|_| {
        tracing::debug!(%raw, "malformed comment id");
        UsecaseError::comment_not_found()
    })
}

/// Malformed or mistyped bodies get the same `{message}` reply as any other
/// rejected request.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, UsecaseError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection, "request body rejected");
        UsecaseError::Validation(rejection.body_text())
    })
}

fn validation_error(errors: validator::ValidationErrors) -> UsecaseError {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errors| errors.iter())
        .filter_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| format!("{}", errors));
    UsecaseError::Validation(message)
}

#[tracing::instrument(skip(state))]
pub async fn list_comments(
    State(state): State<Arc<AppState>>,
) -> Result<Envelope<Vec<Comment>>, UsecaseError> {
    tracing::debug!("handling list comments request");

    let comments = state.comments_usecase.list_comments().await?;

    tracing::debug!(count = comments.len(), "comments listed successfully");
    Ok(Envelope::data(comments))
}

#[tracing::instrument(skip(state, payload), fields(actor = %actor.name))]
pub async fn create_comment(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<Envelope<Comment>, UsecaseError> {
    let payload = json_body(payload)?;
    tracing::debug!("handling create comment request");

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(?validation_errors, "validation failed");
        return Err(validation_error(validation_errors));
    }

    let comment = state
        .comments_usecase
        .create_comment(
            &actor,
            NewCommentInput {
                text: payload.text,
                image: payload.image,
                author: payload.author,
                parent: payload.parent,
            },
        )
        .await?;

    tracing::debug!(comment_id = %comment.id, "comment created successfully");
    Ok(Envelope::data(comment))
}

#[tracing::instrument(skip(state, payload))]
pub async fn like_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<LikeCommentRequest>, JsonRejection>,
) -> Result<Envelope<Comment>, UsecaseError> {
    let payload = json_body(payload)?;
    tracing::debug!(increment = payload.increment, "handling like comment request");

    let id = parse_comment_id(&id)?;
    let comment = state
        .comments_usecase
        .like_comment(id, payload.increment)
        .await?;

    tracing::debug!(comment_id = %id, likes = comment.likes, "comment liked successfully");
    Ok(Envelope::data(comment))
}

#[tracing::instrument(skip(state, payload), fields(actor = %actor.name))]
pub async fn update_comment(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateCommentRequest>, JsonRejection>,
) -> Result<Envelope<Comment>, UsecaseError> {
    let payload = json_body(payload)?;
    tracing::debug!("handling update comment request");

    let id = parse_comment_id(&id)?;

    if let Err(validation_errors) = payload.validate() {
        tracing::warn!(comment_id = %id, ?validation_errors, "validation failed");
        return Err(validation_error(validation_errors));
    }

    let comment = state
        .comments_usecase
        .update_comment(&actor, id, payload.text)
        .await?;

    tracing::debug!(comment_id = %id, "comment updated successfully");
    Ok(Envelope::data(comment))
}

#[tracing::instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Envelope<()>, UsecaseError> {
    tracing::debug!("handling delete comment request");

    let id = parse_comment_id(&id)?;
    state.comments_usecase.delete_comment(id).await?;

    tracing::debug!(comment_id = %id, "comment deleted successfully");
    Ok(Envelope::empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_comment_request_validation_valid() {
        let request: CreateCommentRequest =
            serde_json::from_str(r#"{"text":"Hello","image":"https://example.com/a.png"}"#).unwrap();

        assert!(request.validate().is_ok());
        assert!(request.author.is_none());
        assert!(request.parent.is_none());
    }

    #[test]
    fn test_create_comment_request_validation_empty_text() {
        let request = CreateCommentRequest {
            text: "".to_string(),
            image: None,
            author: None,
            parent: None,
        };

        let message = request.validate().map_err(validation_error).unwrap_err().to_string();
        assert_eq!(message, "Comment text is required.");
    }

    #[test]
    fn test_create_comment_request_parent() {
        let parent = Uuid::new_v4();
        let json = format!(r#"{{"text":"reply","parent":"{}"}}"#, parent);
        let request: CreateCommentRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.parent, Some(parent));

        let blank: CreateCommentRequest = serde_json::from_str(r#"{"text":"root","parent":""}"#).unwrap();
        assert!(blank.parent.is_none());

        let null: CreateCommentRequest = serde_json::from_str(r#"{"text":"root","parent":null}"#).unwrap();
        assert!(null.parent.is_none());

        assert!(serde_json::from_str::<CreateCommentRequest>(r#"{"text":"x","parent":"nope"}"#).is_err());
    }

    #[test]
    fn test_update_comment_request_validation() {
        assert!(UpdateCommentRequest { text: "edited".to_string() }.validate().is_ok());
        assert!(UpdateCommentRequest { text: "".to_string() }.validate().is_err());
    }

    #[test]
    fn test_parse_comment_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_comment_id(&id.to_string()).unwrap(), id);

        let err = parse_comment_id("42").unwrap_err();
        assert_eq!(err.to_string(), "Comment not found.");
    }
}
