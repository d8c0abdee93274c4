use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Body shape shared by every API response: `{"data": …}` on success,
/// `{"message": …}` when a checked precondition fails, `{}` when there is
/// nothing to return.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Data { data: T },
    Message { message: String },
    Empty {},
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Envelope::Data { data }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Envelope::Message {
            message: message.into(),
        }
    }

    pub fn empty() -> Self {
        Envelope::Empty {}
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = match &self {
            Envelope::Message { .. } => StatusCode::BAD_REQUEST,
            Envelope::Data { .. } | Envelope::Empty {} => StatusCode::OK,
        };
        (status, Json(self)).into_response()
    }
}
