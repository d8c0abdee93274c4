use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::comment::{Comment, NewComment};

pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred while calling the API.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("server responded with {status}")]
    Server { status: u16, message: Option<String> },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response carried no data")]
    MissingData,
}

impl ApiError {
    /// What the user gets to see: the server's message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            _ => DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    message: Option<String>,
}

/// Calls are awaited on the caller's task, so the futures need not be `Send`.
#[allow(async_fn_in_trait)]
#[cfg_attr(test, mockall::automock)]
pub trait CommentsApi {
    async fn hi(&self) -> Result<String, ApiError>;
    async fn list(&self) -> Result<Vec<Comment>, ApiError>;
    async fn like(&self, id: &str, increment: bool) -> Result<Comment, ApiError>;
    async fn update(&self, id: &str, text: &str) -> Result<Comment, ApiError>;
    async fn create(&self, comment: &NewComment) -> Result<Comment, ApiError>;
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

pub struct ApiClient {
    http_client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .user_agent(concat!("comments-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        tracing::debug!(%base_url, "API client created");

        Ok(Self {
            http_client,
            base_url,
        })
    }

    async fn call<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Envelope<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "calling comments API");

        let mut request = self.http_client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, %url, "request to comments API failed");
            ApiError::from(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<Envelope<serde_json::Value>>(&bytes)
                .ok()
                .and_then(|envelope| envelope.message);
            tracing::warn!(%status, ?message, "comments API returned error");
            return Err(ApiError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn fetch<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call(method, path, body)
            .await?
            .data
            .ok_or(ApiError::MissingData)
    }
}

impl CommentsApi for ApiClient {
    async fn hi(&self) -> Result<String, ApiError> {
        self.fetch::<(), _>(Method::GET, "/hi", None).await
    }

    async fn list(&self) -> Result<Vec<Comment>, ApiError> {
        self.fetch::<(), _>(Method::GET, "/comments", None).await
    }

    async fn like(&self, id: &str, increment: bool) -> Result<Comment, ApiError> {
        let body = json!({ "increment": increment });
        self.fetch(Method::POST, &format!("/comments/like/{id}"), Some(&body))
            .await
    }

    async fn update(&self, id: &str, text: &str) -> Result<Comment, ApiError> {
        let body = json!({ "text": text });
        self.fetch(Method::PUT, &format!("/comments/update/{id}"), Some(&body))
            .await
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, ApiError> {
        self.fetch(Method::POST, "/comments/create", Some(comment)).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.call::<(), serde_json::Value>(Method::DELETE, &format!("/comments/delete/{id}"), None)
            .await?;
        Ok(())
    }
}
