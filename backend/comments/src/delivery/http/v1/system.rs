use std::sync::Arc;

use axum::extract::State;

use crate::delivery::http::v1::envelope::Envelope;
use crate::AppState;

pub async fn hi(State(state): State<Arc<AppState>>) -> Envelope<&'static str> {
    Envelope::data(state.comments_usecase.hi())
}

#[tracing::instrument]
pub async fn healthz() -> &'static str {
    "OK"
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    metrics_process::Collector::default().collect();
    state.metrics_handle.render()
}
