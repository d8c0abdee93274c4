use axum::{extract::Request, middleware::Next, response::Response};

use crate::domain::actor::Actor;

/// Attaches the acting [`Actor`] to the request. Without an identity model
/// every caller is the default admin.
pub async fn actor_middleware(mut request: Request, next: Next) -> Response {
    let actor = Actor::admin();

    tracing::trace!(actor = %actor.name, "actor attached");
    request.extensions_mut().insert(actor);

    next.run(request).await
}
