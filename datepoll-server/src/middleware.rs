//! Request pipeline pieces shared by the routes.
//!
//! Routes compose these in order: `no_body` rejects stray payloads,
//! `resolve_event` checks the `{id}` path segment and stores the event's
//! slot for the handler, and handlers taking a body use [`ValidatedJson`].

use std::collections::HashMap;

use axum::{
    Json,
    body::HttpBody,
    extract::{FromRequest, Path, Request, State},
    middleware::Next,
    response::Response,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::routes::ApiError;
use crate::state::AppState;

/// Reject requests that carry a body on routes that take none.
pub async fn no_body(req: Request, next: Next) -> Result<Response, ApiError> {
    if req.body().size_hint().exact() != Some(0) {
        return Err(ApiError::BadRequest(
            "This route does not accept a request body".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

/// Resolve the `{id}` path parameter to a stored event.
///
/// Fails with 404 when no event has that id. On success the event's
/// [`EventSlot`](datepoll_core::EventSlot) is added to the request
/// extensions for the handler.
pub async fn resolve_event(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let id = params
        .get("id")
        .ok_or_else(|| ApiError::BadRequest("Missing event id".to_string()))?;

    let slot = state.book().await?.slot(id).inspect_err(|_| {
        tracing::debug!(%id, "event not found");
    })?;

    req.extensions_mut().insert(slot);
    Ok(next.run(req).await)
}

/// JSON body that has passed its schema's [`Validate`] checks.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
