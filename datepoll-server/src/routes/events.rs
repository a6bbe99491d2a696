//! Event endpoints

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post},
};

use datepoll_core::date::parse_date;
use datepoll_core::schema::{AddDates, CreateEvent, PatchEvent};
use datepoll_core::view::{EventView, Message};
use datepoll_core::EventSlot;

use crate::middleware::{ValidatedJson, no_body, resolve_event};
use crate::routes::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let open = Router::new()
        .route("/events", get(list_events).route_layer(from_fn(no_body)))
        .route("/events", post(create_event))
        .route("/events/{id}", get(get_event).route_layer(from_fn(no_body)));

    let with_body = Router::new()
        .route("/events/{id}", patch(patch_event))
        .route("/events/{id}/add_dates", post(add_dates))
        .route_layer(from_fn_with_state(state.clone(), resolve_event));

    let without_body = Router::new()
        .route("/events/{id}", delete(delete_event))
        .route("/events/delete/{id}/{date}", delete(delete_date))
        .route_layer(from_fn_with_state(state, resolve_event))
        .route_layer(from_fn(no_body));

    open.merge(with_body).merge(without_body)
}

/// GET /api/events - List all events, newest first
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventView>>, ApiError> {
    let book = state.book().await?;

    Ok(Json(book.events().iter().map(EventView::from).collect()))
}

/// GET /api/events/:id - Fetch one event
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventView>, ApiError> {
    let book = state.book().await?;

    Ok(Json(EventView::from(book.get(&id)?)))
}

/// POST /api/events - Create an event
async fn create_event(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateEvent>,
) -> Result<Json<EventView>, ApiError> {
    let mut book = state.book().await?;

    let view = EventView::from(book.create(body)?);
    state.save(&book).await?;

    tracing::info!(id = %view.id, name = %view.name, "event created");
    Ok(Json(view))
}

/// PATCH /api/events/:id - Change name, author, description or dates
async fn patch_event(
    State(state): State<AppState>,
    Extension(slot): Extension<EventSlot>,
    ValidatedJson(body): ValidatedJson<PatchEvent>,
) -> Result<Json<EventView>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("Nothing to update".to_string()));
    }

    let mut book = state.book().await?;

    let view = EventView::from(book.patch(&slot, body)?);
    state.save(&book).await?;

    tracing::info!(id = %slot.id, "event updated");
    Ok(Json(view))
}

/// DELETE /api/events/:id - Remove an event
async fn delete_event(
    State(state): State<AppState>,
    Extension(slot): Extension<EventSlot>,
) -> Result<Json<Message>, ApiError> {
    let mut book = state.book().await?;

    let removed = book.delete(&slot)?;
    state.save(&book).await?;

    tracing::info!(id = %removed.id, name = %removed.name, "event deleted");
    Ok(Json(Message::new("Delete successful")))
}

/// POST /api/events/:id/add_dates - Append candidate dates
async fn add_dates(
    State(state): State<AppState>,
    Extension(slot): Extension<EventSlot>,
    ValidatedJson(body): ValidatedJson<AddDates>,
) -> Result<Json<EventView>, ApiError> {
    let mut book = state.book().await?;

    let view = EventView::from(book.add_dates(&slot, body)?);
    state.save(&book).await?;

    tracing::info!(id = %slot.id, dates = view.dates.len(), "dates added");
    Ok(Json(view))
}

/// DELETE /api/events/delete/:id/:date - Remove a date from the event and
/// from every attendee
async fn delete_date(
    State(state): State<AppState>,
    Extension(slot): Extension<EventSlot>,
    Path((_, date)): Path<(String, String)>,
) -> Result<Json<Message>, ApiError> {
    let date = parse_date(&date)?;
    let mut book = state.book().await?;

    book.delete_date(&slot, date)?;
    state.save(&book).await?;

    tracing::info!(id = %slot.id, %date, "date deleted");
    Ok(Json(Message::new("Date deleted successfully")))
}
