//! Attendance endpoints

use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
};

use datepoll_core::schema::CreateAttendance;
use datepoll_core::view::{AttendeeSummary, EventView};
use datepoll_core::EventSlot;

use crate::middleware::{ValidatedJson, no_body, resolve_event};
use crate::routes::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    let answers = Router::new()
        .route("/events/{id}/attend", post(attend).patch(update_attendee))
        .route_layer(from_fn_with_state(state.clone(), resolve_event));

    let unattend = Router::new()
        .route(
            "/events/{id}/attendees/{attendee_name}",
            delete(remove_attendee),
        )
        .route_layer(from_fn_with_state(state, resolve_event))
        .route_layer(from_fn(no_body));

    let lookup = Router::new()
        .route("/attendees", get(list_attendees))
        .route("/attendees/{name}", get(get_attendee))
        .route_layer(from_fn(no_body));

    answers.merge(unattend).merge(lookup)
}

/// POST /api/events/:id/attend - Add an attendee
async fn attend(
    State(state): State<AppState>,
    Extension(slot): Extension<EventSlot>,
    ValidatedJson(body): ValidatedJson<CreateAttendance>,
) -> Result<Json<EventView>, ApiError> {
    let attendee = body.into_attendee()?;
    let name = attendee.name.clone();
    let mut book = state.book().await?;

    let view = EventView::from(book.attend(&slot, attendee)?);
    state.save(&book).await?;

    tracing::info!(id = %slot.id, attendee = %name, "attendee added");
    Ok(Json(view))
}

/// PATCH /api/events/:id/attend - Replace an attendee's answers
async fn update_attendee(
    State(state): State<AppState>,
    Extension(slot): Extension<EventSlot>,
    ValidatedJson(body): ValidatedJson<CreateAttendance>,
) -> Result<Json<EventView>, ApiError> {
    let attendee = body.into_attendee()?;
    let name = attendee.name.clone();
    let mut book = state.book().await?;

    let view = EventView::from(book.update_attendee(&slot, attendee)?);
    state.save(&book).await?;

    tracing::info!(id = %slot.id, attendee = %name, "attendee updated");
    Ok(Json(view))
}

/// DELETE /api/events/:id/attendees/:attendee_name - Remove an attendee
async fn remove_attendee(
    State(state): State<AppState>,
    Extension(slot): Extension<EventSlot>,
    Path((_, attendee_name)): Path<(String, String)>,
) -> Result<Json<EventView>, ApiError> {
    let mut book = state.book().await?;

    let view = EventView::from(book.remove_attendee(&slot, &attendee_name)?);
    state.save(&book).await?;

    tracing::info!(id = %slot.id, attendee = %attendee_name, "attendee removed");
    Ok(Json(view))
}

/// GET /api/attendees - Every attendee with the events they answered
async fn list_attendees(
    State(state): State<AppState>,
) -> Result<Json<Vec<AttendeeSummary>>, ApiError> {
    let book = state.book().await?;

    Ok(Json(book.attendees()))
}

/// GET /api/attendees/:name - One attendee across events
async fn get_attendee(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<AttendeeSummary>, ApiError> {
    let book = state.book().await?;

    Ok(Json(book.attendee_summary(&name)?))
}
