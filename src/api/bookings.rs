//! Booking endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::booking::{AdminBooking, BookingDetails, CreateBooking, RsvpStatus, UpdateBooking},
};

use super::{auth::MessageResponse, AuthenticatedUser};

/// RSVP request
#[derive(Deserialize, ToSchema)]
pub struct RsvpRequest {
    /// "accepted" or "declined"
    pub status: String,
}

/// Attachment upload response
#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub file_url: String,
}

/// Get the caller's bookings: owned plus invited
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own and invited bookings", body = Vec<BookingDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let bookings = state.services.bookings.list_for_user(claims.user_id).await?;
    Ok(Json(bookings))
}

/// Get all bookings (admin)
#[utoipa::path(
    get,
    path = "/bookings/all",
    tag = "bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All bookings", body = Vec<AdminBooking>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_all_bookings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<AdminBooking>>> {
    claims.require_admin()?;

    let bookings = state.services.bookings.list_all().await?;
    Ok(Json(bookings))
}

/// Create a booking
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created", body = BookingDetails),
        (status = 400, description = "Overlap, capacity or validation failure"),
        (status = 404, description = "Resource not found")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<BookingDetails>)> {
    let booking = state.services.bookings.create(claims.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Reschedule a booking
#[utoipa::path(
    put,
    path = "/bookings/{id}",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Booking ID")
    ),
    request_body = UpdateBooking,
    responses(
        (status = 200, description = "Booking rescheduled", body = BookingDetails),
        (status = 400, description = "Overlap or validation failure"),
        (status = 403, description = "Not the owner or an admin"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn update_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateBooking>,
) -> AppResult<Json<BookingDetails>> {
    let booking = state
        .services
        .bookings
        .reschedule(id, &claims, request)
        .await?;
    Ok(Json(booking))
}

/// Cancel a booking
#[utoipa::path(
    delete,
    path = "/bookings/{id}",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking cancelled", body = MessageResponse),
        (status = 403, description = "Not the owner or an admin"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn cancel_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    state.services.bookings.cancel(id, &claims).await?;
    Ok(Json(MessageResponse {
        message: "Booking cancelled".to_string(),
    }))
}

/// RSVP to a booking invitation
#[utoipa::path(
    put,
    path = "/bookings/{id}/rsvp",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Booking ID")
    ),
    request_body = RsvpRequest,
    responses(
        (status = 200, description = "RSVP recorded", body = BookingDetails),
        (status = 400, description = "Invalid RSVP status"),
        (status = 404, description = "Booking not found or caller not invited")
    )
)]
pub async fn rsvp_booking(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<RsvpRequest>,
) -> AppResult<Json<BookingDetails>> {
    let status: RsvpStatus = request
        .status
        .parse()
        .map_err(|_| AppError::Validation("Invalid RSVP status".to_string()))?;

    let booking = state.services.bookings.rsvp(id, &claims, status).await?;
    Ok(Json(booking))
}

/// Upload an attachment for a booking (multipart field `file`)
#[utoipa::path(
    post,
    path = "/bookings/{id}/upload",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "File uploaded", body = UploadResponse),
        (status = 400, description = "No file uploaded"),
        (status = 403, description = "Not the owner or an admin"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn upload_attachment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid file field: {}", e)))?;

            let file_url = state
                .services
                .bookings
                .attach(id, &claims, &bytes, &file_name)
                .await?;

            return Ok(Json(UploadResponse {
                message: "File uploaded successfully".to_string(),
                file_url,
            }));
        }
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}
