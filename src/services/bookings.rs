//! Booking lifecycle service
//!
//! Orchestrates create/reschedule/cancel/RSVP: validates capacity and
//! ownership, drives the availability check, and fires best-effort
//! notifications after state changes commit.

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{
            parse_date, parse_time, AdminBooking, Booking, BookingDetails, BookingPatch,
            BookingStatus, CreateBooking, NewBooking, RsvpStatus, UpdateBooking,
        },
        user::UserClaims,
    },
    repository::Repository,
    services::{email::EmailService, storage::StorageService},
};

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
    email: EmailService,
    storage: StorageService,
}

impl BookingsService {
    pub fn new(repository: Repository, email: EmailService, storage: StorageService) -> Self {
        Self {
            repository,
            email,
            storage,
        }
    }

    /// Create a booking with its attendee invitations
    pub async fn create(&self, owner_id: i32, data: CreateBooking) -> AppResult<BookingDetails> {
        let booking_date = parse_date(&data.booking_date)?;
        let start_time = parse_time(&data.start_time)?;
        let end_time = parse_time(&data.end_time)?;

        if start_time >= end_time {
            return Err(AppError::Validation(
                "start_time must be before end_time".to_string(),
            ));
        }

        let resource = self.repository.resources.get_by_id(data.resource_id).await?;
        if !resource.is_active {
            return Err(AppError::Validation(
                "Resource is not available for booking".to_string(),
            ));
        }

        let attendee_ids = dedup_attendees(owner_id, data.attendee_ids.as_deref().unwrap_or(&[]));
        ensure_capacity(resource.capacity, attendee_ids.len())?;

        let available = self
            .repository
            .bookings
            .is_available(data.resource_id, booking_date, start_time, end_time, None)
            .await?;
        if !available {
            return Err(AppError::Conflict(
                "Resource is not available at this time".to_string(),
            ));
        }

        let booking_id = self
            .repository
            .bookings
            .create(&NewBooking {
                user_id: owner_id,
                resource_id: data.resource_id,
                booking_date,
                start_time,
                end_time,
                notes: data.notes,
                attendee_ids,
            })
            .await?;

        let details = self.repository.bookings.find_details(booking_id, owner_id).await?;
        self.notify_invitees(&details);
        Ok(details)
    }

    /// Reschedule a booking; only the owner or an admin may do so
    pub async fn reschedule(
        &self,
        booking_id: i32,
        claims: &UserClaims,
        data: UpdateBooking,
    ) -> AppResult<BookingDetails> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;
        authorize_owner(booking.user_id, claims)?;

        let patch = BookingPatch {
            resource_id: data.resource_id,
            booking_date: data.booking_date.as_deref().map(parse_date).transpose()?,
            start_time: data.start_time.as_deref().map(parse_time).transpose()?,
            end_time: data.end_time.as_deref().map(parse_time).transpose()?,
            notes: data.notes,
        };

        // Moving to another resource requires that resource to be bookable
        if let Some(resource_id) = patch.resource_id {
            let resource = self.repository.resources.get_by_id(resource_id).await?;
            if !resource.is_active {
                return Err(AppError::Validation(
                    "Resource is not available for booking".to_string(),
                ));
            }
        }

        // Effective interval after the patch is applied
        let resource_id = patch.resource_id.unwrap_or(booking.resource_id);
        let date = patch.booking_date.unwrap_or(booking.booking_date);
        let start = patch.start_time.unwrap_or(booking.start_time);
        let end = patch.end_time.unwrap_or(booking.end_time);

        if start >= end {
            return Err(AppError::Validation(
                "start_time must be before end_time".to_string(),
            ));
        }

        // The booking must not conflict with itself
        let available = self
            .repository
            .bookings
            .is_available(resource_id, date, start, end, Some(booking_id))
            .await?;
        if !available {
            return Err(AppError::Conflict(
                "Resource is not available at this time".to_string(),
            ));
        }

        self.repository.bookings.update(booking_id, &patch).await?;
        self.repository
            .bookings
            .find_details(booking_id, claims.user_id)
            .await
    }

    /// Cancel a booking. Cancelling an already-cancelled booking succeeds.
    pub async fn cancel(&self, booking_id: i32, claims: &UserClaims) -> AppResult<()> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;
        authorize_owner(booking.user_id, claims)?;

        self.repository
            .bookings
            .set_status(booking_id, BookingStatus::Cancelled)
            .await
    }

    /// Record the caller's RSVP on a booking they were invited to
    pub async fn rsvp(
        &self,
        booking_id: i32,
        claims: &UserClaims,
        status: RsvpStatus,
    ) -> AppResult<BookingDetails> {
        if status == RsvpStatus::Pending {
            return Err(AppError::Validation("Invalid RSVP status".to_string()));
        }

        let booking = self.repository.bookings.get_by_id(booking_id).await?;

        let updated = self
            .repository
            .bookings
            .rsvp(booking_id, claims.user_id, status)
            .await?;
        if !updated {
            return Err(AppError::NotFound(
                "You are not invited to this booking".to_string(),
            ));
        }

        self.notify_owner_of_rsvp(&booking, claims.user_id, status);

        self.repository
            .bookings
            .find_details(booking_id, claims.user_id)
            .await
    }

    /// Store an attachment and persist its reference on the booking
    pub async fn attach(
        &self,
        booking_id: i32,
        claims: &UserClaims,
        bytes: &[u8],
        file_name: &str,
    ) -> AppResult<String> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;
        authorize_owner(booking.user_id, claims)?;

        let url = self.storage.store(bytes, file_name).await?;
        self.repository.bookings.set_attachment(booking_id, &url).await?;
        Ok(url)
    }

    /// Bookings owned by or shared with the user
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<BookingDetails>> {
        self.repository.bookings.list_for_user(user_id).await
    }

    /// Every booking with owner and resource names (admin)
    pub async fn list_all(&self) -> AppResult<Vec<AdminBooking>> {
        self.repository.bookings.list_all().await
    }

    /// Fire invitation emails off the request path; failures are logged only
    fn notify_invitees(&self, details: &BookingDetails) {
        if details.attendees.is_empty() {
            return;
        }

        let mailer = self.email.clone();
        let resource_name = details.resource_name.clone();
        let date = details.booking_date.to_string();
        let start = details.start_time.format("%H:%M").to_string();
        let end = details.end_time.format("%H:%M").to_string();
        let recipients: Vec<String> = details.attendees.iter().map(|a| a.email.clone()).collect();

        tokio::spawn(async move {
            for to in recipients {
                if let Err(e) = mailer
                    .send_invitation(&to, &resource_name, &date, &start, &end)
                    .await
                {
                    tracing::warn!("Failed to send invitation to {}: {}", to, e);
                }
            }
        });
    }

    /// Tell the booking owner about an RSVP change, best-effort
    fn notify_owner_of_rsvp(&self, booking: &Booking, attendee_id: i32, status: RsvpStatus) {
        let repository = self.repository.clone();
        let mailer = self.email.clone();
        let owner_id = booking.user_id;
        let resource_id = booking.resource_id;
        let date = booking.booking_date.to_string();

        tokio::spawn(async move {
            let result: AppResult<()> = async {
                let owner = repository.users.get_by_id(owner_id).await?;
                let attendee = repository.users.get_by_id(attendee_id).await?;
                let resource = repository.resources.get_by_id(resource_id).await?;
                mailer
                    .send_rsvp_notification(
                        &owner.email,
                        &attendee.name,
                        status.as_str(),
                        &resource.name,
                        &date,
                    )
                    .await
            }
            .await;

            if let Err(e) = result {
                tracing::warn!("Failed to send RSVP notification: {}", e);
            }
        });
    }
}

/// Owner-or-admin check shared by mutate/cancel/attach
fn authorize_owner(owner_id: i32, claims: &UserClaims) -> AppResult<()> {
    if owner_id == claims.user_id || claims.is_admin() {
        Ok(())
    } else {
        Err(AppError::Authorization("Access denied".to_string()))
    }
}

/// Deduplicate attendee ids, dropping the owner: owner attendance is
/// implicit and never gets an attendee row.
fn dedup_attendees(owner_id: i32, ids: &[i32]) -> Vec<i32> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .copied()
        .filter(|id| *id != owner_id && seen.insert(*id))
        .collect()
}

/// Headcount check: owner plus invitees must fit the resource capacity.
/// A capacity of NULL or 0 means unconstrained.
fn ensure_capacity(capacity: Option<i32>, invited: usize) -> AppResult<()> {
    let headcount = 1 + invited as i64;
    match capacity {
        Some(cap) if cap > 0 && headcount > cap as i64 => Err(AppError::Conflict(format!(
            "Booking exceeds resource capacity ({} > {})",
            headcount, cap
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    fn claims(user_id: i32, role: Role) -> UserClaims {
        UserClaims {
            sub: "test@example.com".to_string(),
            user_id,
            role,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_dedup_attendees_removes_duplicates_and_owner() {
        assert_eq!(dedup_attendees(1, &[2, 3, 2, 1, 4, 3]), vec![2, 3, 4]);
        assert!(dedup_attendees(1, &[1, 1]).is_empty());
        assert!(dedup_attendees(1, &[]).is_empty());
    }

    #[test]
    fn test_capacity_boundary() {
        // capacity 5: owner + 4 invitees fits, owner + 5 does not
        assert!(ensure_capacity(Some(5), 4).is_ok());
        assert!(ensure_capacity(Some(5), 5).is_err());
    }

    #[test]
    fn test_capacity_unconstrained() {
        assert!(ensure_capacity(None, 100).is_ok());
        assert!(ensure_capacity(Some(0), 100).is_ok());
    }

    #[test]
    fn test_authorize_owner() {
        let owner = 7;
        assert!(authorize_owner(owner, &claims(7, Role::User)).is_ok());
        assert!(authorize_owner(owner, &claims(8, Role::Admin)).is_ok());
        assert!(authorize_owner(owner, &claims(8, Role::User)).is_err());
    }
}
