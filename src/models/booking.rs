//! Booking, attendee and RSVP models

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Booking lifecycle status.
///
/// Only `confirmed` and `cancelled` are produced by the current flows;
/// `pending` and `completed` exist in the taxonomy for operator use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for BookingStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for BookingStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookingStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Attendee RSVP status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RsvpStatus {
    Pending,
    Accepted,
    Declined,
}

impl RsvpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RsvpStatus::Pending => "pending",
            RsvpStatus::Accepted => "accepted",
            RsvpStatus::Declined => "declined",
        }
    }
}

impl std::fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RsvpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(RsvpStatus::Pending),
            "accepted" => Ok(RsvpStatus::Accepted),
            "declined" => Ok(RsvpStatus::Declined),
            _ => Err(format!("Invalid RSVP status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for RsvpStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for RsvpStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for RsvpStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Booking record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: i32,
    pub user_id: i32,
    pub resource_id: i32,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Invited attendee with RSVP state
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Attendee {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub status: RsvpStatus,
}

/// Internal row for hydrated booking queries
#[derive(Debug, Clone, FromRow)]
pub struct BookingDetailsRow {
    pub id: i32,
    pub user_id: i32,
    pub resource_id: i32,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resource_name: String,
    pub resource_type: String,
    pub is_owner: bool,
    pub my_rsvp_status: Option<RsvpStatus>,
}

/// Hydrated booking view: booking joined with its resource and attendees
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingDetails {
    pub id: i32,
    pub user_id: i32,
    pub resource_id: i32,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resource_name: String,
    pub resource_type: String,
    pub is_owner: bool,
    /// Caller's own RSVP status, present on invited rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_rsvp_status: Option<RsvpStatus>,
    pub attendees: Vec<Attendee>,
}

impl BookingDetails {
    pub fn from_row(row: BookingDetailsRow, attendees: Vec<Attendee>) -> Self {
        BookingDetails {
            id: row.id,
            user_id: row.user_id,
            resource_id: row.resource_id,
            booking_date: row.booking_date,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status,
            notes: row.notes,
            attachment_url: row.attachment_url,
            created_at: row.created_at,
            resource_name: row.resource_name,
            resource_type: row.resource_type,
            is_owner: row.is_owner,
            my_rsvp_status: row.my_rsvp_status,
            attendees,
        }
    }
}

/// Admin listing row: booking joined with owner and resource names
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AdminBooking {
    pub id: i32,
    pub user_id: i32,
    pub resource_id: i32,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
    pub resource_name: String,
}

/// Create booking request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBooking {
    pub resource_id: i32,
    /// Calendar date, `YYYY-MM-DD`
    pub booking_date: String,
    /// Time of day, `HH:MM` or `HH:MM:SS`
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
    pub attendee_ids: Option<Vec<i32>>,
}

/// Reschedule request; omitted fields keep their current value
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBooking {
    pub resource_id: Option<i32>,
    pub booking_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub notes: Option<String>,
}

/// Validated booking data ready for insertion
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: i32,
    pub resource_id: i32,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: Option<String>,
    pub attendee_ids: Vec<i32>,
}

/// Typed partial update translated into a single parameterized statement
#[derive(Debug, Clone, Default)]
pub struct BookingPatch {
    pub resource_id: Option<i32>,
    pub booking_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub notes: Option<String>,
}

/// Parse a calendar date in `YYYY-MM-DD` form
pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date: {}", s)))
}

/// Parse a time of day in `HH:MM` or `HH:MM:SS` form
pub fn parse_time(s: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| AppError::Validation(format!("Invalid time: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            "confirmed".parse::<BookingStatus>().unwrap(),
            BookingStatus::Confirmed
        );
        assert_eq!(BookingStatus::Cancelled.as_str(), "cancelled");
        assert!("done".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_rsvp_round_trip() {
        assert_eq!("accepted".parse::<RsvpStatus>().unwrap(), RsvpStatus::Accepted);
        assert_eq!("Declined".parse::<RsvpStatus>().unwrap(), RsvpStatus::Declined);
        assert!("maybe".parse::<RsvpStatus>().is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2025-03-14").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
        );
        assert!(parse_date("14/03/2025").is_err());
    }

    #[test]
    fn test_parse_time_both_forms() {
        let expected = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(parse_time("09:30").unwrap(), expected);
        assert_eq!(parse_time("09:30:00").unwrap(), expected);
        assert!(parse_time("9h30").is_err());
    }
}
