//! Bookings repository: availability checking, lifecycle writes, RSVP

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::booking::{
        AdminBooking, Attendee, Booking, BookingDetails, BookingDetailsRow, BookingPatch,
        BookingStatus, NewBooking, RsvpStatus,
    },
};

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// Availability check: true iff no non-cancelled booking on the same
    /// resource and date overlaps the half-open interval [start, end).
    /// Touching endpoints are not a conflict. `exclude` lets a reschedule
    /// skip the booking being moved.
    pub async fn is_available(
        &self,
        resource_id: i32,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        exclude: Option<i32>,
    ) -> AppResult<bool> {
        let conflicts: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE resource_id = $1
              AND booking_date = $2
              AND status <> 'cancelled'
              AND start_time < $3
              AND end_time > $4
              AND ($5::int4 IS NULL OR id <> $5)
            "#,
        )
        .bind(resource_id)
        .bind(date)
        .bind(end)
        .bind(start)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;
        Ok(conflicts == 0)
    }

    /// Create a booking and its attendee rows in one transaction, so the
    /// two writes land together or not at all. A conflicting concurrent
    /// insert trips the bookings_no_overlap exclusion constraint and
    /// surfaces as 23P01 -> Conflict.
    pub async fn create(&self, data: &NewBooking) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;

        let booking_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO bookings (user_id, resource_id, booking_date, start_time, end_time, status, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(data.user_id)
        .bind(data.resource_id)
        .bind(data.booking_date)
        .bind(data.start_time)
        .bind(data.end_time)
        .bind(BookingStatus::Confirmed)
        .bind(&data.notes)
        .fetch_one(&mut *tx)
        .await?;

        if !data.attendee_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO booking_attendees (booking_id, user_id)
                SELECT $1, unnest($2::int4[])
                "#,
            )
            .bind(booking_id)
            .bind(&data.attendee_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(booking_id)
    }

    /// Apply a reschedule patch as one parameterized statement; omitted
    /// fields keep their stored values. The exclusion constraint rejects
    /// any move into an occupied slot that slipped past the caller's check.
    pub async fn update(&self, id: i32, patch: &BookingPatch) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                resource_id = COALESCE($2, resource_id),
                booking_date = COALESCE($3, booking_date),
                start_time = COALESCE($4, start_time),
                end_time = COALESCE($5, end_time),
                notes = COALESCE($6, notes)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(patch.resource_id)
        .bind(patch.booking_date)
        .bind(patch.start_time)
        .bind(patch.end_time)
        .bind(patch.notes.as_deref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Booking {} not found", id)));
        }
        Ok(())
    }

    /// Set the lifecycle status (used for cancellation)
    pub async fn set_status(&self, id: i32, status: BookingStatus) -> AppResult<()> {
        sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Persist the attachment reference returned by the blob store
    pub async fn set_attachment(&self, id: i32, url: &str) -> AppResult<()> {
        sqlx::query("UPDATE bookings SET attachment_url = $2 WHERE id = $1")
            .bind(id)
            .bind(url)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Bookings visible to a user: owned plus invited, deduplicated, each
    /// tagged with is_owner and (for invited rows) the caller's RSVP status.
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<BookingDetails>> {
        let rows = sqlx::query_as::<_, BookingDetailsRow>(
            r#"
            SELECT b.*, r.name AS resource_name, r.type AS resource_type,
                   (b.user_id = $1) AS is_owner,
                   ba.status AS my_rsvp_status
            FROM bookings b
            JOIN resources r ON r.id = b.resource_id
            LEFT JOIN booking_attendees ba
                   ON ba.booking_id = b.id AND ba.user_id = $1
            WHERE b.user_id = $1 OR ba.user_id IS NOT NULL
            ORDER BY b.booking_date DESC, b.start_time DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(rows).await
    }

    /// One hydrated booking as seen by `viewer_id`
    pub async fn find_details(&self, id: i32, viewer_id: i32) -> AppResult<BookingDetails> {
        let row = sqlx::query_as::<_, BookingDetailsRow>(
            r#"
            SELECT b.*, r.name AS resource_name, r.type AS resource_type,
                   (b.user_id = $2) AS is_owner,
                   ba.status AS my_rsvp_status
            FROM bookings b
            JOIN resources r ON r.id = b.resource_id
            LEFT JOIN booking_attendees ba
                   ON ba.booking_id = b.id AND ba.user_id = $2
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .bind(viewer_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;

        let mut hydrated = self.hydrate(vec![row]).await?;
        Ok(hydrated.remove(0))
    }

    /// All bookings with owner and resource names (admin listing)
    pub async fn list_all(&self) -> AppResult<Vec<AdminBooking>> {
        let rows = sqlx::query_as::<_, AdminBooking>(
            r#"
            SELECT b.id, b.user_id, b.resource_id, b.booking_date, b.start_time,
                   b.end_time, b.status, b.notes, b.created_at,
                   u.name AS user_name, u.email AS user_email,
                   r.name AS resource_name
            FROM bookings b
            JOIN users u ON u.id = b.user_id
            JOIN resources r ON r.id = b.resource_id
            ORDER BY b.booking_date DESC, b.start_time DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Record an invitee's RSVP. Returns false when the caller holds no
    /// attendee row for this booking.
    pub async fn rsvp(
        &self,
        booking_id: i32,
        user_id: i32,
        status: RsvpStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE booking_attendees SET status = $3 WHERE booking_id = $1 AND user_id = $2",
        )
        .bind(booking_id)
        .bind(user_id)
        .bind(status)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Attach the attendee lists to a batch of booking rows
    async fn hydrate(&self, rows: Vec<BookingDetailsRow>) -> AppResult<Vec<BookingDetails>> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let mut by_booking: HashMap<i32, Vec<Attendee>> = HashMap::new();

        if !ids.is_empty() {
            let attendee_rows = sqlx::query(
                r#"
                SELECT ba.booking_id, ba.user_id, u.name, u.email, ba.status
                FROM booking_attendees ba
                JOIN users u ON u.id = ba.user_id
                WHERE ba.booking_id = ANY($1)
                ORDER BY u.name
                "#,
            )
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

            for row in attendee_rows {
                let booking_id: i32 = row.get("booking_id");
                by_booking.entry(booking_id).or_default().push(Attendee {
                    user_id: row.get("user_id"),
                    name: row.get("name"),
                    email: row.get("email"),
                    status: row.get("status"),
                });
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let attendees = by_booking.remove(&row.id).unwrap_or_default();
                BookingDetails::from_row(row, attendees)
            })
            .collect())
    }

    // Aggregation queries for the dashboards

    /// Count all bookings
    pub async fn count_all(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count bookings owned by a user
    pub async fn count_for_user(&self, user_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count a user's upcoming non-cancelled bookings
    pub async fn count_upcoming_for_user(&self, user_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE user_id = $1 AND booking_date >= CURRENT_DATE AND status <> 'cancelled'
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count a user's past completed bookings
    pub async fn count_completed_for_user(&self, user_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM bookings
            WHERE user_id = $1 AND booking_date < CURRENT_DATE AND status = 'completed'
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Latest bookings across all users (admin dashboard)
    pub async fn recent_all(&self, limit: i64) -> AppResult<Vec<RecentBooking>> {
        let rows = sqlx::query_as::<_, RecentBooking>(
            r#"
            SELECT b.id, u.name AS user_name, r.name AS resource_name, b.created_at
            FROM bookings b
            JOIN users u ON u.id = b.user_id
            JOIN resources r ON r.id = b.resource_id
            ORDER BY b.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// A user's latest bookings (user dashboard)
    pub async fn recent_for_user(
        &self,
        user_id: i32,
        limit: i64,
    ) -> AppResult<Vec<UserRecentBooking>> {
        let rows = sqlx::query_as::<_, UserRecentBooking>(
            r#"
            SELECT b.id, b.booking_date, b.start_time, b.status, r.name AS resource_name
            FROM bookings b
            JOIN resources r ON r.id = b.resource_id
            WHERE b.user_id = $1
            ORDER BY b.booking_date DESC, b.start_time DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Booking counts grouped by month over the trailing window, optionally
    /// restricted to one user. Months with no bookings are absent; callers
    /// zero-fill.
    pub async fn monthly_counts(
        &self,
        user_id: Option<i32>,
        months: i32,
    ) -> AppResult<Vec<MonthlyCount>> {
        let rows = sqlx::query_as::<_, MonthlyCount>(
            r#"
            SELECT to_char(booking_date, 'Mon') AS name, COUNT(*) AS bookings
            FROM bookings
            WHERE booking_date >= CURRENT_DATE - make_interval(months => $2)
              AND ($1::int4 IS NULL OR user_id = $1)
            GROUP BY to_char(booking_date, 'YYYY-MM'), to_char(booking_date, 'Mon')
            ORDER BY to_char(booking_date, 'YYYY-MM')
            "#,
        )
        .bind(user_id)
        .bind(months)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Admin dashboard activity row
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct RecentBooking {
    pub id: i32,
    pub user_name: String,
    pub resource_name: String,
    pub created_at: DateTime<Utc>,
}

/// User dashboard activity row
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct UserRecentBooking {
    pub id: i32,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub status: BookingStatus,
    pub resource_name: String,
}

/// One month's booking count
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct MonthlyCount {
    pub name: String,
    pub bookings: i64,
}
