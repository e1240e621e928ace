//! Dashboard statistics service

use chrono::{Months, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    repository::{
        bookings::{MonthlyCount, RecentBooking, UserRecentBooking},
        resources::TypeUtilization,
        Repository,
    },
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

/// Admin dashboard totals
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminTotals {
    pub total_bookings: i64,
    pub active_resources: i64,
    pub total_users: i64,
}

/// Admin dashboard payload
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStats {
    pub stats: AdminTotals,
    pub recent_activity: Vec<RecentBooking>,
    pub trends: Vec<MonthlyCount>,
    pub utilization: Vec<TypeUtilization>,
}

/// User dashboard payload
#[derive(Debug, Serialize, ToSchema)]
pub struct UserStats {
    pub total_bookings: i64,
    pub upcoming: i64,
    pub completed: i64,
    pub recent_activity: Vec<UserRecentBooking>,
    pub monthly_data: Vec<MonthlyCount>,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Aggregate the admin dashboard
    pub async fn admin_stats(&self) -> AppResult<AdminStats> {
        let total_bookings = self.repository.bookings.count_all().await?;
        let active_resources = self.repository.resources.count_active().await?;
        let total_users = self.repository.users.count().await?;
        let recent_activity = self.repository.bookings.recent_all(5).await?;
        let trends = self.repository.bookings.monthly_counts(None, 6).await?;
        let utilization = self.repository.resources.utilization_by_type().await?;

        Ok(AdminStats {
            stats: AdminTotals {
                total_bookings,
                active_resources,
                total_users,
            },
            recent_activity,
            trends,
            utilization,
        })
    }

    /// Aggregate a user's dashboard; the monthly series always carries the
    /// last six months, zero-filled where the user had no bookings.
    pub async fn user_stats(&self, user_id: i32) -> AppResult<UserStats> {
        let total_bookings = self.repository.bookings.count_for_user(user_id).await?;
        let upcoming = self
            .repository
            .bookings
            .count_upcoming_for_user(user_id)
            .await?;
        let completed = self
            .repository
            .bookings
            .count_completed_for_user(user_id)
            .await?;
        let recent_activity = self.repository.bookings.recent_for_user(user_id, 5).await?;
        let counts = self
            .repository
            .bookings
            .monthly_counts(Some(user_id), 5)
            .await?;

        Ok(UserStats {
            total_bookings,
            upcoming,
            completed,
            recent_activity,
            monthly_data: zero_fill_months(&counts, 6),
        })
    }
}

/// Expand sparse month counts into a dense trailing series ending at the
/// current month.
fn zero_fill_months(counts: &[MonthlyCount], months: u32) -> Vec<MonthlyCount> {
    let today = Utc::now().date_naive();
    (0..months)
        .rev()
        .map(|i| {
            let label = (today - Months::new(i)).format("%b").to_string();
            let bookings = counts
                .iter()
                .find(|c| c.name == label)
                .map(|c| c.bookings)
                .unwrap_or(0);
            MonthlyCount {
                name: label,
                bookings,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_fill_produces_six_months() {
        let filled = zero_fill_months(&[], 6);
        assert_eq!(filled.len(), 6);
        assert!(filled.iter().all(|m| m.bookings == 0));
        // Last entry is the current month
        let current = Utc::now().date_naive().format("%b").to_string();
        assert_eq!(filled.last().unwrap().name, current);
    }

    #[test]
    fn test_zero_fill_keeps_existing_counts() {
        let current = Utc::now().date_naive().format("%b").to_string();
        let counts = vec![MonthlyCount {
            name: current.clone(),
            bookings: 3,
        }];
        let filled = zero_fill_months(&counts, 6);
        assert_eq!(filled.last().unwrap().bookings, 3);
    }
}
