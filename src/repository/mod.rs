//! Repository layer for database operations

pub mod bookings;
pub mod resources;
pub mod users;
pub mod verifications;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub resources: resources::ResourcesRepository,
    pub bookings: bookings::BookingsRepository,
    pub verifications: verifications::VerificationsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            resources: resources::ResourcesRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            verifications: verifications::VerificationsRepository::new(pool.clone()),
            pool,
        }
    }
}
