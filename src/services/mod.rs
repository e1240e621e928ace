//! Business logic services

pub mod auth;
pub mod bookings;
pub mod email;
pub mod resources;
pub mod stats;
pub mod storage;

use crate::{
    config::{AuthConfig, EmailConfig, StorageConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub resources: resources::ResourcesService,
    pub bookings: bookings::BookingsService,
    pub stats: stats::StatsService,
    pub email: email::EmailService,
    pub storage: storage::StorageService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        email_config: EmailConfig,
        storage_config: StorageConfig,
    ) -> Self {
        let email = email::EmailService::new(email_config);
        let storage = storage::StorageService::new(storage_config);

        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config, email.clone()),
            resources: resources::ResourcesService::new(repository.clone()),
            bookings: bookings::BookingsService::new(
                repository.clone(),
                email.clone(),
                storage.clone(),
            ),
            stats: stats::StatsService::new(repository),
            email,
            storage,
        }
    }
}
