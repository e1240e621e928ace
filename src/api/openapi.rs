//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, bookings, categories, health, resources, stats, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookery API",
        version = "1.0.0",
        description = "Room & Equipment Booking System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        auth::update_profile,
        auth::update_password,
        auth::forgot_password,
        auth::reset_password,
        // Resources
        resources::list_resources,
        resources::get_resource,
        resources::create_resource,
        resources::update_resource,
        resources::delete_resource,
        // Categories
        categories::list_categories,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        // Bookings
        bookings::list_bookings,
        bookings::list_all_bookings,
        bookings::create_booking,
        bookings::update_booking,
        bookings::cancel_booking,
        bookings::rsvp_booking,
        bookings::upload_attachment,
        // Users
        users::list_users,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Stats
        stats::admin_stats,
        stats::user_stats,
    ),
    components(
        schemas(
            // Auth
            auth::RegisterRequest,
            auth::RegisterResponse,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UpdatePasswordRequest,
            auth::ForgotPasswordRequest,
            auth::ResetPasswordRequest,
            auth::MessageResponse,
            // Users
            crate::models::user::User,
            crate::models::user::UserSummary,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            crate::models::user::Role,
            // Resources
            crate::models::resource::Resource,
            crate::models::resource::CreateResource,
            crate::models::resource::UpdateResource,
            crate::models::resource::Category,
            crate::models::resource::CategoryInput,
            // Bookings
            crate::models::booking::Booking,
            crate::models::booking::BookingDetails,
            crate::models::booking::AdminBooking,
            crate::models::booking::Attendee,
            crate::models::booking::CreateBooking,
            crate::models::booking::UpdateBooking,
            crate::models::booking::BookingStatus,
            crate::models::booking::RsvpStatus,
            bookings::RsvpRequest,
            bookings::UploadResponse,
            // Stats
            crate::services::stats::AdminStats,
            crate::services::stats::AdminTotals,
            crate::services::stats::UserStats,
            crate::repository::bookings::RecentBooking,
            crate::repository::bookings::UserRecentBooking,
            crate::repository::bookings::MonthlyCount,
            crate::repository::resources::TypeUtilization,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "resources", description = "Resource catalog management"),
        (name = "categories", description = "Resource category management"),
        (name = "bookings", description = "Booking lifecycle and RSVP"),
        (name = "users", description = "User management"),
        (name = "stats", description = "Dashboard statistics")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
