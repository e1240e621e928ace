//! Dashboard statistics endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    services::stats::{AdminStats, UserStats},
};

use super::AuthenticatedUser;

/// Admin dashboard statistics
#[utoipa::path(
    get,
    path = "/stats/admin",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Admin dashboard data", body = AdminStats),
        (status = 403, description = "Admin only")
    )
)]
pub async fn admin_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<AdminStats>> {
    claims.require_admin()?;

    let stats = state.services.stats.admin_stats().await?;
    Ok(Json(stats))
}

/// Caller's dashboard statistics
#[utoipa::path(
    get,
    path = "/stats/user",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User dashboard data", body = UserStats),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn user_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserStats>> {
    let stats = state.services.stats.user_stats(claims.user_id).await?;
    Ok(Json(stats))
}
