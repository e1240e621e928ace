//! Resource catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::resource::{CreateResource, Resource, UpdateResource},
};

use super::{auth::MessageResponse, AuthenticatedUser};

/// List active resources
#[utoipa::path(
    get,
    path = "/resources",
    tag = "resources",
    responses(
        (status = 200, description = "Active resources", body = Vec<Resource>)
    )
)]
pub async fn list_resources(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Resource>>> {
    let resources = state.services.resources.list().await?;
    Ok(Json(resources))
}

/// Get a resource by ID
#[utoipa::path(
    get,
    path = "/resources/{id}",
    tag = "resources",
    params(
        ("id" = i32, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource details", body = Resource),
        (status = 404, description = "Resource not found")
    )
)]
pub async fn get_resource(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Resource>> {
    let resource = state.services.resources.get(id).await?;
    Ok(Json(resource))
}

/// Create a resource
#[utoipa::path(
    post,
    path = "/resources",
    tag = "resources",
    security(("bearer_auth" = [])),
    request_body = CreateResource,
    responses(
        (status = 201, description = "Resource created", body = Resource),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_resource(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(resource): Json<CreateResource>,
) -> AppResult<(StatusCode, Json<Resource>)> {
    claims.require_admin()?;

    let created = state.services.resources.create(resource).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a resource
#[utoipa::path(
    put,
    path = "/resources/{id}",
    tag = "resources",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Resource ID")
    ),
    request_body = UpdateResource,
    responses(
        (status = 200, description = "Resource updated", body = Resource),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Resource not found")
    )
)]
pub async fn update_resource(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(resource): Json<UpdateResource>,
) -> AppResult<Json<Resource>> {
    claims.require_admin()?;

    let updated = state.services.resources.update(id, resource).await?;
    Ok(Json(updated))
}

/// Soft-delete a resource
#[utoipa::path(
    delete,
    path = "/resources/{id}",
    tag = "resources",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Resource ID")
    ),
    responses(
        (status = 200, description = "Resource removed", body = MessageResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Resource not found")
    )
)]
pub async fn delete_resource(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    claims.require_admin()?;

    state.services.resources.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Resource removed".to_string(),
    }))
}
