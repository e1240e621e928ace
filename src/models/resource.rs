//! Resource and category models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Bookable resource record (room, hall or equipment item)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Resource {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Free-text category: "room", "hall", "equipment", ...
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub resource_type: String,
    /// Maximum headcount; NULL or 0 means unconstrained
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create resource request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateResource {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub image_url: Option<String>,
}

/// Update resource request (partial)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateResource {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

/// Resource category record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// Create/update category request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryInput {
    pub name: String,
    pub description: Option<String>,
}
