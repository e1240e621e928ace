//! Resources and categories repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::resource::{Category, CategoryInput, CreateResource, Resource, UpdateResource},
};

#[derive(Clone)]
pub struct ResourcesRepository {
    pool: Pool<Postgres>,
}

impl ResourcesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List active resources
    pub async fn list_active(&self) -> AppResult<Vec<Resource>> {
        let rows = sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources WHERE is_active = TRUE ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get resource by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Resource> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Resource {} not found", id)))
    }

    /// Create a resource
    pub async fn create(&self, data: &CreateResource) -> AppResult<Resource> {
        let row = sqlx::query_as::<_, Resource>(
            r#"
            INSERT INTO resources (name, description, type, capacity, location, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.resource_type.as_deref().unwrap_or("room"))
        .bind(data.capacity)
        .bind(&data.location)
        .bind(&data.image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a resource in place; omitted fields are left untouched
    pub async fn update(&self, id: i32, data: &UpdateResource) -> AppResult<Resource> {
        sqlx::query_as::<_, Resource>(
            r#"
            UPDATE resources SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                type = COALESCE($4, type),
                capacity = COALESCE($5, capacity),
                location = COALESCE($6, location),
                image_url = COALESCE($7, image_url),
                is_active = COALESCE($8, is_active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.name.as_deref())
        .bind(data.description.as_deref())
        .bind(data.resource_type.as_deref())
        .bind(data.capacity)
        .bind(data.location.as_deref())
        .bind(data.image_url.as_deref())
        .bind(data.is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resource {} not found", id)))
    }

    /// Soft delete: mark inactive, keep the row for booking history
    pub async fn soft_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("UPDATE resources SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Resource {} not found", id)));
        }
        Ok(())
    }

    /// Count active resources (for stats)
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM resources WHERE is_active = TRUE")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Booking counts per resource type (for stats)
    pub async fn utilization_by_type(&self) -> AppResult<Vec<TypeUtilization>> {
        let rows = sqlx::query_as::<_, TypeUtilization>(
            r#"
            SELECT r.type as name, COUNT(b.id) as value
            FROM resources r
            LEFT JOIN bookings b ON r.id = b.resource_id
            GROUP BY r.type
            ORDER BY value DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Categories

    /// List all categories
    pub async fn categories_list(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT * FROM resource_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a category
    pub async fn categories_create(&self, data: &CategoryInput) -> AppResult<Category> {
        let row = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO resource_categories (name, description)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a category
    pub async fn categories_update(&self, id: i32, data: &CategoryInput) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE resource_categories SET name = $2, description = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))
    }

    /// Delete a category
    pub async fn categories_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM resource_categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }
        Ok(())
    }
}

/// Booking count for one resource type
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow, utoipa::ToSchema)]
pub struct TypeUtilization {
    pub name: String,
    pub value: i64,
}
