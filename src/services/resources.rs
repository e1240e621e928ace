//! Resource catalog and category service

use crate::{
    error::AppResult,
    models::resource::{Category, CategoryInput, CreateResource, Resource, UpdateResource},
    repository::Repository,
};

#[derive(Clone)]
pub struct ResourcesService {
    repository: Repository,
}

impl ResourcesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Active resources, the public catalog view
    pub async fn list(&self) -> AppResult<Vec<Resource>> {
        self.repository.resources.list_active().await
    }

    /// Get a single resource (active or not)
    pub async fn get(&self, id: i32) -> AppResult<Resource> {
        self.repository.resources.get_by_id(id).await
    }

    /// Create a resource (admin)
    pub async fn create(&self, data: CreateResource) -> AppResult<Resource> {
        self.repository.resources.create(&data).await
    }

    /// Update a resource (admin)
    pub async fn update(&self, id: i32, data: UpdateResource) -> AppResult<Resource> {
        self.repository.resources.update(id, &data).await
    }

    /// Soft-delete a resource (admin); existing bookings keep the row
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.resources.soft_delete(id).await
    }

    /// List all categories
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.resources.categories_list().await
    }

    /// Create a category (admin); duplicate names surface as Conflict
    pub async fn create_category(&self, data: CategoryInput) -> AppResult<Category> {
        self.repository.resources.categories_create(&data).await
    }

    /// Update a category (admin)
    pub async fn update_category(&self, id: i32, data: CategoryInput) -> AppResult<Category> {
        self.repository.resources.categories_update(id, &data).await
    }

    /// Delete a category (admin)
    pub async fn delete_category(&self, id: i32) -> AppResult<()> {
        self.repository.resources.categories_delete(id).await
    }
}
