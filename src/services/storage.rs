//! Blob storage service
//!
//! Writes uploaded files to a local directory and returns the public URL
//! under which they are served. Callers persist only the returned
//! reference string.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct StorageService {
    upload_dir: PathBuf,
    base_url: String,
}

impl StorageService {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            upload_dir: PathBuf::from(config.upload_dir),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Directory served statically by the router
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Store a file and return its public URL
    pub async fn store(&self, bytes: &[u8], original_name: &str) -> AppResult<String> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))
            .unwrap_or_default();
        let file_name = format!("{}{}", Uuid::new_v4(), extension);

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {}", e)))?;

        let path = self.upload_dir.join(&file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store file: {}", e)))?;

        Ok(format!("{}/{}", self.base_url, file_name))
    }
}
