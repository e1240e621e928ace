//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use rand::Rng;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{CreateUser, Role, UpdateUser, User, UserClaims, UserSummary},
    repository::Repository,
    services::email::EmailService,
};

const RESET_KIND: &str = "reset_password";

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    email: EmailService,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig, email: EmailService) -> Self {
        Self {
            repository,
            config,
            email,
        }
    }

    /// Register a new account and return a JWT token
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AppResult<String> {
        if self.repository.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = self.hash_password(password)?;
        let user = self
            .repository
            .users
            .create(name, email, &password_hash, Role::User)
            .await?;

        self.create_token_for_user(&user)
    }

    /// Authenticate by email and password, returning a token and the user
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(String, UserSummary)> {
        let user = self
            .repository
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        Ok((token, user.into()))
    }

    /// Get the authenticated user's record
    pub async fn me(&self, user_id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(user_id).await
    }

    /// Update the caller's own name and/or profile picture
    pub async fn update_profile(
        &self,
        user_id: i32,
        name: Option<&str>,
        profile_picture: Option<&str>,
    ) -> AppResult<User> {
        self.repository
            .users
            .update_profile(user_id, name, profile_picture)
            .await
    }

    /// Change password, verifying the current one first
    pub async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let user = self.repository.users.get_by_id(user_id).await?;

        if !self.verify_password(&user, current_password)? {
            return Err(AppError::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }

        let hash = self.hash_password(new_password)?;
        self.repository.users.update_password(user_id, &hash).await
    }

    /// Start a password reset: store a one-time code and email it.
    ///
    /// Always succeeds from the caller's point of view so that account
    /// existence is not leaked; delivery is best-effort.
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let Some(user) = self.repository.users.find_by_email(email).await? else {
            return Ok(());
        };

        let otp = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
        let expires_at = Utc::now() + Duration::minutes(10);

        self.repository
            .verifications
            .create(&user.email, &otp, RESET_KIND, expires_at)
            .await?;

        let mailer = self.email.clone();
        let to = user.email.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send_reset_code(&to, &otp).await {
                tracing::warn!("Failed to send reset code to {}: {}", to, e);
            }
        });

        Ok(())
    }

    /// Complete a password reset with a previously emailed code
    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &str,
    ) -> AppResult<()> {
        let valid = self
            .repository
            .verifications
            .verify_and_consume(email, otp, RESET_KIND)
            .await?;

        if !valid {
            return Err(AppError::Validation(
                "Invalid or expired verification code".to_string(),
            ));
        }

        let user = self
            .repository
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let hash = self.hash_password(new_password)?;
        self.repository.users.update_password(user.id, &hash).await
    }

    /// List users for pickers and the admin panel, excluding the caller
    pub async fn list_users(&self, caller_id: i32) -> AppResult<Vec<UserSummary>> {
        self.repository.users.list_except(caller_id).await
    }

    /// Create a user (admin operation)
    pub async fn create_user(&self, data: CreateUser) -> AppResult<UserSummary> {
        if self
            .repository
            .users
            .find_by_email(&data.email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = self.hash_password(&data.password)?;
        let user = self
            .repository
            .users
            .create(
                &data.name,
                &data.email,
                &password_hash,
                data.role.unwrap_or(Role::User),
            )
            .await?;
        Ok(user.into())
    }

    /// Update a user's name or role (admin operation)
    pub async fn update_user(&self, id: i32, data: UpdateUser) -> AppResult<UserSummary> {
        let user = self.repository.users.update(id, &data).await?;
        Ok(user.into())
    }

    /// Delete a user (admin operation); self-deletion is rejected
    pub async fn delete_user(&self, id: i32, caller_id: i32) -> AppResult<()> {
        if id == caller_id {
            return Err(AppError::BadRequest("Cannot delete yourself".to_string()));
        }
        self.repository.users.delete(id).await
    }

    /// Create a JWT token for a user
    fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
