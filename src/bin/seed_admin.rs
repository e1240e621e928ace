//! Seed or reset the administrator account.
//!
//! Reads ADMIN_EMAIL / ADMIN_PASSWORD (defaults: admin@bookery.app /
//! admin123) and upserts the account with the admin role.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use sqlx::postgres::PgPoolOptions;

use bookery_server::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().expect("Failed to load configuration");

    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@bookery.app".to_string());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    sqlx::query(
        r#"
        INSERT INTO users (name, email, password_hash, role)
        VALUES ('Administrator', $1, $2, 'admin')
        ON CONFLICT (email) DO UPDATE
        SET password_hash = EXCLUDED.password_hash, role = 'admin'
        "#,
    )
    .bind(&email)
    .bind(&hash)
    .execute(&pool)
    .await?;

    println!("Admin account ready: {}", email);
    Ok(())
}
