//! One-time verification code store (password reset)

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::error::AppResult;

#[derive(Clone)]
pub struct VerificationsRepository {
    pool: Pool<Postgres>,
}

impl VerificationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Store a fresh code for (email, kind), replacing any previous one
    pub async fn create(
        &self,
        email: &str,
        otp: &str,
        kind: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM email_verifications WHERE email = $1 AND kind = $2")
            .bind(email)
            .bind(kind)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO email_verifications (email, otp, kind, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(email)
        .bind(otp)
        .bind(kind)
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Check a code and consume it on success. A code is single-use.
    pub async fn verify_and_consume(&self, email: &str, otp: &str, kind: &str) -> AppResult<bool> {
        let found: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT id FROM email_verifications
            WHERE email = $1 AND otp = $2 AND kind = $3 AND expires_at > NOW()
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(otp)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;

        if found.is_none() {
            return Ok(false);
        }

        sqlx::query("DELETE FROM email_verifications WHERE email = $1 AND kind = $2")
            .bind(email)
            .bind(kind)
            .execute(&self.pool)
            .await?;

        Ok(true)
    }
}
