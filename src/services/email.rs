//! Email service for one-time codes and booking notifications
//!
//! Every caller treats delivery as best-effort: sends are spawned off the
//! request path and failures are logged, never returned to the client.

use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send a password-reset code
    pub async fn send_reset_code(&self, to: &str, code: &str) -> AppResult<()> {
        let subject = "Reset your Bookery password";
        let body = format!(
            r#"
Your password reset code is: {code}

This code will expire in 10 minutes.

If you didn't request this code, please ignore this email.
"#,
            code = code
        );

        self.send_email(to, subject, &body).await
    }

    /// Invite an attendee to a booking
    pub async fn send_invitation(
        &self,
        to: &str,
        resource_name: &str,
        date: &str,
        start: &str,
        end: &str,
    ) -> AppResult<()> {
        let subject = format!("Invited: {} @ {}", resource_name, date);
        let body = format!(
            r#"
You have been invited!

Where: {resource_name}
When: {date} from {start} to {end}

Please log in to the portal to RSVP.
"#,
            resource_name = resource_name,
            date = date,
            start = start,
            end = end
        );

        self.send_email(to, &subject, &body).await
    }

    /// Tell a booking owner about an attendee's RSVP
    pub async fn send_rsvp_notification(
        &self,
        to: &str,
        attendee_name: &str,
        status: &str,
        resource_name: &str,
        date: &str,
    ) -> AppResult<()> {
        let subject = format!("RSVP Update: {} {} your booking", attendee_name, status);
        let body = format!(
            r#"
{attendee_name} has {status} your invitation for {resource_name} on {date}.
"#,
            attendee_name = attendee_name,
            status = status,
            resource_name = resource_name,
            date = date
        );

        self.send_email(to, &subject, &body).await
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Bookery");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><pre>{}</pre></body></html>"#,
                                body.replace("\n", "<br>")
                            )),
                    ),
            )
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mailer_builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let mailer_builder = if let (Some(username), Some(password)) = (
            &self.config.smtp_username,
            &self.config.smtp_password,
        ) {
            mailer_builder.credentials(Credentials::new(
                username.clone(),
                password.clone(),
            ))
        } else {
            mailer_builder
        };

        let mailer = mailer_builder.build();

        mailer
            .send(&email)
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
