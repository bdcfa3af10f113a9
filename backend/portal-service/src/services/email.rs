/// Email delivery over SMTP with lettre.
/// Every message goes out as multipart text + HTML.
use lettre::message::{header::ContentType, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

use crate::config::EmailConfig;
use crate::error::{AppError, Result};

pub struct EmailService {
    config: Arc<EmailConfig>,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        EmailService {
            config: Arc::new(config),
        }
    }

    pub fn client_url(&self) -> &str {
        &self.config.client_url
    }

    /// True when SMTP credentials are present. Without them sends fail,
    /// which callers treat as a per-recipient error, not a crash.
    pub fn is_configured(&self) -> bool {
        !self.config.smtp_username.is_empty()
            && !self.config.smtp_password.is_empty()
            && !self.config.smtp_host.is_empty()
    }

    fn create_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        // 465 is implicit TLS; anything else negotiates STARTTLS.
        let builder = if self.config.smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.config.smtp_host)
                .map_err(|e| AppError::Email(format!("Failed to build SMTP transport: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Email(format!("Failed to build SMTP transport: {}", e)))?
        };

        Ok(builder
            .port(self.config.smtp_port)
            .credentials(creds)
            .build())
    }

    /// Verification / password-reset code email.
    pub async fn send_verification_email(
        &self,
        to_email: &str,
        heading: &str,
        code: &str,
    ) -> Result<()> {
        let html_body = format!(
            r#"
<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; border: 1px solid #e2e8f0; border-radius: 8px;">
  <h2 style="color: #0f172a; margin-bottom: 24px;">{heading}</h2>
  <p style="color: #475569; font-size: 16px; line-height: 24px;">
    Use the following verification code to continue:
  </p>
  <div style="background-color: #f8fafc; padding: 16px; border-radius: 8px; text-align: center; margin: 32px 0;">
    <span style="font-size: 32px; font-weight: 800; letter-spacing: 8px; color: #16a34a;">{code}</span>
  </div>
  <p style="color: #475569; font-size: 14px;">
    This code will expire in 10 minutes. If you didn't request this code, you can safely ignore this email.
  </p>
  <hr style="border: 0; border-top: 1px solid #e2e8f0; margin: 32px 0;" />
  <p style="color: #94a3b8; font-size: 12px; text-align: center;">
    CSE Department. All rights reserved.
  </p>
</div>
            "#,
        );

        let text_body = format!(
            "{heading}\n\nYour verification code: {code}\n\nThis code will expire in 10 minutes.\nIf you didn't request this code, you can safely ignore this email.\n",
        );

        self.send_email(to_email, heading, &text_body, &html_body)
            .await
    }

    /// Subscription notification for a freshly published notice or event.
    pub async fn send_notification_email(
        &self,
        to_email: &str,
        to_name: &str,
        type_label: &str,
        category: &str,
        title: &str,
        link: &str,
    ) -> Result<()> {
        let subject = format!("New {}: {}", type_label, title);

        let html_body = format!(
            r#"
<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; border: 1px solid #e2e8f0; border-radius: 10px;">
  <h2 style="color: #002147; margin-bottom: 20px;">New {type_label} Published</h2>
  <p>Hello {to_name},</p>
  <p>A new <strong>{type_label}</strong> in the category <strong>{category}</strong> has been published on the department website.</p>
  <div style="background-color: #f8fafc; padding: 20px; border-radius: 8px; margin: 25px 0;">
    <h3 style="margin-top: 0; color: #0f172a;">{title}</h3>
    <a href="{link}" style="display: inline-block; background-color: #002147; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px; font-weight: bold; margin-top: 10px;">View Full Details</a>
  </div>
  <p style="color: #64748b; font-size: 0.875rem;">
    You are receiving this because you opted for notifications in this category.
    You can change your preferences anytime in your dashboard settings.
  </p>
</div>
            "#,
        );

        let text_body = format!(
            "New {type_label} published\n\nHello {to_name},\n\nA new {type_label} in the category {category} has been published:\n\n{title}\n{link}\n\nYou are receiving this because you opted for notifications in this category.\n",
        );

        self.send_email(to_email, &subject, &text_body, &html_body)
            .await
    }

    /// Sent to the assignee when a task is created.
    #[allow(clippy::too_many_arguments)]
    pub async fn send_work_assignment_email(
        &self,
        to_email: &str,
        to_name: &str,
        assigner_name: &str,
        society_name: &str,
        title: &str,
        description: &str,
        deadline: &str,
    ) -> Result<()> {
        let subject = format!("New Work Assigned: {}", title);

        let html_body = format!(
            r#"
<div style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; border: 1px solid #e2e8f0; border-radius: 8px;">
  <h2 style="color: #0f172a; margin-bottom: 16px;">New Task Assigned</h2>
  <p style="color: #475569; font-size: 16px; line-height: 24px;">
    Hello <strong>{to_name}</strong>,
  </p>
  <p style="color: #475569; font-size: 16px; line-height: 24px;">
    You have been assigned a new task in <strong>{society_name}</strong> by {assigner_name}.
  </p>
  <div style="background-color: #f8fafc; padding: 16px; border-radius: 8px; margin: 24px 0;">
    <p style="margin: 0; font-weight: 700; color: #0f172a;">{title}</p>
    <p style="margin: 8px 0 0; color: #64748b; font-size: 14px;">{description}</p>
    <p style="margin: 16px 0 0; font-size: 14px; color: #dc2626;"><strong>Deadline:</strong> {deadline}</p>
  </div>
  <p style="color: #475569; font-size: 14px;">
    Please log in to your dashboard to view more details and update progress.
  </p>
</div>
            "#,
        );

        let text_body = format!(
            "New task assigned\n\nHello {to_name},\n\nYou have been assigned a new task in {society_name} by {assigner_name}.\n\n{title}\n{description}\nDeadline: {deadline}\n\nPlease log in to your dashboard to view more details.\n",
        );

        self.send_email(to_email, &subject, &text_body, &html_body)
            .await
    }

    /// Direct admin broadcast message.
    pub async fn send_broadcast_email(
        &self,
        to_email: &str,
        to_name: &str,
        title: &str,
        content: &str,
    ) -> Result<()> {
        let html_body = format!(
            r#"
<div style="font-family: sans-serif; max-width: 600px; padding: 20px; border: 1px solid #e2e8f0; border-radius: 10px;">
  <h2 style="color: #002147;">Department Message</h2>
  <p>Hello {to_name},</p>
  <div style="background: #f8fafc; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="margin-top: 0;">{title}</h3>
    <p style="white-space: pre-wrap;">{content}</p>
  </div>
  <p style="color: #64748b; font-size: 0.8rem;">Sent by the department administration</p>
</div>
            "#,
        );

        let text_body = format!(
            "Department message\n\nHello {to_name},\n\n{title}\n\n{content}\n\nSent by the department administration\n",
        );

        self.send_email(to_email, title, &text_body, &html_body)
            .await
    }

    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<()> {
        if to_email.is_empty() {
            return Err(AppError::Email("Recipient email cannot be empty".into()));
        }

        let from = format!(
            "{} <{}>",
            self.config.from_name, self.config.smtp_username
        )
        .parse()
        .map_err(|e| AppError::Email(format!("Invalid from address: {}", e)))?;

        let to = to_email
            .parse()
            .map_err(|e| AppError::Email(format!("Invalid to address: {}", e)))?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        let mailer = self.create_transport()?;
        mailer.send(message).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> EmailConfig {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_name: "Test".to_string(),
            client_url: "http://localhost:3000".to_string(),
        }
    }

    #[test]
    fn test_unconfigured_without_credentials() {
        let service = EmailService::new(test_config());
        assert!(!service.is_configured());
    }

    #[test]
    fn test_configured_with_credentials() {
        let mut config = test_config();
        config.smtp_username = "mailer@example.com".into();
        config.smtp_password = "secret".into();
        let service = EmailService::new(config);
        assert!(service.is_configured());
    }

    #[tokio::test]
    async fn test_empty_recipient_rejected() {
        let service = EmailService::new(test_config());
        let result = service.send_verification_email("", "Verify", "123456").await;
        assert!(result.is_err());
    }
}
