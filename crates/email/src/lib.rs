//! Reelflow Email Service
//!
//! The mail sink used by the order workflow:
//! - `EmailService` trait that any transport implements
//! - Delivery ("your project is ready") and invoice email content
//! - Mock email service capturing messages for tests and development
//!
//! Transport is fire-and-forget from the caller's point of view: callers log a
//! failed send and carry on.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod content;
pub mod mock;

pub use content::InvoiceEmailLine;

/// Template id for the "project delivered" mail
pub const TEMPLATE_PROJECT_DELIVERED: &str = "project_delivered";

/// Template id for the invoice mail
pub const TEMPLATE_INVOICE: &str = "invoice";

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email configuration error: {0}")]
    Configuration(String),

    #[error("Email validation error: {0}")]
    Validation(String),

    #[error("Email transport error: {0}")]
    Transport(String),
}

/// Email message to be sent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub from: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl EmailMessage {
    /// Create a new email message
    pub fn new(to: Vec<String>, from: String, subject: String, body_text: String) -> Self {
        Self {
            to,
            from,
            reply_to: None,
            subject,
            body_text,
            body_html: None,
            metadata: HashMap::new(),
        }
    }

    /// Add HTML body content
    pub fn with_html(mut self, body_html: String) -> Self {
        self.body_html = Some(body_html);
        self
    }

    /// Add reply-to address
    pub fn with_reply_to(mut self, reply_to: String) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    /// Add metadata for tracking
    pub fn with_metadata(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// Template id this message was rendered from, if tagged
    pub fn template(&self) -> Option<&str> {
        self.metadata.get("email_type").map(String::as_str)
    }

    /// Reject messages no transport could deliver
    pub fn validate(&self) -> Result<(), EmailError> {
        if self.to.is_empty() {
            return Err(EmailError::Validation(
                "Email must have at least one recipient".to_string(),
            ));
        }
        if self.subject.trim().is_empty() {
            return Err(EmailError::Validation(
                "Email subject must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Email delivery receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub message_id: String,
    pub sent_at: DateTime<Utc>,
    pub provider: String,
    pub metadata: HashMap<String, String>,
}

/// Email service configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Email service provider (mock)
    pub provider: String,
    /// Default from address
    pub default_from: String,
    /// Enable email sending (can disable for testing)
    pub enabled: bool,
    /// Base URL for the application (used in project links)
    pub app_base_url: String,
}

impl EmailConfig {
    /// Create email config from environment variables
    pub fn from_env() -> Result<Self, EmailError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "mock".to_string());

        let default_from =
            std::env::var("FROM_EMAIL").unwrap_or_else(|_| "orders@reelflow.app".to_string());

        let enabled = std::env::var("EMAIL_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let app_base_url =
            std::env::var("APP_BASE_URL").unwrap_or_else(|_| "https://reelflow.app".to_string());

        Ok(Self {
            provider,
            default_from,
            enabled,
            app_base_url,
        })
    }
}

/// Email service trait for different implementations
#[async_trait::async_trait]
pub trait EmailService: Send + Sync {
    /// Send an email message
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError>;

    /// Return the default "from" address for outgoing emails
    fn default_from(&self) -> String;

    /// Return the application base URL for building links
    fn app_base_url(&self) -> &str;

    /// Tell a client their project has been delivered
    async fn send_project_delivered(
        &self,
        recipients: Vec<String>,
        client_name: &str,
        project_id: Uuid,
        project_name: &str,
        output_links: &[String],
    ) -> Result<EmailReceipt, EmailError> {
        let project_url = format!("{}/projects?view={}", self.app_base_url(), project_id);

        let subject = format!("Your Project Has Been Delivered: {}", project_name);
        let body_text =
            content::project_delivered_text(client_name, project_name, output_links, &project_url);
        let body_html =
            content::project_delivered_html(client_name, project_name, output_links, &project_url);

        let message = EmailMessage::new(recipients, self.default_from(), subject, body_text)
            .with_html(body_html)
            .with_metadata("email_type", TEMPLATE_PROJECT_DELIVERED)
            .with_metadata("project_id", project_id);

        self.send_email(message).await
    }

    /// Send an invoice to a client
    async fn send_invoice(
        &self,
        recipients: Vec<String>,
        invoice_id: Uuid,
        invoice_number: &str,
        lines: &[InvoiceEmailLine],
        total: &str,
        paypal_link: Option<&str>,
    ) -> Result<EmailReceipt, EmailError> {
        let subject = format!("Invoice #{}", invoice_number);
        let body_text = content::invoice_text(invoice_number, lines, total, paypal_link);
        let body_html = content::invoice_html(invoice_number, lines, total, paypal_link);

        let message = EmailMessage::new(recipients, self.default_from(), subject, body_text)
            .with_html(body_html)
            .with_metadata("email_type", TEMPLATE_INVOICE)
            .with_metadata("invoice_id", invoice_id)
            .with_metadata("invoice_number", invoice_number);

        self.send_email(message).await
    }
}

/// Email service factory
pub struct EmailServiceFactory;

impl EmailServiceFactory {
    /// Create email service based on configuration
    pub fn create(config: EmailConfig) -> Result<Box<dyn EmailService>, EmailError> {
        if !config.enabled {
            tracing::info!("Email service disabled, using disabled mock implementation");
            return Ok(Box::new(mock::MockEmailService::new_disabled()));
        }

        match config.provider.as_str() {
            "mock" => {
                tracing::info!("Creating mock email service");
                Ok(Box::new(
                    mock::MockEmailService::new()
                        .with_sender(config.default_from, config.app_base_url),
                ))
            }
            provider => Err(EmailError::Configuration(format!(
                "Unknown email provider: {}. Supported providers: mock",
                provider
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_email_message_creation() {
        let message = EmailMessage::new(
            vec!["client@example.com".to_string()],
            "sender@example.com".to_string(),
            "Test Subject".to_string(),
            "Test body".to_string(),
        )
        .with_html("<p>Test body</p>".to_string())
        .with_reply_to("reply@example.com".to_string())
        .with_metadata("email_type", TEMPLATE_INVOICE);

        assert_eq!(message.to, vec!["client@example.com".to_string()]);
        assert_eq!(message.from, "sender@example.com");
        assert_eq!(message.body_html, Some("<p>Test body</p>".to_string()));
        assert_eq!(message.reply_to, Some("reply@example.com".to_string()));
        assert_eq!(message.template(), Some("invoice"));
        assert!(message.validate().is_ok());
    }

    #[test]
    fn test_message_without_recipients_is_invalid() {
        let message = EmailMessage::new(
            Vec::new(),
            "sender@example.com".to_string(),
            "Subject".to_string(),
            "Body".to_string(),
        );
        assert!(matches!(message.validate(), Err(EmailError::Validation(_))));
    }

    #[test]
    #[serial]
    fn test_email_config_from_env() {
        std::env::remove_var("EMAIL_PROVIDER");
        std::env::remove_var("FROM_EMAIL");
        std::env::remove_var("EMAIL_ENABLED");

        let config = EmailConfig::from_env().unwrap();
        assert_eq!(config.provider, "mock");
        assert_eq!(config.default_from, "orders@reelflow.app");
        assert!(config.enabled);
    }

    #[test]
    fn test_factory_rejects_unknown_provider() {
        let config = EmailConfig {
            provider: "carrier-pigeon".to_string(),
            default_from: "orders@reelflow.app".to_string(),
            enabled: true,
            app_base_url: "https://reelflow.app".to_string(),
        };
        assert!(matches!(
            EmailServiceFactory::create(config),
            Err(EmailError::Configuration(_))
        ));
    }
}
