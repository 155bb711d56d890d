//! Mock Email Service Implementation
//!
//! Provides in-memory email capture for testing without a transport.
//! Captured messages are indexed by recipient so workflow tests can assert on
//! who was mailed and with which template.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EmailError, EmailMessage, EmailReceipt, EmailService};

/// Email captured by the mock service
#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub message: EmailMessage,
    pub receipt: EmailReceipt,
    pub captured_at: DateTime<Utc>,
}

impl CapturedEmail {
    /// Extract the project id a delivery email refers to
    pub fn project_id(&self) -> Option<Uuid> {
        self.message
            .metadata
            .get("project_id")
            .and_then(|id| Uuid::parse_str(id).ok())
    }

    /// Extract the invoice id an invoice email refers to
    pub fn invoice_id(&self) -> Option<Uuid> {
        self.message
            .metadata
            .get("invoice_id")
            .and_then(|id| Uuid::parse_str(id).ok())
    }
}

/// Mock email service for testing
#[derive(Debug, Clone)]
pub struct MockEmailService {
    emails: Arc<Mutex<Vec<CapturedEmail>>>,
    email_by_recipient: Arc<Mutex<HashMap<String, Vec<CapturedEmail>>>>,
    failing: Arc<AtomicBool>,
    enabled: bool,
    default_from: String,
    app_base_url: String,
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self {
            emails: Arc::new(Mutex::new(Vec::new())),
            email_by_recipient: Arc::new(Mutex::new(HashMap::new())),
            failing: Arc::new(AtomicBool::new(false)),
            enabled: true,
            default_from: "orders@reelflow.app".to_string(),
            app_base_url: "https://reelflow.app".to_string(),
        }
    }

    /// Create a disabled mock email service (for testing)
    pub fn new_disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Override sender address and link base
    pub fn with_sender(mut self, default_from: String, app_base_url: String) -> Self {
        self.default_from = default_from;
        self.app_base_url = app_base_url;
        self
    }

    /// Make every subsequent send fail with a transport error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get all captured emails
    pub fn get_all_emails(&self) -> Vec<CapturedEmail> {
        self.emails.lock().unwrap().clone()
    }

    /// Get emails sent to a specific recipient
    pub fn get_emails_for_recipient(&self, email: &str) -> Vec<CapturedEmail> {
        self.email_by_recipient
            .lock()
            .unwrap()
            .get(email)
            .cloned()
            .unwrap_or_default()
    }

    /// Get emails rendered from a given template
    pub fn get_emails_with_template(&self, template: &str) -> Vec<CapturedEmail> {
        self.get_all_emails()
            .into_iter()
            .filter(|e| e.message.template() == Some(template))
            .collect()
    }

    /// Get count of emails sent
    pub fn email_count(&self) -> usize {
        self.emails.lock().unwrap().len()
    }

    /// Clear all captured emails
    pub fn clear(&self) {
        self.emails.lock().unwrap().clear();
        self.email_by_recipient.lock().unwrap().clear();
    }

    /// Check if email sending is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        message.validate()?;

        if self.failing.load(Ordering::SeqCst) {
            return Err(EmailError::Transport(
                "mock transport configured to fail".to_string(),
            ));
        }

        if !self.enabled {
            tracing::warn!("Mock email service disabled, skipping send");
            return Ok(EmailReceipt {
                message_id: format!("disabled-{}", Uuid::new_v4()),
                sent_at: Utc::now(),
                provider: "mock-disabled".to_string(),
                metadata: message.metadata.clone(),
            });
        }

        tracing::info!(recipients = ?message.to, "Mock email service capturing email");

        let receipt = EmailReceipt {
            message_id: format!("mock-{}", Uuid::new_v4()),
            sent_at: Utc::now(),
            provider: "mock".to_string(),
            metadata: message.metadata.clone(),
        };

        let captured = CapturedEmail {
            message: message.clone(),
            receipt: receipt.clone(),
            captured_at: Utc::now(),
        };

        self.emails.lock().unwrap().push(captured.clone());

        let mut by_recipient = self.email_by_recipient.lock().unwrap();
        for recipient in &message.to {
            by_recipient
                .entry(recipient.clone())
                .or_default()
                .push(captured.clone());
        }

        tracing::info!(message_id = %receipt.message_id, "Email captured successfully");

        Ok(receipt)
    }

    fn default_from(&self) -> String {
        self.default_from.clone()
    }

    fn app_base_url(&self) -> &str {
        &self.app_base_url
    }
}
