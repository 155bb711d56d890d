//! Reelflow application composition root
//!
//! Wires the domain crates into the order and invoice workflows. Storage and
//! transport are collaborators handed in from outside; [`InMemoryBackend`]
//! provides all of them for local runs and tests.

pub mod actor;
pub mod invoices;
pub mod projects;
pub mod telemetry;

use std::sync::Arc;

use chrono::Duration;

use reelflow_common::config::MAX_DEDUP_WINDOW_SECS;
use reelflow_common::Config;
use reelflow_email::mock::MockEmailService;
use reelflow_email::{EmailConfig, EmailService, EmailServiceFactory};
use reelflow_invoices::{InMemoryInvoiceRepository, InvoiceRepository};
use reelflow_notifications::{
    InMemoryNotificationStore, InMemoryUserDirectory, NotificationDeduplicator,
    NotificationDispatcher, NotificationStore, UserDirectory,
};
use reelflow_projects::{InMemoryProjectRepository, ProjectRepository};

pub use actor::Actor;
pub use invoices::InvoiceService;
pub use projects::ProjectService;
pub use telemetry::init_tracing;

/// External collaborators the workflows run against
#[derive(Clone)]
pub struct Collaborators {
    pub projects: Arc<dyn ProjectRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub notifications: Arc<dyn NotificationStore>,
    pub directory: Arc<dyn UserDirectory>,
    pub mail: Arc<dyn EmailService>,
}

/// In-memory collaborators, kept concrete so callers can inspect them
#[derive(Clone)]
pub struct InMemoryBackend {
    pub projects: InMemoryProjectRepository,
    pub invoices: InMemoryInvoiceRepository,
    pub notifications: InMemoryNotificationStore,
    pub directory: InMemoryUserDirectory,
    pub mail: MockEmailService,
}

impl InMemoryBackend {
    pub fn new(mail: MockEmailService) -> Self {
        let projects = InMemoryProjectRepository::new();
        let invoices = InMemoryInvoiceRepository::new(Arc::new(projects.clone()));
        Self {
            projects,
            invoices,
            notifications: InMemoryNotificationStore::new(),
            directory: InMemoryUserDirectory::new(),
            mail,
        }
    }

    /// Same collaborators, with mail going through `mail` instead of the mock
    pub fn collaborators_with_mail(&self, mail: Arc<dyn EmailService>) -> Collaborators {
        Collaborators {
            projects: Arc::new(self.projects.clone()),
            invoices: Arc::new(self.invoices.clone()),
            notifications: Arc::new(self.notifications.clone()),
            directory: Arc::new(self.directory.clone()),
            mail,
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        self.collaborators_with_mail(Arc::new(self.mail.clone()))
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new(MockEmailService::new())
    }
}

/// The assembled workflows
#[derive(Clone)]
pub struct App {
    pub projects: ProjectService,
    pub invoices: InvoiceService,
}

/// Assemble the workflows over `collaborators`
pub fn create_app(config: &Config, collaborators: Collaborators) -> App {
    // Hand-built configs skip `from_env` validation
    let window_secs = config.dedup_window_secs.clamp(1, MAX_DEDUP_WINDOW_SECS);
    let dedup = NotificationDeduplicator::with_window(
        collaborators.notifications.clone(),
        Duration::seconds(window_secs),
    );
    let dispatcher = NotificationDispatcher::new(
        collaborators.notifications.clone(),
        collaborators.directory.clone(),
        collaborators.mail.clone(),
        dedup,
    );

    App {
        projects: ProjectService::new(
            collaborators.projects.clone(),
            dispatcher,
            config.notifications_detached,
        ),
        invoices: InvoiceService::new(
            collaborators.invoices,
            collaborators.projects,
            collaborators.directory,
            collaborators.mail,
            config.invoice_number_prefix.clone(),
        ),
    }
}

/// Load configuration from the environment and assemble an in-memory app
///
/// Mail goes through whichever service the email configuration selects.
pub fn bootstrap() -> anyhow::Result<(App, InMemoryBackend)> {
    let config = Config::from_env()?;
    init_tracing(&config)?;

    let email_config = EmailConfig::from_env()?;
    let mail: Arc<dyn EmailService> = Arc::from(EmailServiceFactory::create(email_config)?);

    let backend = InMemoryBackend::default();
    let app = create_app(&config, backend.collaborators_with_mail(mail));

    tracing::info!(
        dedup_window_secs = config.dedup_window_secs,
        notifications_detached = config.notifications_detached,
        "Reelflow workflows ready"
    );
    Ok((app, backend))
}
