//! Collaborator interface for invoice storage

pub mod memory;

use uuid::Uuid;

use reelflow_common::RepositoryError;
use reelflow_projects::Project;

use crate::domain::entities::Invoice;

#[async_trait::async_trait]
pub trait InvoiceRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Invoice>, RepositoryError>;

    /// Insert or replace
    async fn save(&self, invoice: &Invoice) -> Result<(), RepositoryError>;

    /// Projects currently attached to an invoice
    async fn projects_for(&self, invoice_id: Uuid) -> Result<Vec<Project>, RepositoryError>;

    /// Replace the attached project set; an empty set detaches everything
    async fn set_projects(&self, invoice_id: Uuid, project_ids: &[Uuid])
        -> Result<(), RepositoryError>;
}
