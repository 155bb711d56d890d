//! In-memory invoice store
//!
//! Project rows are read from a shared project repository so that attached
//! projects always reflect their latest saved state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use reelflow_common::RepositoryError;
use reelflow_projects::{Project, ProjectRepository};

use crate::domain::entities::Invoice;
use crate::repository::InvoiceRepository;

#[derive(Clone)]
pub struct InMemoryInvoiceRepository {
    invoices: Arc<Mutex<HashMap<Uuid, Invoice>>>,
    projects: Arc<dyn ProjectRepository>,
}

impl InMemoryInvoiceRepository {
    pub fn new(projects: Arc<dyn ProjectRepository>) -> Self {
        Self {
            invoices: Arc::new(Mutex::new(HashMap::new())),
            projects,
        }
    }

    pub fn count(&self) -> usize {
        self.invoices.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Invoice>, RepositoryError> {
        Ok(self.invoices.lock().unwrap().get(&id).cloned())
    }

    async fn save(&self, invoice: &Invoice) -> Result<(), RepositoryError> {
        self.invoices
            .lock()
            .unwrap()
            .insert(invoice.id, invoice.clone());
        Ok(())
    }

    async fn projects_for(&self, invoice_id: Uuid) -> Result<Vec<Project>, RepositoryError> {
        let ids = self
            .invoices
            .lock()
            .unwrap()
            .get(&invoice_id)
            .map(|inv| inv.project_ids.clone())
            .ok_or(RepositoryError::NotFound)?;

        let mut projects = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(project) = self.projects.get(id).await? {
                projects.push(project);
            }
        }
        Ok(projects)
    }

    async fn set_projects(
        &self,
        invoice_id: Uuid,
        project_ids: &[Uuid],
    ) -> Result<(), RepositoryError> {
        let mut invoices = self.invoices.lock().unwrap();
        let invoice = invoices
            .get_mut(&invoice_id)
            .ok_or(RepositoryError::NotFound)?;
        invoice.project_ids = project_ids.to_vec();
        Ok(())
    }
}
