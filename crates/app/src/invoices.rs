//! Invoice workflow
//!
//! Invoices are admin-only. Unlike project delivery mail, the invoice mail is
//! part of the operation: an invoice only becomes `sent` once the mail sink
//! has accepted it.

use std::sync::Arc;

use uuid::Uuid;

use reelflow_common::{Error, Result};
use reelflow_email::EmailService;
use reelflow_invoices::{
    Invoice, InvoiceAggregator, InvoiceDraft, InvoiceRepository, InvoiceSummary,
};
use reelflow_notifications::UserDirectory;
use reelflow_projects::{Project, ProjectRepository};

use crate::actor::Actor;

#[derive(Clone)]
pub struct InvoiceService {
    invoices: Arc<dyn InvoiceRepository>,
    projects: Arc<dyn ProjectRepository>,
    directory: Arc<dyn UserDirectory>,
    mail: Arc<dyn EmailService>,
    aggregator: InvoiceAggregator,
    number_prefix: String,
}

impl InvoiceService {
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        projects: Arc<dyn ProjectRepository>,
        directory: Arc<dyn UserDirectory>,
        mail: Arc<dyn EmailService>,
        number_prefix: impl Into<String>,
    ) -> Self {
        Self {
            invoices,
            projects,
            directory,
            mail,
            aggregator: InvoiceAggregator::new(),
            number_prefix: number_prefix.into(),
        }
    }

    /// Build a pending invoice for `client_id` over `project_ids`
    pub async fn compose(
        &self,
        actor: Actor,
        client_id: Uuid,
        project_ids: &[Uuid],
        draft: InvoiceDraft,
    ) -> Result<Invoice> {
        actor.require_admin()?;
        let projects = self.load_client_projects(client_id, project_ids).await?;
        let summary = self.aggregator.summarize(&projects);

        let invoice = Invoice::new(
            client_id,
            &self.number_prefix,
            draft,
            summary.project_ids(),
            summary.total,
        )?;
        self.invoices.save(&invoice).await?;
        self.invoices
            .set_projects(invoice.id, &invoice.project_ids)
            .await?;

        tracing::info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            projects = invoice.project_ids.len(),
            total = %invoice.total_amount,
            "Invoice composed"
        );
        Ok(invoice)
    }

    /// Replace the project set and recompute the total
    pub async fn update(
        &self,
        actor: Actor,
        id: Uuid,
        project_ids: &[Uuid],
        draft: InvoiceDraft,
    ) -> Result<Invoice> {
        actor.require_admin()?;
        let mut invoice = self.load(id).await?;
        let projects = self
            .load_client_projects(invoice.client_id, project_ids)
            .await?;
        let summary = self.aggregator.summarize(&projects);

        invoice.recompose(draft, summary.project_ids(), summary.total)?;
        self.invoices.save(&invoice).await?;
        self.invoices
            .set_projects(invoice.id, &invoice.project_ids)
            .await?;

        tracing::info!(invoice_id = %invoice.id, total = %invoice.total_amount, "Invoice updated");
        Ok(invoice)
    }

    /// Itemized view of an invoice's current projects
    pub async fn summary(&self, actor: Actor, id: Uuid) -> Result<InvoiceSummary> {
        actor.require_admin()?;
        self.load(id).await?;
        let projects = self.invoices.projects_for(id).await?;
        Ok(self.aggregator.summarize(&projects))
    }

    /// Email the invoice to the client's primary address, then mark it sent
    pub async fn send(&self, actor: Actor, id: Uuid) -> Result<Invoice> {
        actor.require_admin()?;
        let invoice = self.load(id).await?;

        // Reject terminal invoices before any mail goes out
        let mut sent = invoice.clone();
        sent.mark_sent()?;

        let contact = self
            .directory
            .contact(invoice.client_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Client {} not found", invoice.client_id)))?;
        let email = contact.primary_email().ok_or_else(|| {
            Error::Validation(format!("Client {} has no email address", contact.name))
        })?;

        let projects = self.invoices.projects_for(id).await?;
        let summary = self.aggregator.summarize(&projects);

        let receipt = self
            .mail
            .send_invoice(
                vec![email],
                invoice.id,
                &invoice.invoice_number,
                &summary.email_lines(),
                &summary.formatted_total(),
                invoice.paypal_link.as_deref(),
            )
            .await
            .map_err(|e| Error::Internal(format!("Failed to send invoice email: {}", e)))?;

        self.invoices.save(&sent).await?;

        tracing::info!(
            invoice_id = %sent.id,
            invoice_number = %sent.invoice_number,
            message_id = %receipt.message_id,
            "Invoice sent"
        );
        Ok(sent)
    }

    pub async fn mark_paid(&self, actor: Actor, id: Uuid) -> Result<Invoice> {
        actor.require_admin()?;
        let mut invoice = self.load(id).await?;
        invoice.mark_paid()?;
        self.invoices.save(&invoice).await?;

        tracing::info!(invoice_id = %invoice.id, "Invoice marked paid");
        Ok(invoice)
    }

    /// Cancel and release the projects for another invoice
    pub async fn cancel(&self, actor: Actor, id: Uuid) -> Result<Invoice> {
        actor.require_admin()?;
        let mut invoice = self.load(id).await?;
        invoice.cancel()?;
        self.invoices.save(&invoice).await?;
        self.invoices.set_projects(invoice.id, &[]).await?;

        tracing::info!(invoice_id = %invoice.id, "Invoice cancelled");
        Ok(invoice)
    }

    async fn load(&self, id: Uuid) -> Result<Invoice> {
        self.invoices
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Invoice {} not found", id)))
    }

    async fn load_client_projects(&self, client_id: Uuid, ids: &[Uuid]) -> Result<Vec<Project>> {
        let mut projects = Vec::with_capacity(ids.len());
        for id in ids {
            if projects.iter().any(|p: &Project| p.id == *id) {
                continue;
            }
            let project = self
                .projects
                .get(*id)
                .await?
                .ok_or_else(|| Error::NotFound(format!("Project {} not found", id)))?;
            if !project.is_owned_by(client_id) {
                return Err(Error::Validation(format!(
                    "Project {} does not belong to client {}",
                    id, client_id
                )));
            }
            projects.push(project);
        }
        Ok(projects)
    }
}
