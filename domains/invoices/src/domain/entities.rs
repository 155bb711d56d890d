//! Domain entities for Invoices domain

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reelflow_common::{Error, Result};

use crate::domain::state::{InvoiceEvent, InvoiceState, InvoiceStateMachine};

/// Invoice status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Sent,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    #[mutants::skip] // Delegates to InvoiceState::is_terminal()
    pub fn is_terminal(&self) -> bool {
        self.to_state().is_terminal()
    }

    pub fn to_state(&self) -> InvoiceState {
        match self {
            InvoiceStatus::Pending => InvoiceState::Pending,
            InvoiceStatus::Sent => InvoiceState::Sent,
            InvoiceStatus::Paid => InvoiceState::Paid,
            InvoiceStatus::Cancelled => InvoiceState::Cancelled,
        }
    }

    pub fn from_state(state: InvoiceState) -> Self {
        match state {
            InvoiceState::Pending => InvoiceStatus::Pending,
            InvoiceState::Sent => InvoiceStatus::Sent,
            InvoiceState::Paid => InvoiceStatus::Paid,
            InvoiceState::Cancelled => InvoiceStatus::Cancelled,
        }
    }
}

/// Caller-supplied invoice fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    #[serde(default)]
    pub paypal_link: Option<String>,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

impl InvoiceDraft {
    pub fn validate(&self) -> Result<()> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if to < from {
                return Err(Error::Validation(
                    "Billing period must end on or after its start".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Invoice entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub client_id: Uuid,
    pub invoice_number: String,
    pub status: InvoiceStatus,
    /// Sum of the attached projects' client prices
    pub total_amount: Decimal,
    pub paypal_link: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub project_ids: Vec<Uuid>,
    pub sent_at: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Create a pending invoice over `project_ids`
    pub fn new(
        client_id: Uuid,
        number_prefix: &str,
        draft: InvoiceDraft,
        project_ids: Vec<Uuid>,
        total_amount: Decimal,
    ) -> Result<Self> {
        draft.validate()?;
        if project_ids.is_empty() {
            return Err(Error::Validation(
                "An invoice needs at least one project".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Invoice {
            id: Uuid::new_v4(),
            client_id,
            invoice_number: Self::generate_number(number_prefix),
            status: InvoiceStatus::default(),
            total_amount,
            paypal_link: clean_link(draft.paypal_link),
            date_from: draft.date_from,
            date_to: draft.date_to,
            project_ids,
            sent_at: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// `prefix` followed by 8 uppercase alphanumerics
    pub fn generate_number(prefix: &str) -> String {
        let random = Uuid::new_v4().simple().to_string();
        format!("{}{}", prefix, random[..8].to_uppercase())
    }

    /// Replace the project set and billing details
    pub fn recompose(
        &mut self,
        draft: InvoiceDraft,
        project_ids: Vec<Uuid>,
        total_amount: Decimal,
    ) -> Result<()> {
        if self.status.is_terminal() {
            return Err(Error::Validation(format!(
                "Invoice {} is {} and can no longer change",
                self.invoice_number,
                self.status.to_state()
            )));
        }
        draft.validate()?;
        if project_ids.is_empty() {
            return Err(Error::Validation(
                "An invoice needs at least one project".to_string(),
            ));
        }

        self.paypal_link = clean_link(draft.paypal_link);
        self.date_from = draft.date_from;
        self.date_to = draft.date_to;
        self.project_ids = project_ids;
        self.total_amount = total_amount;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record that the invoice mail was accepted
    pub fn mark_sent(&mut self) -> Result<()> {
        self.apply(InvoiceEvent::Send)?;
        self.sent_at = Some(Utc::now());
        Ok(())
    }

    pub fn mark_paid(&mut self) -> Result<()> {
        self.apply(InvoiceEvent::MarkPaid)?;
        self.paid_at = Some(Utc::now());
        Ok(())
    }

    /// Cancel and release the projects
    pub fn cancel(&mut self) -> Result<()> {
        self.apply(InvoiceEvent::Cancel)?;
        self.project_ids.clear();
        Ok(())
    }

    pub fn can_send(&self) -> bool {
        InvoiceStateMachine::can_transition(self.status.to_state(), InvoiceEvent::Send)
    }

    fn apply(&mut self, event: InvoiceEvent) -> Result<()> {
        let next = InvoiceStateMachine::transition(self.status.to_state(), event)?;
        self.status = InvoiceStatus::from_state(next);
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn clean_link(link: Option<String>) -> Option<String> {
    link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty())
}
