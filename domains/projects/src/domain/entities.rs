//! Domain entities for Projects domain
//!
//! A project is one production order. Its editor price is always derived from
//! the pricing attributes through the editor price book; the client-facing
//! total is supplied by the caller and only ever validated here.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reelflow_common::{Error, Result};

use crate::domain::pricing::{PriceCalculator, PricingInput, PricingRequest};
use crate::domain::status::{Priority, ProjectStatus};

const MAX_NAME_LEN: usize = 200;

/// A delivered file or share link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLink {
    pub name: String,
    pub link: String,
}

impl OutputLink {
    /// Links without a scheme get `https://`
    pub fn new(name: impl Into<String>, link: &str) -> Self {
        let link = link.trim();
        let link = if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("https://{}", link)
        };
        Self {
            name: name.into(),
            link,
        }
    }
}

/// Caller-supplied fields for creating or fully updating a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub project_name: String,
    #[serde(default)]
    pub service_id: Option<Uuid>,
    #[serde(flatten)]
    pub pricing: PricingInput,
    #[serde(default)]
    pub total_price: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ProjectDraft {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.project_name)?;
        validate_total_price(self.total_price)
    }
}

/// Admin full update: the editable fields plus workflow changes in one call
///
/// `None` leaves the status or editor as it is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminProjectUpdate {
    #[serde(flatten)]
    pub draft: ProjectDraft,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub editor_id: Option<Uuid>,
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("Project name is required".to_string()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(Error::Validation(
            "Project name must be ≤200 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_total_price(total_price: Decimal) -> Result<()> {
    if total_price < Decimal::ZERO {
        return Err(Error::Validation(
            "Total price must not be negative".to_string(),
        ));
    }
    Ok(())
}

/// Project entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub client_id: Uuid,
    pub editor_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub project_name: String,
    #[serde(flatten)]
    pub pricing: PricingInput,
    /// Editor compensation, derived
    pub editor_price: Decimal,
    /// Client billing, supplied
    pub total_price: Decimal,
    pub status: ProjectStatus,
    pub priority: Option<Priority>,
    pub output_links: Vec<OutputLink>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project for `client_id`, priced with `calculator`
    pub fn new(client_id: Uuid, draft: ProjectDraft, calculator: &PriceCalculator) -> Result<Self> {
        draft.validate()?;

        let now = Utc::now();
        let mut project = Project {
            id: Uuid::new_v4(),
            client_id,
            editor_id: None,
            service_id: draft.service_id,
            project_name: draft.project_name.trim().to_string(),
            pricing: draft.pricing,
            editor_price: Decimal::ZERO,
            total_price: draft.total_price,
            status: ProjectStatus::default(),
            priority: None,
            output_links: Vec::new(),
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        project.reprice(calculator);
        Ok(project)
    }

    /// Validate invariants
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.project_name)?;
        validate_total_price(self.total_price)
    }

    /// Replace every caller-editable field and reprice
    pub fn apply_update(&mut self, draft: ProjectDraft, calculator: &PriceCalculator) -> Result<()> {
        draft.validate()?;

        self.project_name = draft.project_name.trim().to_string();
        self.service_id = draft.service_id;
        self.pricing = draft.pricing;
        self.total_price = draft.total_price;
        self.notes = draft.notes;
        self.reprice(calculator);
        Ok(())
    }

    /// Apply an admin full update and reprice
    pub fn apply_admin_update(
        &mut self,
        update: AdminProjectUpdate,
        calculator: &PriceCalculator,
    ) -> Result<()> {
        self.apply_update(update.draft, calculator)?;
        if let Some(status) = update.status {
            self.set_status(status);
        }
        if let Some(editor_id) = update.editor_id {
            self.assign_editor(Some(editor_id));
        }
        Ok(())
    }

    /// Status-only change; prices are left alone
    pub fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Assign (or unassign) the editor, returning the previous one
    pub fn assign_editor(&mut self, editor_id: Option<Uuid>) -> Option<Uuid> {
        let previous = std::mem::replace(&mut self.editor_id, editor_id);
        self.updated_at = Utc::now();
        previous
    }

    pub fn set_output_links(&mut self, links: Vec<OutputLink>) {
        self.output_links = links
            .into_iter()
            .map(|l| OutputLink::new(l.name, &l.link))
            .collect();
        self.updated_at = Utc::now();
    }

    /// Admin adjustment of the client-facing price
    pub fn set_total_price(&mut self, total_price: Decimal) -> Result<()> {
        validate_total_price(total_price)?;
        self.total_price = total_price;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn pricing_request(&self) -> PricingRequest {
        PricingRequest::parse(&self.pricing)
    }

    pub fn is_owned_by(&self, client_id: Uuid) -> bool {
        self.client_id == client_id
    }

    pub fn is_assigned_to(&self, editor_id: Uuid) -> bool {
        self.editor_id == Some(editor_id)
    }

    pub fn link_urls(&self) -> Vec<String> {
        self.output_links.iter().map(|l| l.link.clone()).collect()
    }

    fn reprice(&mut self, calculator: &PriceCalculator) {
        self.editor_price = calculator.compute(&self.pricing_request());
        self.priority = Priority::for_rush(self.pricing.rush);
        self.updated_at = Utc::now();
    }
}
