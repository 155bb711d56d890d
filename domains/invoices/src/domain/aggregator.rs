//! Invoice aggregation
//!
//! The total is the sum of what was agreed with the client (each project's
//! stored `total_price`). The per-project breakdown is descriptive only and is
//! priced from the client book with the same line rules as editor pricing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reelflow_email::InvoiceEmailLine;
use reelflow_projects::{PriceCalculator, Project};

const MAX_LINE_NAME_CHARS: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub project_id: Uuid,
    pub project_name: String,
    pub style: String,
    pub description: Vec<String>,
    pub amount: Decimal,
}

impl InvoiceLineItem {
    pub fn to_email_line(&self) -> InvoiceEmailLine {
        InvoiceEmailLine {
            project_name: self.project_name.clone(),
            service: self.style.clone(),
            description: self.description.clone(),
            amount: format_amount(self.amount),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceSummary {
    pub line_items: Vec<InvoiceLineItem>,
    pub total: Decimal,
}

impl InvoiceSummary {
    pub fn project_ids(&self) -> Vec<Uuid> {
        self.line_items.iter().map(|l| l.project_id).collect()
    }

    pub fn email_lines(&self) -> Vec<InvoiceEmailLine> {
        self.line_items.iter().map(InvoiceLineItem::to_email_line).collect()
    }

    pub fn formatted_total(&self) -> String {
        format_amount(self.total)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InvoiceAggregator {
    calculator: PriceCalculator,
}

impl Default for InvoiceAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceAggregator {
    /// Aggregator over the current client price book
    pub fn new() -> Self {
        Self::with_calculator(PriceCalculator::client())
    }

    pub fn with_calculator(calculator: PriceCalculator) -> Self {
        Self { calculator }
    }

    pub fn summarize(&self, projects: &[Project]) -> InvoiceSummary {
        let line_items: Vec<InvoiceLineItem> = projects.iter().map(|p| self.line_item(p)).collect();
        let total = projects.iter().map(|p| p.total_price).sum();

        tracing::debug!(
            projects = projects.len(),
            book = self.calculator.book().version,
            total = %total,
            "Summarized invoice"
        );

        InvoiceSummary { line_items, total }
    }

    fn line_item(&self, project: &Project) -> InvoiceLineItem {
        let request = project.pricing_request();
        let quote = self.calculator.quote(&request);
        let style = match request.style.style {
            Some(style) => style.label(),
            None => request.style.normalized.clone(),
        };

        InvoiceLineItem {
            project_id: project.id,
            project_name: truncate_name(&project.project_name),
            style,
            description: quote.descriptions(),
            amount: project.total_price,
        }
    }
}

fn truncate_name(name: &str) -> String {
    if name.chars().count() <= MAX_LINE_NAME_CHARS {
        return name.to_string();
    }
    let head: String = name.chars().take(MAX_LINE_NAME_CHARS).collect();
    format!("{}...", head.trim_end())
}

fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}
