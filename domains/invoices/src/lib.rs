//! Invoices domain: invoice life cycle and client-facing breakdowns

pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::aggregator::{InvoiceAggregator, InvoiceLineItem, InvoiceSummary};
pub use domain::entities::{Invoice, InvoiceDraft, InvoiceStatus};
pub use domain::state::{InvoiceEvent, InvoiceState, InvoiceStateMachine};
pub use repository::memory::InMemoryInvoiceRepository;
pub use repository::InvoiceRepository;
