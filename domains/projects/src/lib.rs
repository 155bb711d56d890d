//! Projects domain: orders, price books, status workflow

pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{AdminProjectUpdate, OutputLink, Project, ProjectDraft};
pub use domain::policy::{StatusTransitionPolicy, TransitionContext};
pub use domain::price_book::{PriceBook, CLIENT_BOOK_V1, EDITOR_BOOK_V1};
pub use domain::pricing::{
    EffectEntry, ExtraFields, LineKind, PerPropertyCount, PriceCalculator, PriceLine,
    PricingInput, PricingRequest, Quantity, Quote,
};
pub use domain::status::{ClientStatus, Priority, ProjectStatus, StatusFilter};
pub use domain::style::{ProjectStyle, StyleKind, StyleSelection, Tier, VideoFormat};
pub use repository::memory::InMemoryProjectRepository;
pub use repository::ProjectRepository;
