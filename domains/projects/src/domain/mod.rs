//! Projects domain layer: entities, styles, price books, pricing, statuses, policy

pub mod entities;
pub mod policy;
pub mod price_book;
pub mod pricing;
pub mod status;
pub mod style;
