//! Report Module - Paginated Document Layout
//!
//! Lays out the exported report from the untruncated indicator list:
//! - Header, verdict banner, risk card, submitted content
//! - Every indicator as its own row
//! - Footer pass with page numbers

pub mod layout;
pub mod paginator;
pub mod text;
pub mod types;

pub use layout::{layout, layout_with};
pub use paginator::{FooterText, Paginator, PaginatorState, Placement};
pub use types::*;

#[cfg(test)]
mod tests;
