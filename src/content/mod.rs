//! Content analysis utilities
//!
//! Stateless text and DOM primitives the check executors are built from:
//! - `length` - length-to-score curve
//! - `brand` - brand normalization and cascading candidate resolution
//! - `domain` - effective domain (eTLD+1) extraction
//! - `text` - word-boundary containment and word counts
//! - `structured_data` - JSON-LD extraction and type matching
//! - `cascade` - first-match-wins resolution over lazy suppliers
//! - `document` - payload selection, size cap and the parsed page

pub mod brand;
pub mod cascade;
pub mod document;
pub mod domain;
pub mod length;
pub mod structured_data;
pub mod text;

pub use brand::{normalize_brand, resolve_brand};
pub use cascade::{Cascade, Resolved};
pub use document::{DocumentLimits, PageDocument, PayloadSource};
pub use domain::{registrable_domain, same_site};
pub use length::length_score;
pub use structured_data::StructuredData;
pub use text::contains_at_word_boundary;
