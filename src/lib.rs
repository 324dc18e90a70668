//! sitegrade - content diagnostics and composite scoring
//!
//! Evaluates crawled pages against an externally managed catalog of
//! criteria, runs site-level checks once every page is stored, and folds
//! everything into a weighted composite score.
//!
//! ```text
//! catalog ─► page checks (per page, parallel) ─► store ─► site checks ─► composite
//! ```

pub mod catalog;
pub mod checks;
pub mod cli;
pub mod config;
pub mod content;
pub mod engine;
pub mod error;
pub mod models;
pub mod reporters;
pub mod scoring;
pub mod store;

pub use error::{EngineError, EngineResult};
