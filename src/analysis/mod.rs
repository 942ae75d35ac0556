//! Analysis modules.
//!
//! Per-question aggregation lives in `aggregator`, the permissive answer
//! readers it relies on in `answers`, and response-level views in `responses`.

pub mod aggregator;
pub mod answers;
pub mod responses;

pub use aggregator::*;
pub use responses::*;
