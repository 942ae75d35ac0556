//! Ingrevo Survey - survey response aggregation and reporting.
//!
//! Turns a survey schema and a snapshot of respondent documents into
//! per-question statistics, and renders them as Markdown, JSON or CSV.
//!
//! ```no_run
//! use ingrevo_survey::analysis::aggregate;
//! use ingrevo_survey::store::{load_responses, load_survey, LoadOptions};
//! use std::path::Path;
//!
//! let survey = load_survey(Path::new("survey.json"))?;
//! let responses = load_responses(Path::new("responses/"), &LoadOptions::default())?;
//! let stats = aggregate(&survey, &responses);
//! # Ok::<(), ingrevo_survey::store::StoreError>(())
//! ```

pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod models;
pub mod report;
pub mod store;
