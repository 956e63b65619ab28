//! Résumé intake pipeline.
//!
//! `orchestrator::ResumePipeline` is the entry point; the remaining modules are
//! its stages in execution order.

pub mod classifier;
pub mod config;
pub mod feedback;
pub mod fields;
pub mod handlers;
pub mod orchestrator;
pub mod prefilter;
pub mod redaction;
pub mod validation;

#[cfg(test)]
pub mod testing;
