//! Classification and scoring engine for the relationship-manager dashboard.
//!
//! Data flow:
//!   ClientRecord → classifier (tag, potential value, loyalty)
//!                → Portfolio (validated, de-duplicated, ordered)
//!                → aggregator (filtered statistics, segments, ranked lists)
//!
//! The PipelineTracker is an independent side store keyed by client name.
//! Nothing here knows which client the UI currently has selected.

pub mod aggregator;
pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod insights;
pub mod pipeline;
pub mod portfolio;
pub mod types;
