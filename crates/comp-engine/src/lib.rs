//! Compensation evaluation engine and the service plumbing that feeds it.
//!
//! The [`compensation`] module holds the pure bonus engine together with the
//! data-source trait, ingestion helpers, and HTTP router used by the API service.

pub mod compensation;
pub mod config;
pub mod error;
pub mod telemetry;
