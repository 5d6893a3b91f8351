//! # gondola-core
//!
//! Label audit engine for retail operations. Ingests vendor price
//! spreadsheets (messy CSV exports with unreliable encodings), tracks
//! shelf verification of every item, and aggregates divergence figures
//! across audits, optionally merged with discount data from the store's
//! ERP.

pub mod aggregate;
pub mod erp;
pub mod error;
pub mod ingest;
pub mod model;
pub mod parsing;
pub mod report;
pub mod store;

pub use aggregate::{aggregate, AggregateQuery, AggregateResult};
pub use error::GondolaError;
pub use ingest::{complete_audit, ingest_bytes, ingest_file, verify_item, IngestMeta};
pub use store::AuditStore;
