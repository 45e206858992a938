//! External service interactions
//!
//! This module contains services for interacting with external systems:
//! - The `/lunar-data` HTTP endpoint
//! - Background fetch execution
//! - Export of snapshots to disk

pub mod client;
pub mod export;
pub mod fetch_runner;

pub use client::{HttpTransport, Transport, DEFAULT_LOCATION};
pub use export::{export_snapshot, ExportFormat};
pub use fetch_runner::{FetchOutcome, FetchRunner};
