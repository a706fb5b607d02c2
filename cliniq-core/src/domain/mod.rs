//! Core domain types
//!
//! These types mirror the records the ClinIQ service tracks for every upload.
//! The service owns their lifecycle; the client only reads them (and patches
//! extracted fields).

pub mod analytics;
pub mod audit;
pub mod document;
pub mod job;
pub mod timestamp;
pub mod validation;
