//! ClinIQ Core
//!
//! Wire types shared by the ClinIQ client and CLI.
//!
//! This crate contains:
//! - Domain types: jobs, documents, validation reports, audit entries, analytics
//! - DTOs: request/response envelopes of the ClinIQ HTTP API
//!
//! Note: the document conversion pipeline lives server-side; these types only
//! describe what the API exposes.

pub mod domain;
pub mod dto;
