//! Data Transfer Objects
//!
//! Request and response envelopes of the ClinIQ HTTP API that do not stand on
//! their own as domain records.

pub mod document;
pub mod job;
pub mod upload;
