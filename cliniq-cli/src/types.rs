//! Common types used across CLI modules

use clap::ValueEnum;
use cliniq_core::domain::job::UseCase;
use uuid::Uuid;

/// Job identifier as typed by the user
///
/// Input that parses as a UUID is taken as a complete ID; anything else may
/// be a prefix. The original text is kept as-is in both cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdOrPrefix {
    /// Complete ID, sent to the service untouched
    Full(String),
    /// Possibly shortened ID, resolved against the job history
    Prefix(String),
}

impl IdOrPrefix {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if Uuid::parse_str(input).is_ok() {
            IdOrPrefix::Full(input.to_string())
        } else {
            IdOrPrefix::Prefix(input.to_string())
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, IdOrPrefix::Full(_))
    }

    /// The raw input
    pub fn as_str(&self) -> &str {
        match self {
            IdOrPrefix::Full(id) | IdOrPrefix::Prefix(id) => id,
        }
    }
}

impl std::fmt::Display for IdOrPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Use case selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UseCaseArg {
    /// Insurance claim submission
    ClaimSubmission,
    /// Pre-authorisation request
    PreAuthorisation,
}

impl From<UseCaseArg> for UseCase {
    fn from(arg: UseCaseArg) -> Self {
        match arg {
            UseCaseArg::ClaimSubmission => UseCase::ClaimSubmission,
            UseCaseArg::PreAuthorisation => UseCase::PreAuthorisation,
        }
    }
}
