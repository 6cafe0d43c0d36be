use thiserror::Error;

use crate::view::PresentationState;

/// A lookup that could not produce an answer
///
/// Distinct from a code that was looked up and not found: that is a
/// business outcome, this is a failure the user should retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid document table: {0}")]
    InvalidTable(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("Blank code key in document table: {0:?}")]
    BlankKey(String),

    #[error("Duplicate code after normalization: {0}")]
    DuplicateKey(String),

    #[error("Reason given for non-revoked document: {0}")]
    UnexpectedReason(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("Invalid transition from {from:?} on {event}")]
    InvalidTransition {
        from: PresentationState,
        event: &'static str,
    },
}
