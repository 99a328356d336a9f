//! Library-wide error types.

use thiserror::Error;

/// Errors surfaced by the enablement gate.
///
/// A missing configuration property is never an error — absent keys resolve
/// to the default "enabled" outcome.
#[derive(Debug, Error)]
pub enum GateError {
    /// Configuration file cannot be read, parsed, or merged.
    #[error("config error: {0}")]
    Config(String),

    /// The condition was applied somewhere it cannot resolve a candidate.
    /// Fatal: registration must abort rather than silently skip the component.
    #[error("condition misuse: {0}")]
    Condition(String),

    #[error("registry error: {0}")]
    Registry(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GateError>;
