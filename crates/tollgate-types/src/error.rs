//! error types for tollgate-types.

use thiserror::Error;

/// errors produced while parsing or validating core types.
#[derive(Debug, Error)]
pub enum Error {
    /// actor string is not of the form `Type:id`.
    #[error("invalid actor '{0}': expected TYPE:ID")]
    InvalidActor(String),

    /// action string is not a number or comma-separated list of numbers.
    #[error("invalid action '{0}': expected an integer or a comma-separated list of integers")]
    InvalidAction(String),

    /// a single action id was required but several were supplied.
    #[error("expected a single action id, got {0}")]
    NotSingleAction(crate::Actions),
}
