//! Error types for qrmatrix

use thiserror::Error;

/// Result type for qrmatrix operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a matrix run before or during execution.
///
/// Per-triple failures (encode/decode/mismatch) are never surfaced here;
/// they are recorded in each [`crate::outcome::Outcome`] instead.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// No encoders supplied to the runner
    #[error("no encoders provided")]
    NoEncoders,

    /// No decoders supplied to the runner
    #[error("no decoders provided")]
    NoDecoders,

    /// No test cases supplied to the runner
    #[error("no test cases provided")]
    NoTestCases,

    /// Configuration failed validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Run was cancelled before completion; partial results are discarded
    #[error("matrix run cancelled")]
    Cancelled,
}
