//! # Error Types
//!
//! Failures of the utility itself. These are rare: the stdout helpers
//! swallow them, only the writer-generic API reports them.
//!
//! The errors a caller wants rendered as a traceback are a different thing,
//! see [`crate::traceback::TracedError`].

use thiserror::Error;

/// Error raised while writing a line.
#[derive(Error, Debug)]
pub enum PrintError
{
    /// The underlying writer failed to write or flush.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error raised while reading configuration from the environment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError
{
    /// An environment variable holds a value that does not parse.
    ///
    /// Depth must be a non-negative integer; booleans accept
    /// `1/0`, `true/false`, `yes/no`, `on/off`.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue
    {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },
}

/// Convenience type alias for `Result<T, PrintError>`
///
/// ```rust
/// use dbgprint_core::error::PrintResult;
/// fn foo() -> PrintResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type PrintResult<T> = std::result::Result<T, PrintError>;
