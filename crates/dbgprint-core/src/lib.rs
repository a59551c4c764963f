//! # dbgprint-core
//!
//! Debug printing for multithreaded programs.
//!
//! This crate provides:
//! - [`dprint`]: print one line to stdout, optionally colored, without ever
//!   interleaving with lines printed by other threads
//! - [`tprint`]: the same, prefixed with a high-resolution timestamp
//! - [`print_traceback`]: an IPython-style colored traceback of a
//!   [`TracedError`], a message, or the current call stack
//!
//! ## Quick Start
//!
//! ```rust
//! use dbgprint_core::{dprint, print_traceback, tprint, Ansi, TracedError};
//!
//! dprint("worker started", Some(Ansi::Green));
//! tprint("tick", None);
//!
//! let err = TracedError::new("ZeroDivisionError", "division by zero");
//! print_traceback(&err, 3);
//! ```

pub mod ansi;
pub mod config;
pub mod error;
pub mod printer;
pub mod stack;
mod symbols;
pub mod traceback;
pub mod types;

// Re-export commonly used items
pub use ansi::Ansi;
pub use config::{set_full_paths_override, Config};
pub use error::{ConfigError, PrintError, PrintResult};
pub use printer::{dprint, tprint, SyncPrinter};
pub use traceback::{print_traceback, ErrorDetail, TracebackOptions, TracebackPrinter, TracebackSource, TracedError};
