//! # Synchronized Printer
//!
//! Line-atomic printing for programs where several threads share one
//! terminal.
//!
//! Every call builds the complete line first, newline included, then takes
//! the printer's mutex and runs flush, write, flush. The trailing newline is
//! part of the single write so a concurrent writer can never slip its output
//! between a message and its line break:
//!
//! ```text
//! Output line of thread 1Output line of thread 2     <- what we avoid
//!
//! Output line of thread 1                            <- what we get
//! Output line of thread 2
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use dbgprint_core::{dprint, tprint, Ansi};
//!
//! dprint("plain line", None);
//! dprint("in red", Some(Ansi::Red));
//! tprint("with a timestamp", Some(Ansi::Cyan));
//! ```
//!
//! [`SyncPrinter`] exposes the same contract over any [`Write`] so output
//! can be captured.

use std::io::{self, Stdout, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use once_cell::sync::Lazy;

use crate::ansi::Ansi;
use crate::error::PrintResult;

static CLOCK_ORIGIN: Lazy<Instant> = Lazy::new(Instant::now);

static STDOUT_PRINTER: Lazy<SyncPrinter<Stdout>> = Lazy::new(|| SyncPrinter::new(io::stdout()));

/// Seconds elapsed on a monotonic clock, with sub-microsecond resolution.
///
/// The reference point is the first call into this module, so only
/// differences between values are meaningful.
pub fn perf_counter() -> f64
{
    CLOCK_ORIGIN.elapsed().as_secs_f64()
}

/// Build one output line: `message` wrapped in `color` and [`Ansi::RESET`]
/// when a color is given, always terminated by a single `\n`.
pub fn format_line(message: &str, color: Option<Ansi>) -> String
{
    match color {
        None => format!("{message}\n"),
        Some(color) => format!("{color}{message}{}\n", Ansi::RESET),
    }
}

/// Prefix `message` with a [`perf_counter`] value at four decimals.
pub fn timestamped(message: &str) -> String
{
    format!("{:.4} {message}", perf_counter())
}

/// Writer guarded by a mutex, writing whole lines only.
#[derive(Debug)]
pub struct SyncPrinter<W: Write>
{
    out: Mutex<W>,
}

impl<W: Write> SyncPrinter<W>
{
    /// Wrap a writer.
    pub fn new(out: W) -> Self
    {
        // Pin the clock origin no later than the first printer.
        Lazy::force(&CLOCK_ORIGIN);
        Self { out: Mutex::new(out) }
    }

    /// Print one line, see [`format_line`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the writer fails to flush or write. The lock is
    /// released either way.
    pub fn print(&self, message: &str, color: Option<Ansi>) -> PrintResult<()>
    {
        let line = format_line(message, color);

        // A panic in another printing thread must not silence this one.
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        out.flush()?;
        out.write_all(line.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Same as [`SyncPrinter::print`] with a [`perf_counter`] prefix.
    ///
    /// ## Errors
    ///
    /// Same as [`SyncPrinter::print`].
    pub fn tprint(&self, message: &str, color: Option<Ansi>) -> PrintResult<()>
    {
        self.print(&timestamped(message), color)
    }

    /// Run `f` with the writer while holding the lock.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R
    {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut out)
    }

    /// Give the writer back.
    pub fn into_inner(self) -> W
    {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The process-wide stdout printer behind [`dprint`] and [`tprint`].
pub fn stdout_printer() -> &'static SyncPrinter<Stdout>
{
    &STDOUT_PRINTER
}

/// 'Debug' print a single line to stdout with an optional color.
///
/// Never fails: a broken stdout is reported through `tracing` and the line
/// is dropped.
pub fn dprint(message: &str, color: Option<Ansi>)
{
    if let Err(e) = STDOUT_PRINTER.print(message, color) {
        tracing::warn!(error = %e, "dprint: failed to write to stdout");
    }
}

/// Same as [`dprint`], prefixed with a [`perf_counter`] timestamp.
pub fn tprint(message: &str, color: Option<Ansi>)
{
    if let Err(e) = STDOUT_PRINTER.tprint(message, color) {
        tracing::warn!(error = %e, "tprint: failed to write to stdout");
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_format_line_plain()
    {
        assert_eq!(format_line("No color", None), "No color\n");
    }

    #[test]
    fn test_format_line_colored()
    {
        assert_eq!(format_line("In red", Some(Ansi::Red)), "\x1b[1;31mIn red\x1b[1;37m\n");
    }

    #[test]
    fn test_format_line_none_color_still_resets()
    {
        assert_eq!(format_line("x", Some(Ansi::None)), "x\x1b[1;37m\n");
    }

    #[test]
    fn test_timestamped_has_four_decimals()
    {
        let line = timestamped("msg");
        let (stamp, rest) = line.split_once(' ').unwrap();
        assert_eq!(rest, "msg");
        let (_, decimals) = stamp.split_once('.').unwrap();
        assert_eq!(decimals.len(), 4);
        assert!(stamp.parse::<f64>().is_ok());
    }

    #[test]
    fn test_perf_counter_is_monotonic()
    {
        let a = perf_counter();
        let b = perf_counter();
        assert!(b >= a);
    }
}
