//! # Fancy Traceback
//!
//! Prints an error's traceback, or the current call stack, with the colors
//! an IPython shell uses:
//!
//! ```text
//! Fancy traceback (most recent call last):
//! File "main.rs", line 12, in app::run
//! File "math.rs", line 40, in app::math::divide
//! ----> a.checked_div(b).ok_or_else(|| TracedError::from_error(&ZeroDivisionError))
//! ZeroDivisionError: division by zero
//! ```
//!
//! ## Sources
//!
//! - [`TracedError`]: frames come from the stack captured when the error was
//!   built, followed by the source line of the deepest frame and a
//!   `Type: message` summary.
//! - a plain message: frames come from the caller's stack, followed by
//!   `Error: message`.
//! - [`TracebackSource::CallStack`]: only the caller's frames.
//!
//! At most `depth` frames are shown, the innermost ones. A depth larger than
//! the stack is fine.
//!
//! ## Example
//!
//! ```rust
//! use dbgprint_core::traceback::{print_traceback, TracedError, TracebackSource};
//!
//! fn parse(input: &str) -> Result<u32, TracedError>
//! {
//!     input.parse().map_err(|e| TracedError::from_error(&e))
//! }
//!
//! if let Err(err) = parse("forty-two") {
//!     print_traceback(&err, 3);
//! }
//! print_traceback("something looks off", 1);
//! print_traceback(TracebackSource::CallStack, 5);
//! ```

use std::any::type_name;
use std::fmt;
use std::fs;
use std::io::{self, Write};

use crate::ansi::Ansi;
use crate::config::{self, Config};
use crate::stack::CallStack;
use crate::types::{Frame, SourceLocation};

/// Shown after the arrow when the deepest frame's source cannot be read.
const SOURCE_UNAVAILABLE: &str = "<source unavailable>";

/// Optional abbreviation and description attached to an error.
///
/// Used instead of the raw message when both are present and non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDetail
{
    /// Short code, e.g. `E_TIMEOUT`.
    pub abbreviation: Option<String>,
    /// Human readable explanation.
    pub description: Option<String>,
}

impl ErrorDetail
{
    /// Detail with both fields set.
    pub fn new(abbreviation: impl Into<String>, description: impl Into<String>) -> Self
    {
        Self {
            abbreviation: Some(abbreviation.into()),
            description: Some(description.into()),
        }
    }

    /// `abbreviation: description`, only if both are non-empty.
    pub fn summary(&self) -> Option<String>
    {
        match (self.abbreviation.as_deref(), self.description.as_deref()) {
            (Some(abbreviation), Some(description)) if !abbreviation.is_empty() && !description.is_empty() => {
                Some(format!("{abbreviation}: {description}"))
            }
            _ => None,
        }
    }
}

/// An error that remembers where it was created.
///
/// The call stack is captured by the constructor; the frame of the
/// constructor itself is hidden, so the innermost frame is the code that
/// built the error.
#[derive(Debug, Clone)]
pub struct TracedError
{
    kind: Option<String>,
    message: String,
    detail: Option<ErrorDetail>,
    stack: CallStack,
}

impl TracedError
{
    /// Error of type `kind` with `message`.
    #[inline(never)]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self
    {
        Self::traced(Some(kind.into()), message.into(), 1)
    }

    /// Error without a type name. Its summary line is `: message`.
    #[inline(never)]
    pub fn untyped(message: impl Into<String>) -> Self
    {
        Self::traced(None, message.into(), 1)
    }

    /// Wrap any error, using its short type name as the kind.
    ///
    /// ```rust
    /// use dbgprint_core::traceback::TracedError;
    ///
    /// let err = "x".parse::<u8>().unwrap_err();
    /// let traced = TracedError::from_error(&err);
    /// assert_eq!(traced.kind(), Some("ParseIntError"));
    /// ```
    #[inline(never)]
    pub fn from_error<E: std::error::Error>(err: &E) -> Self
    {
        Self::traced(Some(short_type_name::<E>().to_string()), err.to_string(), 1)
    }

    #[inline(never)]
    fn traced(kind: Option<String>, message: String, skip: usize) -> Self
    {
        Self {
            kind,
            message,
            detail: None,
            // Hide `traced` plus the public constructor(s) above it.
            stack: CallStack::capture(skip + 1),
        }
    }

    /// Build from parts, with a stack that was captured elsewhere.
    pub fn with_stack(kind: Option<String>, message: impl Into<String>, stack: CallStack) -> Self
    {
        Self {
            kind,
            message: message.into(),
            detail: None,
            stack,
        }
    }

    /// Attach an abbreviation and description.
    #[must_use]
    pub fn with_detail(mut self, detail: ErrorDetail) -> Self
    {
        self.detail = Some(detail);
        self
    }

    /// Type name, if known.
    pub fn kind(&self) -> Option<&str>
    {
        self.kind.as_deref()
    }

    /// Raw message.
    pub fn message(&self) -> &str
    {
        &self.message
    }

    /// Attached detail, if any.
    pub fn detail(&self) -> Option<&ErrorDetail>
    {
        self.detail.as_ref()
    }

    /// Stack captured at construction.
    pub fn stack(&self) -> &CallStack
    {
        &self.stack
    }

    /// Text after the `Type: ` prefix of the summary line.
    pub fn summary_text(&self) -> String
    {
        self.detail
            .as_ref()
            .and_then(ErrorDetail::summary)
            .unwrap_or_else(|| self.message.clone())
    }
}

impl fmt::Display for TracedError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}: {}", self.kind().unwrap_or_default(), self.summary_text())
    }
}

impl std::error::Error for TracedError {}

/// Last path segment of a type name, ignoring generic arguments.
fn short_type_name<T: ?Sized>() -> &'static str
{
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// What to print a traceback of.
#[derive(Debug, Clone, Copy)]
pub enum TracebackSource<'a>
{
    /// An error and the stack it was created on.
    Error(&'a TracedError),
    /// A message, printed below the caller's stack as `Error: message`.
    Message(&'a str),
    /// Only the caller's stack.
    CallStack,
}

impl<'a> From<&'a TracedError> for TracebackSource<'a>
{
    fn from(err: &'a TracedError) -> Self
    {
        TracebackSource::Error(err)
    }
}

impl<'a> From<&'a str> for TracebackSource<'a>
{
    fn from(message: &'a str) -> Self
    {
        TracebackSource::Message(message)
    }
}

impl<'a> From<&'a String> for TracebackSource<'a>
{
    fn from(message: &'a String) -> Self
    {
        TracebackSource::Message(message)
    }
}

impl<'a, T> From<Option<T>> for TracebackSource<'a>
where
    T: Into<TracebackSource<'a>>,
{
    fn from(source: Option<T>) -> Self
    {
        source.map_or(TracebackSource::CallStack, Into::into)
    }
}

/// Per-call formatter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracebackOptions
{
    /// Maximum number of frames, innermost kept.
    pub depth: usize,
    /// Print full file paths. The process-wide override, when set, wins.
    pub full_paths: bool,
}

impl Default for TracebackOptions
{
    fn default() -> Self
    {
        Self::from(&Config::default())
    }
}

impl From<&Config> for TracebackOptions
{
    fn from(config: &Config) -> Self
    {
        Self {
            depth: config.traceback_depth,
            full_paths: config.full_paths,
        }
    }
}

impl TracebackOptions
{
    /// Default options with a different depth.
    pub fn with_depth(depth: usize) -> Self
    {
        Self {
            depth,
            ..Self::default()
        }
    }
}

/// Renders tracebacks with fixed options.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracebackPrinter
{
    options: TracebackOptions,
}

impl TracebackPrinter
{
    /// Printer with the given options.
    pub fn new(options: TracebackOptions) -> Self
    {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> TracebackOptions
    {
        self.options
    }

    /// Print to stdout. Stack-based sources use the caller's stack.
    #[inline(never)]
    pub fn print<'a>(&self, source: impl Into<TracebackSource<'a>>)
    {
        let here = CallStack::capture(1);
        self.emit(source.into(), &here);
    }

    /// Render to a string. Stack-based sources use the caller's stack.
    #[inline(never)]
    pub fn render<'a>(&self, source: impl Into<TracebackSource<'a>>) -> String
    {
        let here = CallStack::capture(1);
        self.render_with(source.into(), &here)
    }

    /// Write to `out`. Stack-based sources use the caller's stack.
    ///
    /// ## Errors
    ///
    /// Returns any error raised by `out`.
    #[inline(never)]
    pub fn write_to<'a, W: Write>(&self, out: &mut W, source: impl Into<TracebackSource<'a>>) -> io::Result<()>
    {
        let here = CallStack::capture(1);
        self.write_with(out, source.into(), &here)
    }

    /// Render `source`, taking stack-based frames from `here`.
    pub fn render_with(&self, source: TracebackSource<'_>, here: &CallStack) -> String
    {
        let mut buf = Vec::new();
        if let Err(e) = self.write_with(&mut buf, source, here) {
            tracing::warn!(error = %e, "failed to render traceback");
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Write `source` to `out`, taking stack-based frames from `here`.
    ///
    /// ## Errors
    ///
    /// Returns any error raised by `out`.
    pub fn write_with<W: Write>(&self, out: &mut W, source: TracebackSource<'_>, here: &CallStack) -> io::Result<()>
    {
        let full_paths = config::resolve_full_paths(self.options.full_paths);
        let stack = match source {
            TracebackSource::Error(err) => err.stack(),
            TracebackSource::Message(_) | TracebackSource::CallStack => here,
        };
        let frames = stack.last(self.options.depth);
        tracing::trace!(depth = self.options.depth, shown = frames.len(), full_paths, "writing traceback");

        writeln!(
            out,
            "\n{}Fancy traceback {}(most recent call last){}:",
            Ansi::White,
            Ansi::Cyan,
            Ansi::White
        )?;
        for frame in frames {
            write_frame(out, frame, full_paths)?;
        }

        match source {
            TracebackSource::Error(err) => {
                if let Some(deepest) = frames.last() {
                    let line = deepest
                        .location
                        .as_ref()
                        .and_then(source_line)
                        .unwrap_or_else(|| SOURCE_UNAVAILABLE.to_string());
                    writeln!(out, "----> {line}")?;
                }
                writeln!(
                    out,
                    "{}{}: {}{}",
                    Ansi::Red,
                    err.kind().unwrap_or_default(),
                    Ansi::White,
                    err.summary_text()
                )?;
            }
            TracebackSource::Message(message) => {
                writeln!(out, "{}Error: {}{message}", Ansi::Red, Ansi::White)?;
            }
            TracebackSource::CallStack => {}
        }
        Ok(())
    }

    fn emit(&self, source: TracebackSource<'_>, here: &CallStack)
    {
        let text = self.render_with(source, here);
        let mut stdout = io::stdout().lock();
        let result = stdout.write_all(text.as_bytes()).and_then(|()| stdout.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write traceback to stdout");
        }
    }
}

fn write_frame<W: Write>(out: &mut W, frame: &Frame, full_paths: bool) -> io::Result<()>
{
    writeln!(
        out,
        "{cyan}File {green}\"{file}\"{cyan}, line {green}{line}{cyan}, in {purple}{function}{white}",
        cyan = Ansi::Cyan,
        green = Ansi::Green,
        purple = Ansi::Purple,
        white = Ansi::White,
        file = frame.file_label(full_paths),
        line = frame.line_label(),
        function = frame.function(),
    )
}

/// The trimmed text of the location's line, if the file can be read.
pub fn source_line(location: &SourceLocation) -> Option<String>
{
    let line = usize::try_from(location.line?).ok()?.checked_sub(1)?;
    let text = fs::read_to_string(&location.file).ok()?;
    text.lines().nth(line).map(|l| l.trim().to_string())
}

/// Print a traceback of `source` to stdout, showing at most `depth` frames.
///
/// File names are basenames unless the process-wide override says
/// otherwise. Stack-based sources use the caller's stack.
#[inline(never)]
pub fn print_traceback<'a>(source: impl Into<TracebackSource<'a>>, depth: usize)
{
    let here = CallStack::capture(1);
    TracebackPrinter::new(TracebackOptions::with_depth(depth)).emit(source.into(), &here);
}

/// Render a traceback of `source` to a string.
///
/// Stack-based sources use the caller's stack.
#[inline(never)]
pub fn format_traceback<'a>(source: impl Into<TracebackSource<'a>>, options: TracebackOptions) -> String
{
    let here = CallStack::capture(1);
    TracebackPrinter::new(options).render_with(source.into(), &here)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::types::SymbolName;

    fn stack() -> CallStack
    {
        let frame = |function: &str, file: &str, line| {
            Frame::new(
                SymbolName::plain(function),
                SourceLocation::new(file, line),
            )
        };
        CallStack::from_frames(vec![
            frame("app::main", "/work/app/src/main.rs", 4),
            frame("app::run", "/work/app/src/run.rs", 10),
            frame("app::divide", "/work/app/src/math.rs", 22),
        ])
    }

    fn lines(text: &str) -> Vec<&str>
    {
        text.split('\n').collect()
    }

    #[test]
    fn test_detail_summary_requires_both_fields()
    {
        assert_eq!(ErrorDetail::new("E1", "bad").summary().as_deref(), Some("E1: bad"));
        assert_eq!(ErrorDetail::new("", "bad").summary(), None);
        let partial = ErrorDetail {
            abbreviation: Some("E1".to_string()),
            description: None,
        };
        assert_eq!(partial.summary(), None);
    }

    #[test]
    fn test_short_type_name()
    {
        assert_eq!(short_type_name::<std::num::ParseIntError>(), "ParseIntError");
        assert_eq!(short_type_name::<Vec<std::string::String>>(), "Vec");
        assert_eq!(short_type_name::<u8>(), "u8");
    }

    #[test]
    fn test_error_layout()
    {
        let err = TracedError::with_stack(Some("ValueError".to_string()), "boom", stack());
        let text = TracebackPrinter::new(TracebackOptions::with_depth(2)).render_with((&err).into(), &stack());
        let lines = lines(&text);

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "\x1b[1;37mFancy traceback \x1b[1;36m(most recent call last)\x1b[1;37m:");
        assert_eq!(
            lines[2],
            "\x1b[1;36mFile \x1b[1;32m\"run.rs\"\x1b[1;36m, line \x1b[1;32m10\x1b[1;36m, in \x1b[1;35mapp::run\x1b[1;37m"
        );
        assert!(lines[3].contains("\"math.rs\"") && lines[3].contains("app::divide"));
        assert_eq!(lines[4], "----> <source unavailable>");
        assert_eq!(lines[5], "\x1b[1;31mValueError: \x1b[1;37mboom");
        assert_eq!(lines[6], "");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_missing_kind_keeps_colon()
    {
        let err = TracedError::with_stack(None, "boom", stack());
        let text = TracebackPrinter::default().render_with((&err).into(), &stack());
        assert_eq!(lines(&text).iter().rev().nth(1), Some(&"\x1b[1;31m: \x1b[1;37mboom"));
    }

    #[test]
    fn test_message_uses_here()
    {
        let text = TracebackPrinter::new(TracebackOptions::with_depth(1)).render_with("oops".into(), &stack());
        let lines = lines(&text);
        assert_eq!(lines.len(), 5);
        assert!(lines[2].contains("app::divide"));
        assert_eq!(lines[3], "\x1b[1;31mError: \x1b[1;37moops");
    }

    #[test]
    fn test_call_stack_has_no_summary()
    {
        let text = TracebackPrinter::new(TracebackOptions::with_depth(10)).render_with(TracebackSource::CallStack, &stack());
        let lines = lines(&text);
        assert_eq!(lines.len(), 6);
        assert!(lines[2].contains("app::main"));
        assert!(lines[4].contains("app::divide"));
        assert_eq!(lines[5], "");
    }

    #[test]
    fn test_depth_zero_skips_arrow()
    {
        let err = TracedError::with_stack(Some("E".to_string()), "m", stack());
        let text = TracebackPrinter::new(TracebackOptions::with_depth(0)).render_with((&err).into(), &stack());
        assert!(!text.contains("---->"));
        assert!(text.ends_with("\x1b[1;31mE: \x1b[1;37mm\n"));
    }

    #[test]
    fn test_option_source()
    {
        assert!(matches!(TracebackSource::from(None::<&str>), TracebackSource::CallStack));
        assert!(matches!(TracebackSource::from(Some("x")), TracebackSource::Message("x")));
    }

    #[test]
    fn test_display()
    {
        let err = TracedError::with_stack(Some("KeyError".to_string()), "missing", CallStack::from_frames(Vec::new()));
        assert_eq!(err.to_string(), "KeyError: missing");
        let err = err.with_detail(ErrorDetail::new("K1", "key not present"));
        assert_eq!(err.to_string(), "KeyError: K1: key not present");
    }
}
