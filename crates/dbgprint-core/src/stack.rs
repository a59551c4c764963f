//! # Call Stack Capture
//!
//! Snapshot of the current thread's call stack, resolved to [`Frame`]s on
//! first use.
//!
//! Capturing is cheap: only instruction pointers are recorded. Symbol and
//! line lookups happen once, the first time [`CallStack::frames`] is called,
//! and the result is cached.
//!
//! ## Hiding our own frames
//!
//! A capture always starts at the caller of [`CallStack::capture`]. The
//! `skip` argument hides that many further frames, so helpers that capture on
//! behalf of their own caller pass `1` and do not show up in the output:
//!
//! ```rust
//! use dbgprint_core::stack::CallStack;
//!
//! #[inline(never)]
//! fn where_am_i() -> CallStack
//! {
//!     // Hide `where_am_i` itself.
//!     CallStack::capture(1)
//! }
//!
//! let stack = where_am_i();
//! let _innermost_two = stack.last(2);
//! ```

use backtrace::{Backtrace, BacktraceFrame, BacktraceSymbol};
use once_cell::sync::OnceCell;

use crate::symbols::{is_unwinder_frame, make_symbol_name};
use crate::types::{Frame, SourceLocation};

/// An unresolved call stack plus its lazily resolved frames.
#[derive(Debug, Clone)]
pub struct CallStack
{
    raw: Backtrace,
    skip: usize,
    frames: OnceCell<Vec<Frame>>,
}

impl CallStack
{
    /// Record the current call stack, hiding `skip` frames above the caller.
    #[inline(never)]
    pub fn capture(skip: usize) -> Self
    {
        Self {
            raw: Backtrace::new_unresolved(),
            skip,
            frames: OnceCell::new(),
        }
    }

    /// Build a stack from frames that are already known, oldest first.
    pub fn from_frames(frames: Vec<Frame>) -> Self
    {
        Self {
            raw: Backtrace::from(Vec::<BacktraceFrame>::new()),
            skip: 0,
            frames: OnceCell::with_value(frames),
        }
    }

    /// All frames, oldest (outermost) first.
    pub fn frames(&self) -> &[Frame]
    {
        self.frames.get_or_init(|| self.resolve())
    }

    /// The `depth` innermost frames, still oldest first.
    ///
    /// Asking for more frames than exist returns all of them.
    pub fn last(&self, depth: usize) -> &[Frame]
    {
        let frames = self.frames();
        &frames[frames.len().saturating_sub(depth)..]
    }

    /// Innermost frame, where the capture happened.
    pub fn innermost(&self) -> Option<&Frame>
    {
        self.frames().last()
    }

    fn resolve(&self) -> Vec<Frame>
    {
        let mut raw = self.raw.clone();
        raw.resolve();
        let raw_frames = raw.frames();

        let anchor: fn(usize) -> CallStack = CallStack::capture;
        let anchor = anchor as usize;
        let start = if let Some(index) = raw_frames
            .iter()
            .position(|frame| frame.symbol_address() as usize == anchor)
        {
            index + 1 + self.skip
        } else {
            // No exact match (e.g. identical code folding): fall back to names.
            tracing::trace!("capture anchor not found, skipping unwinder frames by name");
            let unwinder = raw_frames.iter().take_while(|frame| belongs_to_unwinder(frame)).count();
            unwinder + 1 + self.skip
        };

        let mut frames: Vec<Frame> = raw_frames.iter().skip(start).flat_map(convert_frame).collect();
        frames.reverse();

        tracing::debug!(
            captured = raw_frames.len(),
            hidden = start.min(raw_frames.len()),
            resolved = frames.len(),
            "resolved call stack"
        );
        frames
    }
}

fn belongs_to_unwinder(frame: &BacktraceFrame) -> bool
{
    let symbols = frame.symbols();
    !symbols.is_empty()
        && symbols
            .iter()
            .all(|symbol| symbol.name().is_some_and(|name| is_unwinder_frame(&format!("{name:#}"))))
}

/// One physical frame becomes one [`Frame`] per symbol. Inlined callees come
/// first, innermost first, the physical function last.
fn convert_frame(frame: &BacktraceFrame) -> Vec<Frame>
{
    let symbols = frame.symbols();
    if symbols.is_empty() {
        return vec![Frame::unknown()];
    }
    symbols.iter().map(convert_symbol).collect()
}

fn convert_symbol(symbol: &BacktraceSymbol) -> Frame
{
    let name = symbol.name().map(|name| match name.as_str() {
        Some(raw) => make_symbol_name(raw),
        None => make_symbol_name(&name.to_string()),
    });
    let location = symbol.filename().map(|file| SourceLocation {
        file: file.to_path_buf(),
        line: symbol.lineno(),
        column: symbol.colno(),
    });

    Frame {
        symbol: name,
        location,
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::types::SymbolName;

    fn frame(function: &str, line: u32) -> Frame
    {
        Frame::new(
            SymbolName::plain(function),
            SourceLocation::new("/src/main.rs", line),
        )
    }

    #[test]
    fn test_last_truncates_from_the_front()
    {
        let stack = CallStack::from_frames(vec![frame("a", 1), frame("b", 2), frame("c", 3)]);
        let last: Vec<&str> = stack.last(2).iter().map(Frame::function).collect();
        assert_eq!(last, ["b", "c"]);
    }

    #[test]
    fn test_last_with_depth_beyond_stack()
    {
        let stack = CallStack::from_frames(vec![frame("a", 1), frame("b", 2)]);
        assert_eq!(stack.last(50).len(), 2);
        assert_eq!(stack.last(0).len(), 0);
    }

    #[test]
    fn test_innermost()
    {
        let stack = CallStack::from_frames(vec![frame("outer", 1), frame("inner", 2)]);
        assert_eq!(stack.innermost().map(Frame::function), Some("inner"));
        assert!(CallStack::from_frames(Vec::new()).innermost().is_none());
    }

    #[test]
    fn test_capture_never_fails()
    {
        let stack = CallStack::capture(0);
        // Symbols may be missing in stripped builds, but asking is fine.
        let _ = stack.frames();
        let _ = stack.last(1000);
    }
}
