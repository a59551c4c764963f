//! Stack frame types.

use std::borrow::Cow;

use super::symbols::{SourceLocation, SymbolName};

/// Placeholder for anything the debug info does not tell us.
const UNKNOWN: &str = "<unknown>";

/// One entry of a call stack: where we are and in which function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame
{
    /// Best-effort symbol for the frame.
    pub symbol: Option<SymbolName>,
    /// Best-effort source location.
    pub location: Option<SourceLocation>,
}

impl Frame
{
    /// Frame with all parts known.
    pub fn new(symbol: SymbolName, location: SourceLocation) -> Self
    {
        Self {
            symbol: Some(symbol),
            location: Some(location),
        }
    }

    /// Frame the debug info says nothing about.
    pub fn unknown() -> Self
    {
        Self {
            symbol: None,
            location: None,
        }
    }

    /// Function name to print, `<unknown>` without a symbol.
    pub fn function(&self) -> &str
    {
        self.symbol.as_ref().map_or(UNKNOWN, SymbolName::display_name)
    }

    /// File to print: the full path or only its basename.
    pub fn file_label(&self, full_paths: bool) -> Cow<'_, str>
    {
        match &self.location {
            Some(location) if full_paths => location.file.to_string_lossy(),
            Some(location) => location.basename().to_string_lossy(),
            None => Cow::Borrowed(UNKNOWN),
        }
    }

    /// Line number to print, `?` when unknown.
    pub fn line_label(&self) -> String
    {
        self.line().map_or_else(|| "?".to_string(), |line| line.to_string())
    }

    /// Line number, if known.
    pub fn line(&self) -> Option<u32>
    {
        self.location.as_ref().and_then(|location| location.line)
    }
}
