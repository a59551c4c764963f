//! Symbol and source location types.

use std::fmt;
use std::path::{Path, PathBuf};

/// A function name with demangling metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolName
{
    raw: String,
    demangled: Option<String>,
}

impl SymbolName
{
    /// Construct from a raw linkage name.
    pub fn new(raw: String, demangled: Option<String>) -> Self
    {
        Self { raw, demangled }
    }

    /// Name that needs no demangling.
    pub fn plain(name: impl Into<String>) -> Self
    {
        Self::new(name.into(), None)
    }

    /// Raw (mangled) name emitted in the object file.
    pub fn raw(&self) -> &str
    {
        &self.raw
    }

    /// Demangled name without the trailing hash, if demangling succeeded.
    pub fn demangled(&self) -> Option<&str>
    {
        self.demangled.as_deref()
    }

    /// Preferred presentation (demangled fallback to raw).
    pub fn display_name(&self) -> &str
    {
        self.demangled.as_deref().unwrap_or(&self.raw)
    }
}

impl fmt::Display for SymbolName
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.display_name())
    }
}

/// Source code location of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation
{
    /// Path as recorded in the debug info, usually absolute.
    pub file: PathBuf,
    /// Line number, if known.
    pub line: Option<u32>,
    /// Column number, if known.
    pub column: Option<u32>,
}

impl SourceLocation
{
    /// Location with a known line.
    pub fn new(file: impl Into<PathBuf>, line: u32) -> Self
    {
        Self {
            file: file.into(),
            line: Some(line),
            column: None,
        }
    }

    /// Helper to build a location when only a file is known.
    pub fn from_file(file: impl Into<PathBuf>) -> Self
    {
        Self {
            file: file.into(),
            line: None,
            column: None,
        }
    }

    /// Last path component, or the whole path when it has none.
    pub fn basename(&self) -> &Path
    {
        self.file.file_name().map_or(self.file.as_path(), Path::new)
    }
}
