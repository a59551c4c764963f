//! Symbol demangling utilities.
//!
//! Turns the raw linkage names found by the unwinder into the readable
//! function names printed in a traceback.
//!
//! ## Symbol Mangling
//!
//! - **Rust**: legacy (`_ZN...E` with a trailing `h<hash>`) or v0 (`_R...`)
//! - **C++**: Itanium ABI mangling (`_Z...`), left as is
//! - **C**: unmangled
//!
//! Rust names are printed without their hash suffix, the way `{:#}`
//! formats a `rustc_demangle::Demangle`.

use rustc_demangle::try_demangle;

use crate::types::SymbolName;

/// Path prefixes of frames that belong to the unwinder, never to the caller.
const UNWINDER_PREFIXES: &[&str] = &["backtrace::", "<backtrace::"];

/// Create a `SymbolName` from a raw mangled symbol string.
pub(crate) fn make_symbol_name(raw: &str) -> SymbolName
{
    let demangled = try_demangle(raw).ok().map(|d| format!("{d:#}"));
    SymbolName::new(raw.to_string(), demangled)
}

/// Check whether a demangled name belongs to the stack walker itself.
pub(crate) fn is_unwinder_frame(name: &str) -> bool
{
    UNWINDER_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}
