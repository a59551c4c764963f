//! Platform-agnostic frame types.

mod stack;
mod symbols;

pub use stack::Frame;
pub use symbols::{SourceLocation, SymbolName};
