//! Leaf types for the namespace registry: symbols, imported types, and opaque values.

/// Imported type handles with per-load identity.
pub mod class;
/// Optionally qualified identifiers.
pub mod symbol;
/// Type-erased payloads.
pub mod value;

pub use class::Class;
pub use symbol::Symbol;
pub use value::Value;
