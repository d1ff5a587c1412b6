//! Lock-free namespace registry for a dynamic language runtime.
//!
//! Maps unqualified symbols to vars and imported types within named namespaces, and resolves
//! names across namespaces through aliases and filtered refers.
//!
//! # Mental model
//!
//! - A [`NamespaceRegistry`] owns every [`Namespace`] of one runtime, keyed by name. It is an
//!   ordinary value: create one at startup and hand it to whoever needs it.
//! - Each namespace holds three [`table::NameTable`]s (mappings, aliases, refers). Every table
//!   publishes immutable maps through a CAS retry loop, so readers never block and writers never
//!   lock.
//! - [`Namespace::get_mapping`] is the hot path: local lookup, then the lazy [`VarLoader`], then
//!   a search through referred namespaces whose hits are cached locally.
//!
//! # Errors
//!
//! Mutators return [`NamespaceError`], whose [`ErrorKind`] is one of invalid argument, binding
//! conflict, alias conflict, or protected namespace. Shadowing a core var or a default import is
//! not an error; it emits a `tracing` warning.

pub mod config;
mod error;
pub mod namespace;
mod registry;
pub mod table;
mod var;
pub mod wire;

pub use config::{ConfigError, RegistryConfig};
pub use error::{ErrorKind, NamespaceError, Result};
pub use lexis_primitives::{Class, Symbol, Value};
pub use namespace::{FilterSpec, Mapping, Namespace, Refer, ReferFilters, ReferSelection};
pub use registry::NamespaceRegistry;
pub use var::{Var, VarLoader};
