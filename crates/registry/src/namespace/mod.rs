//! Namespaces: named scopes of symbol bindings.
//!
//! # Purpose
//!
//! A [`Namespace`] maps unqualified symbols to vars, imported types, or opaque values, and
//! declares which other namespaces it can see into (refers) and by which short names
//! (aliases). Symbol resolution for the evaluator goes through [`Namespace::get_mapping`].
//!
//! # Key types
//!
//! | Type | Meaning | Constraints | Constructed / mutated in |
//! |---|---|---|---|
//! | [`Namespace`] | Named scope with three tables | Keys are never qualified | [`crate::NamespaceRegistry::find_or_create`] |
//! | [`Mapping`] | Value of a mapping entry | Compared by identity | [`Namespace::intern`], [`Namespace::reference`] |
//! | [`FilterSpec`] | Normalized refer filter | Immutable once installed | [`Namespace::refer_ns`] |
//!
//! # Invariants
//!
//! - Every namespace but core refers core, unfiltered, from construction on.
//!   - Enforced in: [`Namespace::new`].
//! - A user binding owned by another namespace is never silently shadowed.
//!   - Enforced in: the shadowing policy of [`Namespace::intern`] and [`Namespace::reference`].
//! - Core-owned vars and untouched default imports may be shadowed, with a warning.
//! - Aliases are write-once per name.
//!   - Enforced in: [`Namespace::add_alias`].
//! - A failed mutator leaves all three tables untouched.
//!
//! # Concurrency & ordering
//!
//! - Each table is an independent [`NameTable`]; there is no atomicity across tables.
//! - Lookups never block and never take locks.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ptr;
use std::sync::{Arc, Weak};

use lexis_primitives::{Class, Symbol};

use crate::error::{NamespaceError, Result};
use crate::registry::Environment;
use crate::table::{FxIndexMap, NameTable};
use crate::var::Var;

mod alias;
mod intern;
mod mapping;
mod refer;
mod resolve;

pub use mapping::Mapping;
pub use refer::{FilterSpec, Refer, ReferFilters, ReferSelection};

/// A named scope owning symbol mappings, aliases, and refer declarations.
///
/// Namespaces compare by identity.
pub struct Namespace {
	name: Symbol,
	this: Weak<Namespace>,
	core: Weak<Namespace>,
	env: Arc<Environment>,
	mappings: NameTable<Symbol, Mapping>,
	aliases: NameTable<Symbol, Arc<Namespace>>,
	refers: NameTable<Arc<Namespace>, Arc<FilterSpec>>,
}

impl Namespace {
	/// Builds a namespace seeded with the environment's default imports.
	///
	/// `core` is `None` only when building the core namespace itself; every other namespace
	/// starts out referring core without filters.
	pub(crate) fn new(name: Symbol, env: Arc<Environment>, core: Option<&Arc<Namespace>>) -> Arc<Self> {
		Arc::new_cyclic(|this| {
			let refers = NameTable::new();
			let core = match core {
				Some(core) => {
					refers.insert(core.clone(), Arc::new(FilterSpec::unfiltered()));
					Arc::downgrade(core)
				}
				None => this.clone(),
			};
			Self {
				name,
				this: this.clone(),
				core,
				mappings: NameTable::from_snapshot(env.default_imports.clone()),
				aliases: NameTable::new(),
				refers,
				env,
			}
		})
	}

	#[inline]
	pub fn name(&self) -> &Symbol {
		&self.name
	}

	pub fn is_core(&self) -> bool {
		Weak::ptr_eq(&self.this, &self.core)
	}

	pub(crate) fn downgrade(&self) -> Weak<Namespace> {
		self.this.clone()
	}

	/// Current mapping table.
	pub fn mappings(&self) -> Arc<FxIndexMap<Symbol, Mapping>> {
		self.mappings.snapshot()
	}

	/// Current alias table.
	pub fn aliases(&self) -> Arc<FxIndexMap<Symbol, Arc<Namespace>>> {
		self.aliases.snapshot()
	}

	/// Current refer table, in declaration order.
	pub fn refers(&self) -> Arc<FxIndexMap<Arc<Namespace>, Arc<FilterSpec>>> {
		self.refers.snapshot()
	}

	/// Vars interned by this namespace.
	pub fn interns(&self) -> Vec<(Symbol, Arc<Var>)> {
		self.mappings
			.snapshot()
			.iter()
			.filter_map(|(sym, m)| match m {
				Mapping::Var(var) if var.is_owned_by(self) => Some((sym.clone(), var.clone())),
				_ => None,
			})
			.collect()
	}

	/// Vars mapped here but owned by other namespaces.
	pub fn referred_vars(&self) -> Vec<(Symbol, Arc<Var>)> {
		self.mappings
			.snapshot()
			.iter()
			.filter_map(|(sym, m)| match m {
				Mapping::Var(var) if !var.is_owned_by(self) => Some((sym.clone(), var.clone())),
				_ => None,
			})
			.collect()
	}

	/// Imported types, default imports included.
	pub fn imports(&self) -> Vec<(Symbol, Arc<Class>)> {
		self.mappings
			.snapshot()
			.iter()
			.filter_map(|(sym, m)| m.as_class().map(|c| (sym.clone(), c.clone())))
			.collect()
	}

	fn require_unqualified(&self, sym: &Symbol, op: &'static str) -> Result<()> {
		if sym.is_qualified() {
			return Err(NamespaceError::QualifiedSymbol {
				op,
				symbol: sym.clone(),
			});
		}
		Ok(())
	}
}

impl PartialEq for Namespace {
	fn eq(&self, other: &Self) -> bool {
		ptr::eq(self, other)
	}
}

impl Eq for Namespace {}

impl Hash for Namespace {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.name.hash(state);
	}
}

impl fmt::Display for Namespace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.name, f)
	}
}

impl fmt::Debug for Namespace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Namespace")
			.field("name", &self.name)
			.field("mappings", &self.mappings.len())
			.field("aliases", &self.aliases.len())
			.field("refers", &self.refers.len())
			.finish()
	}
}
