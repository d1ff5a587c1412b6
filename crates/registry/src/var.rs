use std::fmt;
use std::ptr;
use std::sync::{Arc, Weak};

use arc_swap::ArcSwapOption;
use lexis_primitives::{Symbol, Value};

use crate::namespace::Namespace;

/// A named binding cell, permanently owned by the namespace that interned it.
///
/// Vars are compared by identity. The owner link is weak so that a namespace and the vars in
/// its own mappings do not keep each other alive; the owner's name is kept alongside it.
pub struct Var {
	ns: Weak<Namespace>,
	ns_name: Symbol,
	sym: Symbol,
	root: ArcSwapOption<Value>,
}

impl Var {
	pub(crate) fn new(ns: &Namespace, sym: Symbol) -> Arc<Self> {
		Arc::new(Self {
			ns: ns.downgrade(),
			ns_name: ns.name().clone(),
			sym,
			root: ArcSwapOption::empty(),
		})
	}

	/// The owning namespace, if it is still alive.
	pub fn namespace(&self) -> Option<Arc<Namespace>> {
		self.ns.upgrade()
	}

	#[inline]
	pub fn namespace_name(&self) -> &Symbol {
		&self.ns_name
	}

	/// The unqualified name this var was interned under.
	#[inline]
	pub fn symbol(&self) -> &Symbol {
		&self.sym
	}

	/// `owner/name`.
	pub fn qualified_symbol(&self) -> Symbol {
		Symbol::qualified(self.ns_name.name(), self.sym.name())
	}

	/// Returns true if `ns` created this var.
	#[inline]
	pub fn is_owned_by(&self, ns: &Namespace) -> bool {
		ptr::eq(self.ns.as_ptr(), ns)
	}

	#[inline]
	pub(crate) fn is_owned_by_weak(&self, ns: &Weak<Namespace>) -> bool {
		Weak::ptr_eq(&self.ns, ns)
	}

	pub fn bind_root(&self, value: Value) {
		self.root.store(Some(Arc::new(value)));
	}

	pub fn unbind_root(&self) {
		self.root.store(None);
	}

	pub fn root(&self) -> Option<Value> {
		self.root.load_full().map(|v| (*v).clone())
	}

	pub fn is_bound(&self) -> bool {
		self.root.load().is_some()
	}
}

impl fmt::Display for Var {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#'{}/{}", self.ns_name, self.sym)
	}
}

impl fmt::Debug for Var {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Var")
			.field("ns", &self.ns_name)
			.field("sym", &self.sym)
			.field("bound", &self.is_bound())
			.finish()
	}
}

/// Materializes vars that have no in-memory binding yet, e.g. from precompiled artifacts.
///
/// Consulted by [`Namespace::get_mapping`] after a local miss and before the refer search, and
/// by [`Namespace::find_interned_var`]. A loader that produces a var normally interns it into
/// `ns` so later lookups hit the mapping table directly.
pub trait VarLoader: Send + Sync {
	fn load(&self, ns: &Namespace, sym: &Symbol) -> Option<Arc<Var>>;
}

impl<F> VarLoader for F
where
	F: Fn(&Namespace, &Symbol) -> Option<Arc<Var>> + Send + Sync,
{
	fn load(&self, ns: &Namespace, sym: &Symbol) -> Option<Arc<Var>> {
		self(ns, sym)
	}
}
