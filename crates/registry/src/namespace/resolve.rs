//! Symbol resolution: local mappings, the lazy loader, then the refer graph.

use std::sync::Arc;

use lexis_primitives::Symbol;
use smallvec::SmallVec;

use super::{Mapping, Namespace};
use crate::var::Var;

/// `(namespace, symbol)` lookups on the current refer-search path. A rename can send the search
/// back into a namespace under another name, so the symbol is part of the key. Addresses are
/// only compared, never dereferenced.
type SearchPath = SmallVec<[(*const Namespace, Symbol); 8]>;

impl Namespace {
	/// Resolves `sym` as seen from this namespace.
	///
	/// Tries, in order: this namespace's own mappings, the registry's lazy loader, and the
	/// refer declarations. A var found through a refer is cached in this namespace's mappings.
	/// Returns `None` when nothing resolves.
	pub fn get_mapping(&self, sym: &Symbol) -> Option<Mapping> {
		let mut path = SearchPath::new();
		self.resolve(sym, &mut path)
	}

	/// Resolves `sym` to a var interned by this namespace itself.
	///
	/// Vars only visible through refers do not count. Falls back to the lazy loader.
	pub fn find_interned_var(&self, sym: &Symbol) -> Option<Arc<Var>> {
		if let Some(Mapping::Var(var)) = self.get_mapping(sym)
			&& var.is_owned_by(self)
		{
			return Some(var);
		}
		self.load(sym)
	}

	fn resolve(&self, sym: &Symbol, path: &mut SearchPath) -> Option<Mapping> {
		if let Some(found) = self.mappings.get(sym) {
			return Some(found);
		}
		if let Some(var) = self.load(sym) {
			return Some(Mapping::Var(var));
		}

		let here: *const Namespace = self;
		if path.iter().any(|(ns, s)| *ns == here && s == sym) {
			return None;
		}
		path.push((here, sym.clone()));
		let found = self.search_refers(sym, path);
		path.pop();

		let var = found?;
		self.cache_referred(sym, &var);
		Some(Mapping::Var(var))
	}

	/// Walks the refer table in declaration order; the first var found wins.
	fn search_refers(&self, sym: &Symbol, path: &mut SearchPath) -> Option<Arc<Var>> {
		let refers = self.refers.snapshot();
		for (target, filter) in refers.iter() {
			let Some(source) = filter.select(sym) else {
				continue;
			};
			if let Some(Mapping::Var(var)) = target.resolve(source, path) {
				return Some(var);
			}
		}
		None
	}

	fn cache_referred(&self, sym: &Symbol, var: &Arc<Var>) {
		match self.refer(sym, var.clone()) {
			Ok(_) => tracing::trace!(
				domain = "namespace",
				namespace = %self.name,
				symbol = %sym,
				var = %var,
				"cached referred var",
			),
			Err(err) => tracing::debug!(
				domain = "namespace",
				namespace = %self.name,
				symbol = %sym,
				error = %err,
				"referred var not cached",
			),
		}
	}

	fn load(&self, sym: &Symbol) -> Option<Arc<Var>> {
		let loader = self.env.loader.as_ref()?;
		let var = loader.load(self, sym)?;
		tracing::debug!(
			domain = "namespace",
			namespace = %self.name,
			symbol = %sym,
			var = %var,
			"lazy-loaded var",
		);
		Some(var)
	}
}
