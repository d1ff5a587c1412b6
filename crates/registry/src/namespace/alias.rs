use std::sync::Arc;

use lexis_primitives::Symbol;

use super::Namespace;
use crate::error::{NamespaceError, Result};

impl Namespace {
	/// Binds `alias` to `target`.
	///
	/// Aliases are write-once: re-adding the same target is a no-op, any other target is an
	/// [`NamespaceError::AliasConflict`].
	pub fn add_alias(&self, alias: &Symbol, target: &Arc<Namespace>) -> Result<()> {
		self.require_unqualified(alias, "alias")?;

		let (existing, _) = self.aliases.get_or_install(alias.clone(), || target.clone());
		if Arc::ptr_eq(&existing, target) {
			return Ok(());
		}
		Err(NamespaceError::AliasConflict {
			namespace: self.name.clone(),
			alias: alias.clone(),
			existing: existing.name().clone(),
			requested: target.name().clone(),
		})
	}

	pub fn remove_alias(&self, alias: &Symbol) {
		self.aliases.remove(alias);
	}

	pub fn lookup_alias(&self, alias: &Symbol) -> Option<Arc<Namespace>> {
		self.aliases.get(alias)
	}
}
