//! Mapping-table mutators and the shadowing policy.

use std::sync::Arc;

use lexis_primitives::{Class, Symbol};

use super::{Mapping, Namespace};
use crate::error::{NamespaceError, Result};
use crate::table::{InsertAction, Verdict};
use crate::var::Var;

/// How an occupied slot holding a var of this namespace is treated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OwnVar {
	/// `intern`: the existing var is the answer.
	Keep,
	/// `reference`: the incoming value overwrites it.
	Overwrite,
}

impl Namespace {
	/// Returns the var interned under `sym`, creating it if needed.
	///
	/// Replaces a core-owned var or a default import with a warning. Fails with
	/// [`NamespaceError::BindingConflict`] if `sym` is bound to anything else.
	pub fn intern(&self, sym: &Symbol) -> Result<Arc<Var>> {
		self.require_unqualified(sym, "intern")?;

		let mut fresh: Option<Arc<Var>> = None;
		let (found, _) = self.mappings.get_or_install(sym.clone(), || {
			Mapping::Var(fresh.get_or_insert_with(|| Var::new(self, sym.clone())).clone())
		});
		if let Mapping::Var(var) = &found
			&& var.is_owned_by(self)
		{
			return Ok(var.clone());
		}

		let var = fresh.unwrap_or_else(|| Var::new(self, sym.clone()));
		let installed = self.install(sym, Mapping::Var(var.clone()), OwnVar::Keep)?;
		// Keeping an existing entry only happens for a var owned here.
		Ok(installed.into_var().unwrap_or(var))
	}

	/// Maps `sym` to an externally supplied value.
	///
	/// A no-op if `sym` already maps to that exact value. Otherwise follows the same
	/// shadowing policy as [`Namespace::intern`]; a var owned by this namespace is overwritten.
	pub fn reference(&self, sym: &Symbol, value: Mapping) -> Result<Mapping> {
		self.require_unqualified(sym, "intern")?;
		self.install(sym, value, OwnVar::Overwrite)
	}

	/// Maps `sym` to a var owned elsewhere.
	pub fn refer(&self, sym: &Symbol, var: Arc<Var>) -> Result<Arc<Var>> {
		self.reference(sym, Mapping::Var(var.clone()))?;
		Ok(var)
	}

	/// Maps `sym` to an imported type.
	///
	/// A different load of the same type name is replaced (hot reload). Anything else already
	/// bound to `sym` is a [`NamespaceError::BindingConflict`].
	pub fn reference_class(&self, sym: &Symbol, class: Arc<Class>) -> Result<Arc<Class>> {
		self.require_unqualified(sym, "intern")?;

		let incoming = Mapping::Class(class.clone());
		let (_, action) = self
			.mappings
			.replace(sym.clone(), incoming, |existing, incoming| match existing {
				Mapping::Class(c) if c.same_instance(&class) => Ok(Verdict::KeepExisting),
				Mapping::Class(c) if class.is_reload_of(c) => Ok(Verdict::Replace),
				_ => Err(self.binding_conflict(sym, existing, incoming)),
			})?;

		if action == InsertAction::ReplacedExisting {
			tracing::debug!(
				domain = "namespace",
				namespace = %self.name,
				symbol = %sym,
				class = %class,
				"reloaded class replaced previous instance",
			);
		}
		Ok(class)
	}

	/// Imports `class` under the last segment of its fully-qualified name.
	pub fn import_class(&self, class: Arc<Class>) -> Result<Arc<Class>> {
		let sym = Symbol::unqualified(class.simple_name());
		self.reference_class(&sym, class)
	}

	/// Imports `class` under an explicit local name.
	pub fn import_class_as(&self, sym: &Symbol, class: Arc<Class>) -> Result<Arc<Class>> {
		self.reference_class(sym, class)
	}

	/// Removes the mapping for `sym`, if any.
	pub fn unmap(&self, sym: &Symbol) -> Result<()> {
		self.require_unqualified(sym, "unintern")?;
		self.mappings.remove(sym);
		Ok(())
	}

	/// Writes `value` under `sym` through the shadowing policy, warning on permitted shadowing.
	fn install(&self, sym: &Symbol, value: Mapping, own_var: OwnVar) -> Result<Mapping> {
		let mut shadowed: Option<Mapping> = None;
		let (installed, action) = self.mappings.replace(sym.clone(), value, |existing, incoming| {
			self.shadow_verdict(sym, existing, incoming, own_var, &mut shadowed)
		})?;

		if action == InsertAction::ReplacedExisting
			&& let Some(previous) = shadowed
		{
			let ns = &self.name;
			tracing::warn!(
				domain = "namespace",
				namespace = %ns,
				symbol = %sym,
				existing = %previous,
				replacement = %installed,
				"{sym} already refers to: {previous} in namespace: {ns}, being replaced by: {installed}"
			);
		}
		Ok(installed)
	}

	/// Decides whether `incoming` may take the slot held by `existing`.
	///
	/// `shadowed` is set when the replacement has to be reported.
	fn shadow_verdict(
		&self,
		sym: &Symbol,
		existing: &Mapping,
		incoming: &Mapping,
		own_var: OwnVar,
		shadowed: &mut Option<Mapping>,
	) -> Result<Verdict> {
		*shadowed = None;
		if existing.same_as(incoming) {
			return Ok(Verdict::KeepExisting);
		}

		let replaceable = match existing {
			Mapping::Var(var) if var.is_owned_by(self) => {
				return Ok(match own_var {
					OwnVar::Keep => Verdict::KeepExisting,
					OwnVar::Overwrite => Verdict::Replace,
				});
			}
			Mapping::Var(var) => var.is_owned_by_weak(&self.core),
			_ => self.is_default_import(sym, existing),
		};

		if replaceable {
			*shadowed = Some(existing.clone());
			Ok(Verdict::Replace)
		} else {
			Err(self.binding_conflict(sym, existing, incoming))
		}
	}

	fn is_default_import(&self, sym: &Symbol, mapping: &Mapping) -> bool {
		self.env
			.default_imports
			.get(sym)
			.is_some_and(|default| default.same_as(mapping))
	}

	fn binding_conflict(&self, sym: &Symbol, existing: &Mapping, incoming: &Mapping) -> NamespaceError {
		NamespaceError::BindingConflict {
			namespace: self.name.clone(),
			symbol: sym.clone(),
			existing: existing.to_string(),
			incoming: incoming.to_string(),
		}
	}
}
