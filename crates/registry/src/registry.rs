//! The namespace registry.
//!
//! # Lifecycle
//!
//! 1. Startup: [`NamespaceRegistry::new`] validates the config, loads the default imports and
//!    creates the core namespace.
//! 2. Steady state: callers resolve namespaces through [`NamespaceRegistry::find_or_create`]
//!    and pass the registry handle to whatever needs it; nothing here is process-global.
//! 3. Teardown: dropping the registry releases every namespace no caller still holds.
//!
//! Namespaces that alias or refer each other hold strong references, so a cycle of such
//! declarations lives until the process ends.

use std::fmt;
use std::sync::Arc;

use lexis_primitives::{Class, Symbol};

use crate::config::{ConfigError, RegistryConfig};
use crate::error::{NamespaceError, Result};
use crate::namespace::{Mapping, Namespace};
use crate::table::{FxIndexMap, NameTable};
use crate::var::VarLoader;

/// State shared by every namespace of one registry.
pub(crate) struct Environment {
	/// Mapping table every namespace starts from.
	pub(crate) default_imports: Arc<FxIndexMap<Symbol, Mapping>>,
	pub(crate) loader: Option<Arc<dyn VarLoader>>,
}

/// Name-indexed set of all namespaces, with atomic get-or-create.
pub struct NamespaceRegistry {
	config: RegistryConfig,
	env: Arc<Environment>,
	core: Arc<Namespace>,
	namespaces: NameTable<Symbol, Arc<Namespace>>,
}

impl NamespaceRegistry {
	/// Creates a registry without a lazy loader.
	pub fn new(config: RegistryConfig) -> std::result::Result<Self, ConfigError> {
		config.validate()?;
		Ok(Self::build(config, None))
	}

	/// Creates a registry whose namespaces fall back to `loader` on lookup misses.
	pub fn with_loader(
		config: RegistryConfig,
		loader: impl VarLoader + 'static,
	) -> std::result::Result<Self, ConfigError> {
		config.validate()?;
		Ok(Self::build(config, Some(Arc::new(loader))))
	}

	fn build(config: RegistryConfig, loader: Option<Arc<dyn VarLoader>>) -> Self {
		let default_imports: FxIndexMap<Symbol, Mapping> = config
			.default_imports
			.iter()
			.map(|name| {
				let class = Class::load(name.as_str());
				(Symbol::unqualified(class.simple_name()), Mapping::Class(class))
			})
			.collect();
		let env = Arc::new(Environment {
			default_imports: Arc::new(default_imports),
			loader,
		});

		let core_name = config.core_symbol();
		let core = Namespace::new(core_name.clone(), env.clone(), None);
		let namespaces = NameTable::new();
		namespaces.insert(core_name, core.clone());

		tracing::debug!(
			domain = "namespace",
			core = %core.name(),
			default_imports = env.default_imports.len(),
			"namespace registry created",
		);

		Self {
			config,
			env,
			core,
			namespaces,
		}
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// The core namespace, referred by every other namespace.
	pub fn core(&self) -> &Arc<Namespace> {
		&self.core
	}

	/// Returns the namespace named `name`, creating it if needed.
	///
	/// Racing callers all receive the same instance.
	pub fn find_or_create(&self, name: &Symbol) -> Arc<Namespace> {
		let (ns, existed) = self.namespaces.get_or_install(name.clone(), || {
			Namespace::new(name.clone(), self.env.clone(), Some(&self.core))
		});
		if !existed {
			tracing::debug!(domain = "namespace", namespace = %name, "namespace created");
		}
		ns
	}

	pub fn find(&self, name: &Symbol) -> Option<Arc<Namespace>> {
		self.namespaces.get(name)
	}

	/// Removes the namespace named `name` from the registry.
	///
	/// Holders of the removed namespace keep a working instance; a later `find_or_create` of
	/// the same name builds a new one. The core namespace cannot be removed.
	pub fn remove(&self, name: &Symbol) -> Result<Option<Arc<Namespace>>> {
		if name == self.core.name() {
			return Err(NamespaceError::ProtectedNamespace(name.clone()));
		}
		let removed = self.namespaces.remove(name);
		if removed.is_some() {
			tracing::debug!(domain = "namespace", namespace = %name, "namespace removed");
		}
		Ok(removed)
	}

	/// Snapshot of all namespaces, in creation order.
	pub fn all(&self) -> Vec<Arc<Namespace>> {
		self.namespaces.snapshot().values().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.namespaces.len()
	}

	pub fn is_empty(&self) -> bool {
		self.namespaces.is_empty()
	}
}

impl Default for NamespaceRegistry {
	fn default() -> Self {
		Self::build(RegistryConfig::default(), None)
	}
}

impl fmt::Debug for NamespaceRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("NamespaceRegistry")
			.field("core", self.core.name())
			.field("namespaces", &self.namespaces.snapshot().keys().collect::<Vec<_>>())
			.finish()
	}
}
