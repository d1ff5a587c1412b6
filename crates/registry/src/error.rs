use lexis_primitives::Symbol;

/// Category of a [`NamespaceError`], for callers that branch on kind rather than detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
	/// A malformed argument, e.g. a qualified symbol where an unqualified one is required.
	InvalidArgument,
	/// A mapping clashes with an existing binding that may not be shadowed.
	BindingConflict,
	/// An alias is already bound to a different namespace.
	AliasConflict,
	/// The core namespace cannot be removed.
	ProtectedNamespace,
}

/// Errors raised by namespace and registry mutators.
///
/// All of these are reported at the point of the offending call and leave every table
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NamespaceError {
	/// A namespace-qualified symbol was passed where only unqualified names are stored.
	#[error("can't {op} namespace-qualified symbol: {symbol}")]
	QualifiedSymbol { op: &'static str, symbol: Symbol },

	/// The symbol is already bound to something that may not be replaced.
	#[error("{symbol} already refers to: {existing} in namespace: {namespace}")]
	BindingConflict {
		namespace: Symbol,
		symbol: Symbol,
		/// Printed form of the binding that won.
		existing: String,
		/// Printed form of the rejected binding.
		incoming: String,
	},

	/// The alias already names another namespace.
	#[error("alias {alias} already exists in namespace {namespace}, aliasing {existing}")]
	AliasConflict {
		namespace: Symbol,
		alias: Symbol,
		existing: Symbol,
		requested: Symbol,
	},

	#[error("cannot remove core namespace {0}")]
	ProtectedNamespace(Symbol),
}

impl NamespaceError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::QualifiedSymbol { .. } => ErrorKind::InvalidArgument,
			Self::BindingConflict { .. } => ErrorKind::BindingConflict,
			Self::AliasConflict { .. } => ErrorKind::AliasConflict,
			Self::ProtectedNamespace(_) => ErrorKind::ProtectedNamespace,
		}
	}
}

/// Result type for namespace operations.
pub type Result<T> = std::result::Result<T, NamespaceError>;
