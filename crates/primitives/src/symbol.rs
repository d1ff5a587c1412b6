use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// An identifier, optionally qualified by a namespace (`ns/name`).
///
/// Symbols compare by value: two symbols are equal when both their qualifier
/// and their name are equal. Cloning is cheap; both parts are shared.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Symbol {
	ns: Option<Arc<str>>,
	name: Arc<str>,
}

impl Symbol {
	/// Parses the printed form of a symbol.
	///
	/// The text is split at the first `/`. If either side of that split is
	/// empty (`"/"`, `"foo/"`, `"/foo"`), the whole text is kept as an
	/// unqualified name.
	pub fn intern(text: &str) -> Self {
		match text.split_once('/') {
			Some((ns, name)) if !ns.is_empty() && !name.is_empty() => Self::qualified(ns, name),
			_ => Self::unqualified(text),
		}
	}

	/// Creates a symbol with no namespace qualifier.
	pub fn unqualified(name: impl Into<Arc<str>>) -> Self {
		Self {
			ns: None,
			name: name.into(),
		}
	}

	/// Creates a namespace-qualified symbol.
	pub fn qualified(ns: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
		Self {
			ns: Some(ns.into()),
			name: name.into(),
		}
	}

	/// Returns the namespace qualifier, if any.
	#[inline]
	pub fn namespace(&self) -> Option<&str> {
		self.ns.as_deref()
	}

	/// Returns the name part.
	#[inline]
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns true if the symbol carries a namespace qualifier.
	#[inline]
	pub fn is_qualified(&self) -> bool {
		self.ns.is_some()
	}

	/// Returns the name part as an unqualified symbol.
	pub fn without_namespace(&self) -> Self {
		Self {
			ns: None,
			name: self.name.clone(),
		}
	}
}

impl fmt::Display for Symbol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.ns {
			Some(ns) => write!(f, "{ns}/{}", self.name),
			None => f.write_str(&self.name),
		}
	}
}

impl fmt::Debug for Symbol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Symbol({self})")
	}
}

impl From<&str> for Symbol {
	fn from(text: &str) -> Self {
		Self::intern(text)
	}
}

impl From<String> for Symbol {
	fn from(text: String) -> Self {
		Self::intern(&text)
	}
}

impl From<Symbol> for String {
	fn from(sym: Symbol) -> Self {
		sym.to_string()
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;

	#[test]
	fn intern_splits_at_first_slash() {
		let sym = Symbol::intern("lexis.string/join");
		assert_eq!(sym.namespace(), Some("lexis.string"));
		assert_eq!(sym.name(), "join");
		assert!(sym.is_qualified());

		let nested = Symbol::intern("a/b/c");
		assert_eq!(nested.namespace(), Some("a"));
		assert_eq!(nested.name(), "b/c");
	}

	#[test]
	fn lone_slash_is_unqualified() {
		let sym = Symbol::intern("/");
		assert!(!sym.is_qualified());
		assert_eq!(sym.name(), "/");
	}

	#[test]
	fn empty_half_stays_unqualified() {
		for text in ["foo/", "/foo"] {
			let sym = Symbol::intern(text);
			assert!(!sym.is_qualified(), "{text}");
			assert_eq!(sym.name(), text);
			assert_eq!(sym.to_string(), text);
		}

		let slash_name = Symbol::intern("lexis.core//");
		assert_eq!(slash_name.namespace(), Some("lexis.core"));
		assert_eq!(slash_name.name(), "/");
	}

	#[test]
	fn equality_is_by_value() {
		assert_eq!(Symbol::intern("x/y"), Symbol::qualified("x", "y"));
		assert_ne!(Symbol::intern("x/y"), Symbol::unqualified("y"));
		assert_eq!(Symbol::intern("x/y").without_namespace(), Symbol::unqualified("y"));
	}

	#[test]
	fn serde_uses_printed_form() {
		let sym = Symbol::intern("app.main/run");
		let json = serde_json::to_string(&sym).unwrap();
		assert_eq!(json, "\"app.main/run\"");
		let back: Symbol = serde_json::from_str(&json).unwrap();
		assert_eq!(back, sym);
	}

	proptest! {
		#[test]
		fn display_round_trips(ns in "[a-z][a-z.]{0,8}", name in "[a-z*+!?-]{1,8}") {
			let sym = Symbol::qualified(ns.as_str(), name.as_str());
			prop_assert_eq!(Symbol::intern(&sym.to_string()), sym);
			let bare = Symbol::unqualified(name.as_str());
			prop_assert_eq!(Symbol::intern(&bare.to_string()), bare);
		}
	}
}
