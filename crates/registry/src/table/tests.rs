use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rustc_hash::FxHashMap;

use super::{InsertAction, NameTable, Verdict};

#[test]
fn test_get_or_install_reports_preexisting() {
	let table: NameTable<&str, u32> = NameTable::new();

	let (v, existed) = table.get_or_install("a", || 1);
	assert_eq!((v, existed), (1, false));

	let mut calls = 0;
	let (v, existed) = table.get_or_install("a", || {
		calls += 1;
		2
	});
	assert_eq!((v, existed), (1, true));
	assert_eq!(calls, 0, "factory must not run when the key is present");
}

#[test]
fn test_replace_consults_policy_only_when_occupied() {
	let table: NameTable<&str, u32> = NameTable::new();

	let result = table.replace("a", 1, |_, _| -> Result<Verdict, ()> {
		panic!("policy must not run for an absent key")
	});
	assert_eq!(result, Ok((1, InsertAction::InsertedNew)));

	let result = table.replace("a", 2, |existing, incoming| {
		assert_eq!((*existing, *incoming), (1, 2));
		Ok::<_, ()>(Verdict::Replace)
	});
	assert_eq!(result, Ok((2, InsertAction::ReplacedExisting)));

	let result = table.replace("a", 3, |_, _| Ok::<_, ()>(Verdict::KeepExisting));
	assert_eq!(result, Ok((2, InsertAction::KeptExisting)));
	assert_eq!(table.get(&"a"), Some(2));
}

#[test]
fn test_policy_error_leaves_table_untouched() {
	let table: NameTable<&str, u32> = NameTable::new();
	table.insert("a", 1);
	let before = table.snapshot();

	let result = table.replace("a", 9, |_, _| Err::<Verdict, _>("conflict"));
	assert_eq!(result, Err("conflict"));
	assert!(Arc::ptr_eq(&before, &table.snapshot()), "no snapshot may be published");
}

#[test]
fn test_remove_is_idempotent() {
	let table: NameTable<&str, u32> = NameTable::new();
	table.insert("a", 1);
	table.insert("b", 2);

	assert_eq!(table.remove(&"a"), Some(1));
	assert_eq!(table.remove(&"a"), None);
	assert!(!table.contains_key(&"a"));
	assert_eq!(table.len(), 1);
}

#[test]
fn test_insert_keeps_position_on_overwrite() {
	let table: NameTable<&str, u32> = NameTable::new();
	table.insert("a", 1);
	table.insert("b", 2);
	assert_eq!(table.insert("a", 3), InsertAction::ReplacedExisting);

	let order: Vec<_> = table.snapshot().iter().map(|(k, v)| (*k, *v)).collect();
	assert_eq!(order, vec![("a", 3), ("b", 2)]);
}

#[test]
fn test_seeded_tables_share_then_diverge() {
	let mut seed = super::FxIndexMap::default();
	seed.insert("x", 0_u32);
	let seed = Arc::new(seed);

	let left = NameTable::from_snapshot(seed.clone());
	let right = NameTable::from_snapshot(seed.clone());
	assert!(Arc::ptr_eq(&left.snapshot(), &right.snapshot()));

	left.insert("y", 1);
	assert_eq!(left.len(), 2);
	assert_eq!(right.len(), 1);
	assert_eq!(seed.len(), 1, "the seed map itself is never written");
}

#[derive(Debug, Clone)]
enum Op {
	Install(u8, u16),
	Overwrite(u8, u16),
	Remove(u8),
}

fn op() -> impl Strategy<Value = Op> {
	prop_oneof![
		(0u8..8, any::<u16>()).prop_map(|(k, v)| Op::Install(k, v)),
		(0u8..8, any::<u16>()).prop_map(|(k, v)| Op::Overwrite(k, v)),
		(0u8..8).prop_map(Op::Remove),
	]
}

proptest! {
	/// Single-threaded behaviour matches a plain hash map.
	#[test]
	fn prop_matches_hash_map_model(ops in proptest::collection::vec(op(), 0..64)) {
		let table: NameTable<u8, u16> = NameTable::new();
		let mut model: FxHashMap<u8, u16> = FxHashMap::default();

		for op in ops {
			match op {
				Op::Install(k, v) => {
					let (got, existed) = table.get_or_install(k, || v);
					let expected_existed = model.contains_key(&k);
					let expected = *model.entry(k).or_insert(v);
					prop_assert_eq!(got, expected);
					prop_assert_eq!(existed, expected_existed);
				}
				Op::Overwrite(k, v) => {
					table.insert(k, v);
					model.insert(k, v);
				}
				Op::Remove(k) => {
					prop_assert_eq!(table.remove(&k), model.remove(&k));
				}
			}
		}

		prop_assert_eq!(table.len(), model.len());
		for (k, v) in &model {
			prop_assert_eq!(table.get(k), Some(*v));
		}
	}
}
