use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use super::{NameTable, Verdict};

const THREADS: usize = 8;
const PER_THREAD: usize = 200;

/// Invariant: concurrent writes to distinct keys are never lost.
pub(crate) fn inv_no_lost_updates() {
	let table: NameTable<usize, usize> = NameTable::new();

	thread::scope(|s| {
		for t in 0..THREADS {
			let table = &table;
			s.spawn(move || {
				for i in 0..PER_THREAD {
					let key = t * PER_THREAD + i;
					table.insert(key, key * 2);
				}
			});
		}
	});

	assert_eq!(table.len(), THREADS * PER_THREAD);
	for key in 0..THREADS * PER_THREAD {
		assert_eq!(table.get(&key), Some(key * 2), "lost update for key {key}");
	}
}

#[test]
fn test_no_lost_updates() {
	inv_no_lost_updates()
}

/// Invariant: racing installs of one key all return the single published value.
pub(crate) fn inv_install_converges() {
	for _ in 0..50 {
		let table: NameTable<&str, Arc<usize>> = NameTable::new();
		let fresh = AtomicUsize::new(0);

		let results: Vec<Arc<usize>> = thread::scope(|s| {
			let handles: Vec<_> = (0..THREADS)
				.map(|t| {
					let table = &table;
					let fresh = &fresh;
					s.spawn(move || {
						let (v, existed) = table.get_or_install("k", || Arc::new(t));
						if !existed {
							fresh.fetch_add(1, Ordering::SeqCst);
						}
						v
					})
				})
				.collect();
			handles.into_iter().map(|h| h.join().unwrap()).collect()
		});

		assert_eq!(fresh.load(Ordering::SeqCst), 1, "exactly one installer wins");
		let winner = table.get(&"k").unwrap();
		for r in &results {
			assert!(Arc::ptr_eq(r, &winner));
		}
	}
}

#[test]
fn test_install_converges() {
	inv_install_converges()
}

/// Invariant: a pinned snapshot never observes later writes.
pub(crate) fn inv_snapshot_stability() {
	let table: NameTable<u32, u32> = NameTable::new();
	table.insert(1, 1);
	let pinned = table.snapshot();

	thread::scope(|s| {
		s.spawn(|| {
			for i in 2..100 {
				table.insert(i, i);
			}
			table.remove(&1);
		});
	});

	assert_eq!(pinned.len(), 1);
	assert_eq!(pinned.get(&1), Some(&1));
	assert_eq!(table.len(), 98);
}

#[test]
fn test_snapshot_stability() {
	inv_snapshot_stability()
}

/// Invariant: policy-guarded counters under contention apply every increment exactly once.
pub(crate) fn inv_policy_reevaluated_on_retry() {
	let table: NameTable<&str, usize> = NameTable::new();
	table.insert("n", 0);

	thread::scope(|s| {
		for _ in 0..THREADS {
			let table = &table;
			s.spawn(move || {
				for _ in 0..PER_THREAD {
					loop {
						let seen = table.get(&"n").unwrap();
						let res = table.replace("n", seen + 1, |existing, _| {
							if *existing == seen {
								Ok(Verdict::Replace)
							} else {
								Err(())
							}
						});
						if res.is_ok() {
							break;
						}
					}
				}
			});
		}
	});

	assert_eq!(table.get(&"n"), Some(THREADS * PER_THREAD));
}

#[test]
fn test_policy_reevaluated_on_retry() {
	inv_policy_reevaluated_on_retry()
}
