//! Thread-safe in-memory [`KeyValueStore`] for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{KeyValueStore, StoreError, StoreFuture, StoredEntry},
};

type EntryMap = Arc<RwLock<HashMap<String, StoredEntry>>>;

/// Storage backend that keeps entries in-process; clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(EntryMap);
impl MemoryStore {
	/// Returns the number of stored entries, expired ones included.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	/// Returns `true` if an entry exists under `key`.
	pub fn contains(&self, key: &str) -> bool {
		self.0.read().contains_key(key)
	}

	fn put_now(map: EntryMap, key: &str, entry: StoredEntry) -> Result<(), StoreError> {
		map.write().insert(key.to_owned(), entry);

		Ok(())
	}

	fn get_now(map: EntryMap, key: &str) -> Option<StoredEntry> {
		map.read().get(key).cloned()
	}

	fn remove_now(map: EntryMap, key: &str) {
		map.write().remove(key);
	}
}
impl KeyValueStore for MemoryStore {
	fn put<'a>(&'a self, key: &'a str, entry: StoredEntry) -> StoreFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::put_now(map, key, entry) })
	}

	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<StoredEntry>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::get_now(map, key)) })
	}

	fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			Self::remove_now(map, key);

			Ok(())
		})
	}
}
