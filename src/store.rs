//! Key-value persistence contract and built-in backends for stored credentials.
//!
//! A backend only keeps `key -> (value, expiry)` entries; expiry is evaluated by
//! [`TokenStore`](crate::auth::TokenStore), so backends behave like a cookie jar that never
//! garbage-collects on its own.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Boxed future returned by [`KeyValueStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by credential stores.
pub trait KeyValueStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the entry stored under `key`.
	fn put<'a>(&'a self, key: &'a str, entry: StoredEntry) -> StoreFuture<'a, ()>;

	/// Fetches the entry stored under `key`, expired or not.
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<StoredEntry>>;

	/// Removes the entry stored under `key`; removing a missing key succeeds.
	fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()>;
}

/// A single persisted value with its expiry instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
	/// Secret value; never logged.
	pub value: TokenSecret,
	/// Instant at which the entry stops being readable.
	#[serde(with = "time::serde::rfc3339")]
	pub expires_at: OffsetDateTime,
}
impl StoredEntry {
	/// Creates an entry that expires at `expires_at`.
	pub fn new(value: TokenSecret, expires_at: OffsetDateTime) -> Self {
		Self { value, expires_at }
	}

	/// Returns `true` once `instant` reaches the expiry.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}
}

/// Error type produced by [`KeyValueStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// The expiry instant falls outside the representable calendar.
	#[error("Expiry {seconds} seconds after {from} is out of range.")]
	ExpiryOutOfRange {
		/// Requested lifetime in whole seconds.
		seconds: i64,
		/// Clock reading the lifetime was added to.
		from: String,
	},
}
