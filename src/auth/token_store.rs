//! Persisted credential store with per-entry expiry.
//!
//! The three tokens are written as independent entries, each with its own expiry, so the
//! refresh credential can outlive the access pair. Reads are all-or-nothing: a missing or
//! lapsed entry makes [`TokenStore::get`] report no credentials at all.

// self
use crate::{
	_prelude::*,
	auth::{
		AuthTokens, CredentialKey, CredentialSet, DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL,
		MAX_ACCESS_TTL, TokenSecret,
	},
	store::{KeyValueStore, MemoryStore, StoreError, StoredEntry},
};

/// Credential store injected into the request pipeline.
#[derive(Clone)]
pub struct TokenStore {
	backend: Arc<dyn KeyValueStore>,
	access_ttl: Duration,
	refresh_ttl: Duration,
}
impl TokenStore {
	/// Wraps a persistence backend using the default lifetimes.
	pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
		Self { backend, access_ttl: DEFAULT_ACCESS_TTL, refresh_ttl: DEFAULT_REFRESH_TTL }
	}

	/// Store backed by a fresh [`MemoryStore`].
	pub fn in_memory() -> Self {
		Self::new(Arc::new(MemoryStore::default()))
	}

	/// Underlying persistence backend.
	pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
		&self.backend
	}

	/// Persists all three tokens, overwriting anything stored.
	///
	/// `ttl` applies to the access and secondary credentials (default 36000 seconds, clamped to
	/// [`MAX_ACCESS_TTL`]); the refresh credential always receives the refresh lifetime (default
	/// 7 days). A failed write clears the store, so a failed call never leaves a mix of old and
	/// new entries behind.
	pub async fn set(
		&self,
		tokens: &AuthTokens,
		ttl: Option<Duration>,
	) -> Result<CredentialSet, StoreError> {
		self.set_at(tokens, ttl, OffsetDateTime::now_utc()).await
	}

	/// [`TokenStore::set`] evaluated against an explicit clock reading.
	pub async fn set_at(
		&self,
		tokens: &AuthTokens,
		ttl: Option<Duration>,
		now: OffsetDateTime,
	) -> Result<CredentialSet, StoreError> {
		let expires_at = self.access_expiry(now, ttl)?;
		let refresh_expires_at = expiry_after(now, self.refresh_ttl)?;

		for key in CredentialKey::ALL {
			let expiry = if key == CredentialKey::Refresh { refresh_expires_at } else { expires_at };
			let entry = StoredEntry::new(tokens.secret(key).clone(), expiry);

			if let Err(e) = self.backend.put(key.as_str(), entry).await {
				tracing::warn!(key = key.as_str(), error = %e, "Failed to store credential.");

				// `clear` already logs each key it could not remove.
				let _ = self.clear().await;

				return Err(e);
			}
		}

		tracing::debug!(%expires_at, %refresh_expires_at, "Stored credential set.");

		Ok(CredentialSet {
			access_token: tokens.access_token.clone(),
			jwt_token: tokens.jwt_token.clone(),
			refresh_token: tokens.refresh_token.clone(),
			expires_at,
			refresh_expires_at,
		})
	}

	/// Returns the credential set only when all three entries exist and are unexpired.
	pub async fn get(&self) -> Result<Option<CredentialSet>, StoreError> {
		self.get_at(OffsetDateTime::now_utc()).await
	}

	/// [`TokenStore::get`] evaluated against an explicit clock reading.
	pub async fn get_at(&self, now: OffsetDateTime) -> Result<Option<CredentialSet>, StoreError> {
		let Some(access) = self.live_entry(CredentialKey::Access, now).await? else {
			return Ok(None);
		};
		let Some(jwt) = self.live_entry(CredentialKey::Jwt, now).await? else {
			return Ok(None);
		};
		let Some(refresh) = self.live_entry(CredentialKey::Refresh, now).await? else {
			return Ok(None);
		};

		Ok(Some(CredentialSet {
			expires_at: access.expires_at.min(jwt.expires_at),
			refresh_expires_at: refresh.expires_at,
			access_token: access.value,
			jwt_token: jwt.value,
			refresh_token: refresh.value,
		}))
	}

	/// Replaces the access and secondary credentials, leaving the refresh entry untouched.
	///
	/// Returns the resulting set, or `None` if the refresh entry is no longer readable.
	pub async fn renew(
		&self,
		access_token: &TokenSecret,
		jwt_token: &TokenSecret,
		ttl: Option<Duration>,
	) -> Result<Option<CredentialSet>, StoreError> {
		let now = OffsetDateTime::now_utc();
		let expires_at = self.access_expiry(now, ttl)?;

		self.backend
			.put(CredentialKey::Access.as_str(), StoredEntry::new(access_token.clone(), expires_at))
			.await?;
		self.backend
			.put(CredentialKey::Jwt.as_str(), StoredEntry::new(jwt_token.clone(), expires_at))
			.await?;

		tracing::debug!(%expires_at, "Renewed access credentials.");

		self.get_at(now).await
	}

	/// Reads the refresh credential alone; renewal works even after the access pair lapsed.
	pub async fn refresh_token(&self) -> Result<Option<TokenSecret>, StoreError> {
		let entry = self.live_entry(CredentialKey::Refresh, OffsetDateTime::now_utc()).await?;

		Ok(entry.map(|entry| entry.value))
	}

	/// Removes all three entries; safe to call when nothing is stored.
	///
	/// Every key is attempted even if one removal fails; the first failure is returned.
	pub async fn clear(&self) -> Result<(), StoreError> {
		let mut first_error = None;

		for key in CredentialKey::ALL {
			if let Err(e) = self.backend.remove(key.as_str()).await {
				tracing::warn!(key = key.as_str(), error = %e, "Failed to remove credential.");

				if first_error.is_none() {
					first_error = Some(e);
				}
			}
		}

		match first_error {
			Some(e) => Err(e),
			None => Ok(()),
		}
	}

	/// Returns `true` when a complete, unexpired credential set is stored.
	pub async fn is_authenticated(&self) -> Result<bool, StoreError> {
		Ok(self.get().await?.is_some())
	}

	fn access_expiry(
		&self,
		now: OffsetDateTime,
		ttl: Option<Duration>,
	) -> Result<OffsetDateTime, StoreError> {
		let ttl = ttl.unwrap_or(self.access_ttl);

		if ttl > MAX_ACCESS_TTL {
			tracing::debug!(requested = %ttl, "Clamping access lifetime.");
		}

		expiry_after(now, ttl.min(MAX_ACCESS_TTL))
	}

	async fn live_entry(
		&self,
		key: CredentialKey,
		now: OffsetDateTime,
	) -> Result<Option<StoredEntry>, StoreError> {
		let entry = self.backend.get(key.as_str()).await?;

		Ok(entry.filter(|entry| !entry.is_expired_at(now) && !entry.value.is_blank()))
	}
}
impl Debug for TokenStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenStore")
			.field("access_ttl", &self.access_ttl)
			.field("refresh_ttl", &self.refresh_ttl)
			.finish()
	}
}

fn expiry_after(now: OffsetDateTime, ttl: Duration) -> Result<OffsetDateTime, StoreError> {
	now.checked_add(ttl).ok_or_else(|| StoreError::ExpiryOutOfRange {
		seconds: ttl.whole_seconds(),
		from: now.to_string(),
	})
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::store::StoreFuture;

	/// Memory backend that refuses writes to one key.
	struct RejectingStore {
		inner: MemoryStore,
		rejected: &'static str,
	}
	impl KeyValueStore for RejectingStore {
		fn put<'a>(&'a self, key: &'a str, entry: StoredEntry) -> StoreFuture<'a, ()> {
			if key == self.rejected {
				return Box::pin(async move {
					Err(StoreError::Backend { message: format!("cannot write {key}") })
				});
			}

			self.inner.put(key, entry)
		}

		fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<StoredEntry>> {
			self.inner.get(key)
		}

		fn remove<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
			self.inner.remove(key)
		}
	}

	fn tokens() -> AuthTokens {
		AuthTokens::new("access", "jwt", "refresh")
	}

	#[tokio::test]
	async fn default_lifetimes_follow_access_and_refresh_windows() {
		let store = TokenStore::in_memory();
		let now = macros::datetime!(2025-03-01 08:00 UTC);
		let set = store.set_at(&tokens(), None, now).await.expect("Set should succeed.");

		assert_eq!(set.expires_at, now + Duration::seconds(36_000));
		assert_eq!(set.refresh_expires_at, now + Duration::days(7));
	}

	#[tokio::test]
	async fn get_reports_absent_once_access_pair_expires() {
		let store = TokenStore::in_memory();
		let now = macros::datetime!(2025-03-01 08:00 UTC);

		store
			.set_at(&tokens(), Some(Duration::minutes(5)), now)
			.await
			.expect("Set should succeed.");

		assert!(
			store.get_at(now + Duration::minutes(4)).await.expect("Get should succeed.").is_some()
		);
		assert!(
			store.get_at(now + Duration::minutes(5)).await.expect("Get should succeed.").is_none()
		);
	}

	#[tokio::test]
	async fn renew_keeps_refresh_entry() {
		let store = TokenStore::in_memory();

		store.set(&tokens(), None).await.expect("Set should succeed.");

		let before = store.get().await.expect("Get should succeed.").expect("Set should be present.");
		let renewed = store
			.renew(&TokenSecret::new("access-2"), &TokenSecret::new("jwt-2"), None)
			.await
			.expect("Renew should succeed.")
			.expect("Renewed set should be present.");

		assert_eq!(renewed.access_token.expose(), "access-2");
		assert_eq!(renewed.jwt_token.expose(), "jwt-2");
		assert_eq!(renewed.refresh_token.expose(), "refresh");
		assert_eq!(renewed.refresh_expires_at, before.refresh_expires_at);
	}

	#[tokio::test]
	async fn blank_values_count_as_missing() {
		let store = TokenStore::in_memory();

		store.set(&AuthTokens::new("access", "", "refresh"), None).await.expect("Set should succeed.");

		assert!(store.get().await.expect("Get should succeed.").is_none());
		assert!(!store.is_authenticated().await.expect("Check should succeed."));
	}

	#[tokio::test]
	async fn oversized_lifetimes_are_clamped() {
		let store = TokenStore::in_memory();
		let now = macros::datetime!(2025-03-01 08:00 UTC);
		let huge = Duration::seconds(9_000_000_000_000);
		let set = store.set_at(&tokens(), Some(huge), now).await.expect("Set should succeed.");

		assert_eq!(set.expires_at, now + MAX_ACCESS_TTL);
		assert_eq!(set.refresh_expires_at, now + Duration::days(7));

		let store = TokenStore::in_memory();

		store.set(&tokens(), None).await.expect("Set should succeed.");

		let renewed = store
			.renew(&TokenSecret::new("access-2"), &TokenSecret::new("jwt-2"), Some(huge))
			.await
			.expect("Renew should succeed.")
			.expect("Renewed set should be present.");

		assert!(renewed.expires_at <= OffsetDateTime::now_utc() + MAX_ACCESS_TTL);
		assert!(renewed.expires_at > OffsetDateTime::now_utc() + Duration::days(364));
	}

	#[tokio::test]
	async fn expiry_past_the_calendar_end_is_an_error() {
		let backend = Arc::new(MemoryStore::default());
		let store = TokenStore::new(backend.clone());
		let err = store
			.set_at(&tokens(), None, macros::datetime!(9999-12-31 20:00 UTC))
			.await
			.expect_err("An unrepresentable expiry should be rejected.");

		assert!(matches!(err, StoreError::ExpiryOutOfRange { seconds: 36_000, .. }));
		assert!(backend.is_empty());
	}

	#[tokio::test]
	async fn failed_write_leaves_no_mixed_set_behind() {
		let inner = MemoryStore::default();
		let previous = TokenStore::new(Arc::new(inner.clone()));

		previous
			.set(&AuthTokens::new("access-old", "jwt-old", "refresh-old"), None)
			.await
			.expect("Seeding credentials should succeed.");

		let store = TokenStore::new(Arc::new(RejectingStore {
			inner: inner.clone(),
			rejected: CredentialKey::Jwt.as_str(),
		}));
		let err = store.set(&tokens(), None).await.expect_err("Rejected write should fail the set.");

		assert!(matches!(err, StoreError::Backend { .. }));
		assert!(inner.is_empty());
		assert!(store.get().await.expect("Get should succeed.").is_none());
	}
}
