//! The three-token credential set and the header names it is presented under.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Header carrying the primary access credential.
pub const AUTHORIZATION_HEADER: &str = "Authorization";
/// Header carrying the secondary credential; the backend requires it next to `Authorization`.
pub const JWT_AUTH_HEADER: &str = "JWTAUTH";

/// Lifetime applied to the access and secondary credentials when none is supplied.
pub const DEFAULT_ACCESS_TTL: Duration = Duration::seconds(36_000);
/// Lifetime applied to the refresh credential.
pub const DEFAULT_REFRESH_TTL: Duration = Duration::days(7);
/// Longest lifetime the access and secondary credentials are stored with; longer ones are clamped.
pub const MAX_ACCESS_TTL: Duration = Duration::days(365);

/// Storage slot of one credential.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CredentialKey {
	/// Primary access credential.
	Access,
	/// Secondary `JWTAUTH` credential.
	Jwt,
	/// Long-lived refresh credential.
	Refresh,
}
impl CredentialKey {
	/// Every slot, in write order.
	pub const ALL: [Self; 3] = [Self::Access, Self::Jwt, Self::Refresh];

	/// Returns the persisted key name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Access => "access_token",
			Self::Jwt => "jwt_token",
			Self::Refresh => "refresh_token",
		}
	}
}
impl Display for CredentialKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Freshly issued tokens, before any expiry is attached.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthTokens {
	/// Primary access credential.
	pub access_token: TokenSecret,
	/// Secondary `JWTAUTH` credential.
	pub jwt_token: TokenSecret,
	/// Refresh credential.
	pub refresh_token: TokenSecret,
}
impl AuthTokens {
	/// Bundles the three tokens.
	pub fn new(
		access_token: impl Into<String>,
		jwt_token: impl Into<String>,
		refresh_token: impl Into<String>,
	) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			jwt_token: TokenSecret::new(jwt_token),
			refresh_token: TokenSecret::new(refresh_token),
		}
	}

	pub(crate) fn secret(&self, key: CredentialKey) -> &TokenSecret {
		match key {
			CredentialKey::Access => &self.access_token,
			CredentialKey::Jwt => &self.jwt_token,
			CredentialKey::Refresh => &self.refresh_token,
		}
	}
}
impl Debug for AuthTokens {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthTokens")
			.field("access_token", &"<redacted>")
			.field("jwt_token", &"<redacted>")
			.field("refresh_token", &"<redacted>")
			.finish()
	}
}

/// A complete, unexpired credential set as read back from the store.
///
/// Only [`TokenStore::get`](crate::auth::TokenStore::get) produces values of this type, and it
/// never returns a partial set.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSet {
	/// Primary access credential.
	pub access_token: TokenSecret,
	/// Secondary `JWTAUTH` credential.
	pub jwt_token: TokenSecret,
	/// Refresh credential.
	pub refresh_token: TokenSecret,
	/// Earliest expiry of the access and secondary entries.
	pub expires_at: OffsetDateTime,
	/// Expiry of the refresh entry.
	pub refresh_expires_at: OffsetDateTime,
}
impl CredentialSet {
	/// Returns the two header pairs every authenticated call carries.
	pub fn headers(&self) -> [(&'static str, String); 2] {
		[
			(AUTHORIZATION_HEADER, self.access_token.bearer()),
			(JWT_AUTH_HEADER, self.jwt_token.bearer()),
		]
	}

	/// Returns the bare tokens without expiry information.
	pub fn tokens(&self) -> AuthTokens {
		AuthTokens {
			access_token: self.access_token.clone(),
			jwt_token: self.jwt_token.clone(),
			refresh_token: self.refresh_token.clone(),
		}
	}
}
impl Debug for CredentialSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialSet")
			.field("access_token", &"<redacted>")
			.field("jwt_token", &"<redacted>")
			.field("refresh_token", &"<redacted>")
			.field("expires_at", &self.expires_at)
			.field("refresh_expires_at", &self.refresh_expires_at)
			.finish()
	}
}
