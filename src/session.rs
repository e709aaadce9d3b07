//! Sign-in, sign-out, and profile operations.
//!
//! The login exchange is the only call that goes out without credentials and without the renewal
//! path; everything else runs through the authenticated pipeline. Logout is best-effort: the
//! stored credentials are cleared and the navigator is sent to the login route whatever the
//! backend answers.

// self
use crate::{
	_prelude::*,
	api::{Details, UserProfile, form},
	auth::{AuthTokens, TokenSecret},
	http::{ApiRequest, HttpTransport, RequestBody},
	obs::{self, CallKind},
	pipeline::ApiClient,
	route::{DASHBOARD_ROUTE, LOGIN_ROUTE},
};

/// Username/password exchange.
pub const LOGIN_PATH: &str = "/account/login";
/// Session teardown.
pub const LOGOUT_PATH: &str = "/account/logout";
/// Current user's profile.
pub const PROFILE_PATH: &str = "/account/user/profile";

/// Credentials issued by the login and renewal endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenDetails {
	/// Primary access credential.
	pub access_token: TokenSecret,
	/// Secondary `JWTAUTH` credential.
	pub jwt_token: TokenSecret,
	/// Refresh credential; renewal responses may omit it since it is not rotated.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
	/// Lifetime of the access pair in seconds.
	#[serde(default)]
	pub expires_in: Option<i64>,
	/// Token scheme reported by the backend.
	#[serde(default)]
	pub token_type: Option<String>,
}
impl TokenDetails {
	/// Lifetime to store the access pair with; `None` selects the store default.
	pub fn ttl(&self) -> Option<Duration> {
		self.expires_in.filter(|secs| *secs > 0).map(Duration::seconds)
	}
}

#[derive(Serialize)]
struct LoginBody<'a> {
	username: &'a str,
	password: &'a str,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Exchanges a username and password for credentials and stores them.
	///
	/// Blank input is rejected before any call. Any non-2xx answer is reported as
	/// [`Error::InvalidCredentials`].
	pub async fn login(&self, username: &str, password: &str) -> Result<TokenDetails> {
		obs::observe(CallKind::Login, "login", async move {
			form::require_all(&[("username", username), ("password", password)])?;

			let request = ApiRequest::post(LOGIN_PATH).json(&LoginBody { username, password })?;
			let response = self.dispatch(&request, None).await?;

			if !response.is_success() {
				tracing::warn!(status = response.status, "Login rejected.");

				return Err(Error::InvalidCredentials);
			}

			let Details { details } = response.json::<Details<TokenDetails>>()?;
			let refresh_token = details.refresh_token.clone().ok_or(Error::MissingRefreshToken)?;
			let tokens = AuthTokens {
				access_token: details.access_token.clone(),
				jwt_token: details.jwt_token.clone(),
				refresh_token,
			};
			let stored = self.tokens.set(&tokens, details.ttl()).await?;

			tracing::info!(expires_at = %stored.expires_at, "Signed in.");

			Ok(details)
		})
		.await
	}

	/// Logs in, loads the profile, and moves the navigator to the dashboard.
	pub async fn sign_in(&self, username: &str, password: &str) -> Result<UserProfile> {
		self.login(username, password).await?;

		let profile = self.profile().await?;

		self.navigator.navigate(DASHBOARD_ROUTE);

		Ok(profile)
	}

	/// Ends the session.
	///
	/// The backend call is best-effort and its failures are only logged. Only a failure to clear
	/// the store is returned, and the redirect happens even then.
	pub async fn logout(&self) -> Result<()> {
		obs::observe(CallKind::Logout, "logout", async move {
			let credentials = self.tokens.get().await.unwrap_or_else(|e| {
				tracing::warn!(error = %e, "Failed to read credentials for logout.");

				None
			});
			let mut request = ApiRequest::post(LOGOUT_PATH);

			if let Some(code) = &self.config.logout_code {
				request.body = RequestBody::Json(serde_json::json!({ "code": code.expose() }));
			}

			match self.dispatch(&request, credentials.as_ref()).await {
				Ok(response) if response.is_success() => tracing::debug!("Backend session closed."),
				Ok(response) => tracing::warn!(status = response.status, "Logout call failed."),
				Err(e) => tracing::warn!(error = %e, "Logout call failed."),
			}

			let cleared = self.tokens.clear().await;

			self.navigator.navigate(LOGIN_ROUTE);

			Ok(cleared?)
		})
		.await
	}

	/// Fetches the signed-in user's profile.
	pub async fn profile(&self) -> Result<UserProfile> {
		obs::observe(CallKind::Profile, "profile", async move {
			let Details { details } = self.send_json(ApiRequest::get(PROFILE_PATH)).await?;

			Ok(details)
		})
		.await
	}

	/// Re-establishes a session from stored credentials.
	///
	/// Returns `Ok(None)` and redirects to login when nothing valid is stored. When the profile
	/// cannot be loaded the store is cleared, the navigator is sent to login, and the error is
	/// returned.
	pub async fn restore(&self) -> Result<Option<UserProfile>> {
		if !self.tokens.is_authenticated().await? {
			self.navigator.navigate(LOGIN_ROUTE);

			return Ok(None);
		}

		match self.profile().await {
			Ok(profile) => Ok(Some(profile)),
			Err(e) => {
				tracing::warn!(error = %e, "Failed to restore session.");
				self.abandon_session().await;

				Err(e)
			},
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn ttl_ignores_missing_and_non_positive_lifetimes() {
		let mut details: TokenDetails = serde_json::from_str(
			r#"{"access_token":"a","jwt_token":"j","refresh_token":"r","expires_in":3600}"#,
		)
		.expect("Token details should decode.");

		assert_eq!(details.ttl(), Some(Duration::hours(1)));

		details.expires_in = Some(0);

		assert_eq!(details.ttl(), None);

		details.expires_in = None;

		assert_eq!(details.ttl(), None);
	}

	#[test]
	fn renewal_payload_may_omit_refresh_token() {
		let details: TokenDetails =
			serde_json::from_str(r#"{"access_token":"a","jwt_token":"j","token_type":"Bearer"}"#)
				.expect("Renewal details should decode.");

		assert!(details.refresh_token.is_none());
		assert_eq!(details.token_type.as_deref(), Some("Bearer"));
	}
}
