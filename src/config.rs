//! Backend location and pipeline behavior.
//!
//! The backend origin is never compiled in; it comes from the builder or from
//! `KENYANPAD_API_BASE_URL` via [`ClientConfig::from_env`].

/// Builder API for assembling client configurations.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Versioned prefix prepended to every endpoint path.
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
/// Fixed overall deadline applied to each backend call.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(10);

/// Environment variable holding the backend origin.
pub const BASE_URL_ENV: &str = "KENYANPAD_API_BASE_URL";
/// Environment variable overriding [`DEFAULT_API_PREFIX`].
pub const API_PREFIX_ENV: &str = "KENYANPAD_API_PREFIX";
/// Environment variable overriding [`DEFAULT_TIMEOUT`], in whole seconds.
pub const TIMEOUT_ENV: &str = "KENYANPAD_TIMEOUT_SECS";
/// Environment variable selecting the [`RenewalMode`] (`independent` or `single-flight`).
pub const RENEWAL_MODE_ENV: &str = "KENYANPAD_RENEWAL_MODE";

/// How concurrent calls that all hit an authorization failure renew credentials.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenewalMode {
	/// Every failing call issues its own renewal; the last stored result wins.
	#[default]
	Independent,
	/// Renewals are serialized and a call reuses credentials renewed while it waited.
	SingleFlight,
}
impl FromStr for RenewalMode {
	type Err = ();

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.trim().to_ascii_lowercase().as_str() {
			"independent" => Ok(Self::Independent),
			"single-flight" | "single_flight" | "singleflight" => Ok(Self::SingleFlight),
			_ => Err(()),
		}
	}
}

/// Validated client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Backend origin (scheme, host, port, optional base path).
	pub base_url: Url,
	/// Normalized versioned prefix, always starting with `/` and never ending with one.
	pub api_prefix: String,
	/// Per-call deadline.
	pub timeout: StdDuration,
	/// Renewal behavior under concurrent authorization failures.
	pub renewal_mode: RenewalMode,
	/// Opaque `code` sent with the logout call, when the deployment requires one.
	pub logout_code: Option<TokenSecret>,
}
impl ClientConfig {
	/// Creates a new builder for the provided backend origin.
	pub fn builder(base_url: Url) -> ClientConfigBuilder {
		ClientConfigBuilder::new(base_url)
	}

	/// Loads the configuration from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Loads the configuration through an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let raw = lookup(BASE_URL_ENV)
			.filter(|value| !value.trim().is_empty())
			.ok_or(ConfigError::MissingEnv { name: BASE_URL_ENV })?;
		let base_url =
			Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl { source })?;
		let mut builder = Self::builder(base_url);

		if let Some(prefix) = lookup(API_PREFIX_ENV) {
			builder = builder.api_prefix(prefix);
		}
		if let Some(raw) = lookup(TIMEOUT_ENV) {
			let secs = raw
				.trim()
				.parse::<u64>()
				.map_err(|_| ConfigError::InvalidEnv { name: TIMEOUT_ENV, value: raw.clone() })?;

			builder = builder.timeout(StdDuration::from_secs(secs));
		}
		if let Some(raw) = lookup(RENEWAL_MODE_ENV) {
			let mode = raw.parse::<RenewalMode>().map_err(|_| ConfigError::InvalidEnv {
				name: RENEWAL_MODE_ENV,
				value: raw.clone(),
			})?;

			builder = builder.renewal_mode(mode);
		}

		builder.build()
	}

	/// Resolves an endpoint path (e.g. `/account/login`) against the origin and prefix.
	pub fn endpoint(&self, path: &str, query: &[(String, String)]) -> Url {
		let mut url = self.base_url.clone();
		let base_path = self.base_url.path().trim_end_matches('/');
		let path = path.trim_start_matches('/');

		url.set_path(&format!("{base_path}{}/{path}", self.api_prefix));

		if !query.is_empty() {
			url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
		}

		url
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config(base: &str) -> ClientConfig {
		ClientConfig::builder(Url::parse(base).expect("Fixture URL should parse."))
			.build()
			.expect("Fixture configuration should be valid.")
	}

	#[test]
	fn endpoint_joins_origin_prefix_and_path() {
		let config = config("http://backend.test:8013");

		assert_eq!(
			config.endpoint("/account/login", &[]).as_str(),
			"http://backend.test:8013/api/v1/account/login"
		);
	}

	#[test]
	fn endpoint_keeps_base_path_and_encodes_query() {
		let config = config("https://backend.test/kp/");
		let url = config.endpoint(
			"/account/institution/list-institution-donnees",
			&[("user_id".into(), "a b".into())],
		);

		assert_eq!(
			url.as_str(),
			"https://backend.test/kp/api/v1/account/institution/list-institution-donnees?user_id=a+b"
		);
	}

	#[test]
	fn from_lookup_reads_all_variables() {
		let config = ClientConfig::from_lookup(|name| match name {
			BASE_URL_ENV => Some("https://backend.test".into()),
			API_PREFIX_ENV => Some("api/v2/".into()),
			TIMEOUT_ENV => Some("25".into()),
			RENEWAL_MODE_ENV => Some("single-flight".into()),
			_ => None,
		})
		.expect("Environment configuration should load.");

		assert_eq!(config.api_prefix, "/api/v2");
		assert_eq!(config.timeout, StdDuration::from_secs(25));
		assert_eq!(config.renewal_mode, RenewalMode::SingleFlight);
	}

	#[test]
	fn from_lookup_requires_base_url() {
		let err = ClientConfig::from_lookup(|_| None).expect_err("Missing origin should fail.");

		assert!(matches!(err, ConfigError::MissingEnv { name: BASE_URL_ENV }));

		let err = ClientConfig::from_lookup(|name| match name {
			BASE_URL_ENV => Some("https://backend.test".into()),
			TIMEOUT_ENV => Some("soon".into()),
			_ => None,
		})
		.expect_err("Non-numeric timeout should fail.");

		assert!(matches!(err, ConfigError::InvalidEnv { name: TIMEOUT_ENV, .. }));
	}
}
