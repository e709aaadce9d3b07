// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::{ClientConfig, DEFAULT_API_PREFIX, DEFAULT_TIMEOUT, RenewalMode},
	error::ConfigError,
};

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Backend origin.
	pub base_url: Url,
	/// Versioned prefix, normalized on build.
	pub api_prefix: String,
	/// Per-call deadline.
	pub timeout: StdDuration,
	/// Renewal behavior under concurrent authorization failures.
	pub renewal_mode: RenewalMode,
	/// Optional opaque logout code.
	pub logout_code: Option<TokenSecret>,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with the provided origin and defaults.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			api_prefix: DEFAULT_API_PREFIX.into(),
			timeout: DEFAULT_TIMEOUT,
			renewal_mode: RenewalMode::default(),
			logout_code: None,
		}
	}

	/// Overrides the versioned prefix (`/api/v1` by default).
	pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.api_prefix = prefix.into();

		self
	}

	/// Overrides the per-call deadline (10 seconds by default).
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Selects how concurrent renewals are coordinated.
	pub fn renewal_mode(mut self, mode: RenewalMode) -> Self {
		self.renewal_mode = mode;

		self
	}

	/// Sets the opaque code sent with the logout call.
	pub fn logout_code(mut self, code: impl Into<String>) -> Self {
		self.logout_code = Some(TokenSecret::new(code));

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let config = ClientConfig {
			api_prefix: normalize_prefix(&self.api_prefix),
			base_url: self.base_url,
			timeout: self.timeout,
			renewal_mode: self.renewal_mode,
			logout_code: self.logout_code.filter(|code| !code.is_blank()),
		};

		config.validate()?;

		Ok(config)
	}
}

impl ClientConfig {
	fn validate(&self) -> Result<(), ConfigError> {
		match self.base_url.scheme() {
			"http" | "https" => {},
			scheme => return Err(ConfigError::UnsupportedScheme { scheme: scheme.to_owned() }),
		}

		if self.base_url.query().is_some() || self.base_url.fragment().is_some() {
			return Err(ConfigError::BaseUrlHasQuery { url: self.base_url.to_string() });
		}
		if self.timeout.is_zero() {
			return Err(ConfigError::ZeroTimeout);
		}

		Ok(())
	}
}

fn normalize_prefix(raw: &str) -> String {
	let trimmed = raw.trim().trim_matches('/');

	if trimmed.is_empty() { String::new() } else { format!("/{trimmed}") }
}
