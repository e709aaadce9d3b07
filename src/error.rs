//! Client-level error types shared across the store, pipeline, session, and staff API.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Longest slice of a raw response body quoted in an error message.
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Backend answered with something the client could not interpret.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Input rejected before any network call.
	#[error(transparent)]
	Validation(#[from] ValidationError),

	/// Login exchange rejected the supplied username/password.
	#[error("Invalid username or password.")]
	InvalidCredentials,
	/// Request still failed authorization after the single allowed renewal.
	#[error("Request was not authorized: {detail}.")]
	Unauthorized {
		/// Backend-supplied detail, when present.
		detail: String,
	},
	/// No refresh credential is stored, so renewal cannot start.
	#[error("No refresh token is available for credential renewal.")]
	MissingRefreshToken,
	/// Renewal endpoint refused to issue new credentials.
	#[error("Credential renewal was rejected: {reason}.")]
	RenewalRejected {
		/// HTTP status returned by the renewal endpoint.
		status: u16,
		/// Backend-supplied detail, when present.
		reason: String,
	},
	/// Backend reported a structured failure; displays as the unwrapped detail.
	#[error("{detail}")]
	Backend {
		/// HTTP status code.
		status: u16,
		/// Unwrapped failure detail, or a truncated body when no detail field exists.
		detail: String,
	},
}
impl Error {
	/// Returns the HTTP status carried by backend-originated errors.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Backend { status, .. } | Self::RenewalRejected { status, .. } => Some(*status),
			Self::Unauthorized { .. } => Some(401),
			Self::Transient(TransientError::ResponseParse { status, .. }) => *status,
			_ => None,
		}
	}

	/// Builds a [`Error::Backend`] from a failed response, unwrapping the detail field.
	pub(crate) fn backend(status: u16, body: &[u8]) -> Self {
		Self::Backend { status, detail: failure_detail(status, body) }
	}
}

/// Configuration and validation failures raised while assembling the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL uses a scheme other than http/https.
	#[error("Base URL must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Rejected scheme.
		scheme: String,
	},
	/// Base URL carries a query or fragment that would leak into every endpoint.
	#[error("Base URL must not carry a query string or fragment: {url}.")]
	BaseUrlHasQuery {
		/// Offending URL.
		url: String,
	},
	/// Per-call deadline must be positive.
	#[error("Request timeout must be greater than zero.")]
	ZeroTimeout,
	/// Required environment variable is absent.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
	/// Environment variable holds an unusable value.
	#[error("Environment variable `{name}` has an invalid value `{value}`.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
		/// Raw value read from the environment.
		value: String,
	},
	/// Request payload could not be serialized.
	#[error("Request body could not be serialized.")]
	RequestBody(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Unexpected but non-fatal backend responses.
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Backend responded with JSON that does not match the expected shape.
	#[error("Backend returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure, including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures: network errors and the per-call deadline.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The fixed per-call deadline elapsed.
	#[error("Backend call timed out.")]
	Timeout,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

/// Form input rejected before any request is sent.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A required field was left blank.
	#[error("The `{field}` field is required.")]
	MissingField {
		/// Field name as sent to the backend.
		field: &'static str,
	},
	/// Upload submitted without a file.
	#[error("Please select a CSV file.")]
	MissingDocument,
	/// Selected file has no content.
	#[error("The selected file `{file_name}` is empty.")]
	EmptyDocument {
		/// Name of the rejected file.
		file_name: String,
	},
}

#[derive(Deserialize)]
struct FailureBody {
	#[serde(default)]
	detail: Option<serde_json::Value>,
	#[serde(default)]
	details: Option<serde_json::Value>,
	#[serde(default)]
	message: Option<serde_json::Value>,
}

/// Extracts the backend's failure detail (`detail`, then a string `details`, then `message`),
/// falling back to a truncated body or the status line.
pub(crate) fn failure_detail(status: u16, body: &[u8]) -> String {
	if let Ok(parsed) = serde_json::from_slice::<FailureBody>(body) {
		let detail = [parsed.detail, parsed.details, parsed.message]
			.into_iter()
			.flatten()
			.find_map(|value| match value {
				serde_json::Value::String(text) if !text.trim().is_empty() => Some(text),
				_ => None,
			});

		if let Some(detail) = detail {
			return detail;
		}
	}

	let text = String::from_utf8_lossy(body);
	let text = text.trim();

	if text.is_empty() { format!("Backend responded with status {status}") } else { truncate(text) }
}

fn truncate(body: &str) -> String {
	if body.len() <= MAX_ERROR_BODY_LENGTH {
		return body.to_owned();
	}

	let mut cut = MAX_ERROR_BODY_LENGTH;

	while !body.is_char_boundary(cut) {
		cut -= 1;
	}

	format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
}
