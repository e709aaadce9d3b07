//! Transport primitives for backend calls.
//!
//! [`ApiRequest`] is the owned, cloneable description of a call relative to the API prefix; the
//! pipeline keeps it around so a call that failed authorization can be replayed verbatim.
//! [`HttpTransport`] is the client's only dependency on an HTTP stack: the pipeline resolves a
//! request into an [`OutboundRequest`] (absolute URL plus credential headers) and hands it to the
//! transport, which returns the raw [`ApiResponse`] whatever its status.

// self
use crate::{_prelude::*, error::{ConfigError, TransientError, TransportError}};

/// Status the backend uses for expired or invalid credentials.
pub const UNAUTHORIZED: u16 = 401;

/// Boxed future returned by [`HttpTransport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks able to execute backend calls.
///
/// Implementations must return every HTTP response, including 4xx/5xx, as `Ok`; only failures to
/// obtain a response (DNS, connect, TLS, deadline) are errors.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends the request and collects the full response body.
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_>;
}

/// HTTP verbs used by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
}
impl Method {
	/// Returns the canonical verb.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Request payload.
#[derive(Clone, Debug, Default)]
pub enum RequestBody {
	/// No body.
	#[default]
	Empty,
	/// JSON document.
	Json(serde_json::Value),
	/// `multipart/form-data` payload.
	Multipart(MultipartForm),
}

/// Owned multipart form so a request stays replayable.
#[derive(Clone, Debug, Default)]
pub struct MultipartForm {
	/// Parts in submission order.
	pub parts: Vec<FormPart>,
}
impl MultipartForm {
	/// Appends a text field.
	pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.parts.push(FormPart::Text { name: name.into(), value: value.into() });

		self
	}

	/// Appends a file field.
	pub fn file(
		mut self,
		name: impl Into<String>,
		file_name: impl Into<String>,
		content_type: impl Into<String>,
		bytes: Vec<u8>,
	) -> Self {
		self.parts.push(FormPart::File {
			name: name.into(),
			file_name: file_name.into(),
			content_type: content_type.into(),
			bytes,
		});

		self
	}
}

/// One multipart field.
#[derive(Clone)]
pub enum FormPart {
	/// Plain text field.
	Text {
		/// Field name.
		name: String,
		/// Field value.
		value: String,
	},
	/// File field.
	File {
		/// Field name.
		name: String,
		/// Client-side file name.
		file_name: String,
		/// MIME type.
		content_type: String,
		/// File contents.
		bytes: Vec<u8>,
	},
}
impl Debug for FormPart {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Text { name, value } =>
				f.debug_struct("Text").field("name", name).field("value", value).finish(),
			Self::File { name, file_name, content_type, bytes } => f
				.debug_struct("File")
				.field("name", name)
				.field("file_name", file_name)
				.field("content_type", content_type)
				.field("len", &bytes.len())
				.finish(),
		}
	}
}

/// A backend call relative to the configured API prefix.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP verb.
	pub method: Method,
	/// Path below the API prefix, e.g. `/account/institution`.
	pub path: String,
	/// Query parameters, encoded on dispatch.
	pub query: Vec<(String, String)>,
	/// Payload.
	pub body: RequestBody,
}
impl ApiRequest {
	/// Creates a request with no query and no body.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self { method, path: path.into(), query: Vec::new(), body: RequestBody::Empty }
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::Get, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::Post, path)
	}

	/// Appends a query parameter.
	pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((name.into(), value.into()));

		self
	}

	/// Serializes `payload` as the JSON body.
	pub fn json<T>(mut self, payload: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		self.body = RequestBody::Json(serde_json::to_value(payload)?);

		Ok(self)
	}

	/// Uses `form` as a multipart body.
	pub fn multipart(mut self, form: MultipartForm) -> Self {
		self.body = RequestBody::Multipart(form);

		self
	}
}

/// Fully resolved request handed to a transport.
#[derive(Clone)]
pub struct OutboundRequest {
	/// HTTP verb.
	pub method: Method,
	/// Absolute URL including query.
	pub url: Url,
	/// Extra headers (credential headers when attached).
	pub headers: Vec<(&'static str, String)>,
	/// Payload.
	pub body: RequestBody,
}
impl OutboundRequest {
	/// Returns the first header value with a case-insensitive name match.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}
impl Debug for OutboundRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let header_names: Vec<_> = self.headers.iter().map(|(name, _)| *name).collect();

		f.debug_struct("OutboundRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &header_names)
			.field("body", &self.body)
			.finish()
	}
}

/// Raw backend response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Creates a response from its parts.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns `true` for the authorization-failure status.
	pub fn is_unauthorized(&self) -> bool {
		self.status == UNAUTHORIZED
	}

	/// Decodes the body, reporting the JSON path of any mismatch.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de).map_err(|source| {
			TransientError::ResponseParse { source, status: Some(self.status) }.into()
		})
	}
}

/// Reqwest-backed transport. Clones share one connection pool.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose every call fails after `timeout`.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).build()?;

		Ok(Self(client))
	}

	fn method(method: Method) -> reqwest::Method {
		match method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
		}
	}

	fn multipart(form: MultipartForm) -> Result<reqwest::multipart::Form, TransportError> {
		let mut out = reqwest::multipart::Form::new();

		for part in form.parts {
			out = match part {
				FormPart::Text { name, value } => out.text(name, value),
				FormPart::File { name, file_name, content_type, bytes } => {
					let part = reqwest::multipart::Part::bytes(bytes)
						.file_name(file_name)
						.mime_str(&content_type)?;

					out.part(name, part)
				},
			};
		}

		Ok(out)
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn execute(&self, request: OutboundRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let mut builder = self.0.request(Self::method(request.method), request.url);

			for (name, value) in request.headers {
				builder = builder.header(name, value);
			}

			builder = match request.body {
				RequestBody::Empty => builder,
				RequestBody::Json(value) => builder.json(&value),
				RequestBody::Multipart(form) => builder.multipart(Self::multipart(form)?),
			};

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Details {
		#[allow(dead_code)]
		id: String,
	}

	#[test]
	fn json_errors_report_the_failing_path() {
		let response = ApiResponse::new(200, r#"{"details":{"id":7}}"#);
		let err = response
			.json::<HashMap<String, Details>>()
			.expect_err("A numeric id should not decode into a string.");

		match err {
			Error::Transient(TransientError::ResponseParse { source, status }) => {
				assert_eq!(status, Some(200));
				assert_eq!(source.path().to_string(), "details.id");
			},
			other => panic!("Unexpected error: {other:?}"),
		}
	}

	#[test]
	fn request_builders_accumulate_query_and_body() {
		let request = ApiRequest::get("/account/user/user-stories")
			.query("user_type", "INSTITUTION")
			.json(&serde_json::json!({ "search": "kisumu" }))
			.expect("JSON body should serialize.");

		assert_eq!(request.method, Method::Get);
		assert_eq!(request.query, vec![("user_type".to_owned(), "INSTITUTION".to_owned())]);
		assert!(matches!(request.body, RequestBody::Json(_)));
	}

	#[test]
	fn outbound_debug_hides_header_values() {
		let request = OutboundRequest {
			method: Method::Get,
			url: Url::parse("https://backend.test/api/v1/account/user/profile")
				.expect("Fixture URL should parse."),
			headers: vec![("Authorization", "Bearer secret".into())],
			body: RequestBody::Empty,
		};

		assert_eq!(request.header("authorization"), Some("Bearer secret"));
		assert!(!format!("{request:?}").contains("secret"));
	}
}
