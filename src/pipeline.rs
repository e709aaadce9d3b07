//! Authenticated request pipeline.
//!
//! [`ApiClient::send`] attaches the stored credential pair to a call, and when the backend
//! answers `401` on a call that has not been retried yet it renews the credentials once with the
//! stored refresh token and replays the call once with the new headers. A renewal failure clears
//! the store, sends the navigator to the login route, and returns the renewal error. A replayed
//! call is terminal whatever its outcome.

mod attempt;
mod navigator;
mod renewal;

pub use attempt::*;
pub use navigator::*;
pub use renewal::RenewalMetrics;

// self
use crate::{
	_prelude::*,
	auth::{CredentialSet, TokenStore},
	config::ClientConfig,
	error::failure_detail,
	http::{ApiRequest, ApiResponse, HttpTransport, OutboundRequest},
	obs::{self, CallKind},
	route::LOGIN_ROUTE,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Backend client that owns the transport, the injected credential store, and the navigator.
///
/// Cloning is cheap; clones share the transport, store, navigator, renewal counters, and the
/// single-flight guard.
pub struct ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for every outbound call.
	pub transport: Arc<T>,
	/// Injected credential store.
	pub tokens: TokenStore,
	/// Backend location and pipeline behavior.
	pub config: ClientConfig,
	/// Receives forced redirects to the login route.
	pub navigator: Arc<dyn Navigator>,
	/// Shared counters for renewal outcomes.
	pub renewal_metrics: Arc<RenewalMetrics>,
	renewal_guard: Arc<AsyncMutex<()>>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client around a caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		tokens: TokenStore,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			tokens,
			config,
			navigator: Arc::new(TracingNavigator),
			renewal_metrics: Default::default(),
			renewal_guard: Arc::new(AsyncMutex::new(())),
		}
	}

	/// Replaces the navigator that receives forced login redirects.
	pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
		self.navigator = navigator;

		self
	}

	/// Sends an authenticated call, renewing credentials and replaying it at most once.
	///
	/// 2xx responses are returned as-is. Any other terminal status becomes an error: `401` maps
	/// to [`Error::Unauthorized`], everything else to [`Error::Backend`] with the unwrapped
	/// failure detail.
	pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		obs::observe(CallKind::Api, "send", self.send_attempt(&request, Attempt::first())).await
	}

	/// Sends an authenticated call and decodes the JSON body.
	pub async fn send_json<R>(&self, request: ApiRequest) -> Result<R>
	where
		R: DeserializeOwned,
	{
		self.send(request).await?.json()
	}

	async fn send_attempt(&self, request: &ApiRequest, attempt: Attempt) -> Result<ApiResponse> {
		let credentials = self.tokens.get().await?;
		let state =
			if credentials.is_some() { CallState::Attached } else { CallState::Unauthenticated };

		tracing::debug!(%state, method = %request.method, path = %request.path, "Dispatching call.");

		let response = self.dispatch(request, credentials.as_ref()).await?;

		if !response.is_unauthorized() {
			return Self::terminal(response);
		}

		let Some(retry) = attempt.retry() else {
			tracing::debug!(state = %CallState::Terminal, "Replayed call failed authorization again.");

			return Self::terminal(response);
		};

		tracing::debug!(
			state = %CallState::AuthorizationFailed,
			path = %request.path,
			"Renewing credentials."
		);

		let stale = credentials.as_ref().map(|set| &set.access_token);
		let renewed = match self.renew(stale).await {
			Ok(renewed) => renewed,
			Err(e) => {
				self.abandon_session().await;

				return Err(e);
			},
		};

		tracing::debug!(
			state = %CallState::Renewing,
			retried = retry.has_retried(),
			"Replaying call with renewed credentials."
		);

		let replayed = self.dispatch(request, Some(&renewed)).await?;

		Self::terminal(replayed)
	}

	/// Resolves and sends one request without any authorization-failure handling.
	pub(crate) async fn dispatch(
		&self,
		request: &ApiRequest,
		credentials: Option<&CredentialSet>,
	) -> Result<ApiResponse> {
		let outbound = OutboundRequest {
			method: request.method,
			url: self.config.endpoint(&request.path, &request.query),
			headers: credentials.map(|set| set.headers().to_vec()).unwrap_or_default(),
			body: request.body.clone(),
		};

		Ok(self.transport.execute(outbound).await?)
	}

	/// Clears stored credentials and forces the login redirect.
	pub(crate) async fn abandon_session(&self) {
		if let Err(e) = self.tokens.clear().await {
			tracing::warn!(error = %e, "Failed to clear credentials after renewal failure.");
		}

		tracing::warn!(route = LOGIN_ROUTE, "Session abandoned; redirecting to login.");
		self.navigator.navigate(LOGIN_ROUTE);
	}

	fn terminal(response: ApiResponse) -> Result<ApiResponse> {
		if response.is_success() {
			Ok(response)
		} else if response.is_unauthorized() {
			Err(Error::Unauthorized { detail: failure_detail(response.status, &response.body) })
		} else {
			Err(Error::backend(response.status, &response.body))
		}
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a client with its own reqwest transport bound to the configured deadline.
	pub fn new(config: ClientConfig, tokens: TokenStore) -> Result<Self> {
		let transport = ReqwestTransport::with_timeout(config.timeout)?;

		Ok(Self::with_transport(config, tokens, transport))
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			tokens: self.tokens.clone(),
			config: self.config.clone(),
			navigator: self.navigator.clone(),
			renewal_metrics: self.renewal_metrics.clone(),
			renewal_guard: self.renewal_guard.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("config", &self.config)
			.field("tokens", &self.tokens)
			.field("renewal_metrics", &self.renewal_metrics)
			.finish()
	}
}
