//! Credential renewal with the stored refresh token.
//!
//! In [`RenewalMode::Independent`] every failing call renews on its own and the last stored
//! result wins. In [`RenewalMode::SingleFlight`] renewals queue behind one async mutex, and a
//! call that acquires it after another call already replaced the stale access credential reuses
//! the stored set instead of hitting the renewal endpoint again.

mod metrics;

pub use metrics::RenewalMetrics;

// self
use crate::{
	_prelude::*,
	api::Details,
	auth::{CredentialSet, TokenSecret},
	config::RenewalMode,
	error::failure_detail,
	http::{ApiRequest, HttpTransport},
	obs::{self, CallKind},
	pipeline::ApiClient,
	session::TokenDetails,
};

/// Path of the renewal endpoint below the API prefix.
pub const RENEWAL_PATH: &str = "/auth/refresh";

#[derive(Serialize)]
struct RenewalBody<'a> {
	refresh_token: &'a str,
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Renews the access pair, returning the set the replayed call must carry.
	///
	/// `stale` is the access credential the failing call was dispatched with, if any.
	pub(crate) async fn renew(&self, stale: Option<&TokenSecret>) -> Result<CredentialSet> {
		obs::observe(CallKind::Renewal, "renew", async move {
			self.renewal_metrics.record_attempt();

			let result = match self.config.renewal_mode {
				RenewalMode::Independent => self.renew_once().await,
				RenewalMode::SingleFlight => {
					let _singleflight = self.renewal_guard.lock().await;

					match self.renewed_elsewhere(stale).await {
						Ok(Some(current)) => {
							self.renewal_metrics.record_reuse();
							tracing::debug!("Reusing credentials renewed by a concurrent call.");

							return Ok(current);
						},
						Ok(None) => self.renew_once().await,
						Err(e) => Err(e),
					}
				},
			};

			match &result {
				Ok(_) => self.renewal_metrics.record_success(),
				Err(e) => {
					self.renewal_metrics.record_failure();
					tracing::warn!(error = %e, "Credential renewal failed.");
				},
			}

			result
		})
		.await
	}

	async fn renewed_elsewhere(&self, stale: Option<&TokenSecret>) -> Result<Option<CredentialSet>> {
		let Some(stale) = stale else {
			return Ok(None);
		};
		let current = self.tokens.get().await?;

		Ok(current.filter(|set| set.access_token.expose() != stale.expose()))
	}

	async fn renew_once(&self) -> Result<CredentialSet> {
		let refresh_token = self.tokens.refresh_token().await?.ok_or(Error::MissingRefreshToken)?;
		let request = ApiRequest::post(RENEWAL_PATH)
			.json(&RenewalBody { refresh_token: refresh_token.expose() })?;
		let response = self.dispatch(&request, None).await?;

		if !response.is_success() {
			return Err(Error::RenewalRejected {
				status: response.status,
				reason: failure_detail(response.status, &response.body),
			});
		}

		let Details { details } = response.json::<Details<TokenDetails>>()?;
		let ttl = details.ttl();

		self.tokens
			.renew(&details.access_token, &details.jwt_token, ttl)
			.await?
			.ok_or(Error::MissingRefreshToken)
	}
}
