//! Staff-dashboard client for the KenyanPad donation platform: a persisted three-token credential
//! store, an authenticated request pipeline that renews once and retries once, and typed calls for
//! institutions, donees, donors, and public stories.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod pipeline;
pub mod route;
pub mod session;
pub mod store;
pub mod table;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers shared by the integration tests and demos.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::TokenStore,
		config::{ClientConfig, RenewalMode},
		http::ReqwestTransport,
		pipeline::{ApiClient, NavigationLog, Navigator},
		store::{KeyValueStore, MemoryStore},
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = ApiClient<ReqwestTransport>;

	/// Builds a [`ClientConfig`] rooted at a mock server's base URL.
	pub fn test_config(base_url: &str, mode: RenewalMode) -> ClientConfig {
		let base = Url::parse(base_url).expect("Mock server base URL should parse.");

		ClientConfig::builder(base)
			.api_prefix("/api/v1")
			.renewal_mode(mode)
			.build()
			.expect("Test client configuration should be valid.")
	}

	/// Constructs an [`ApiClient`] backed by an in-memory store and a navigation log so tests can
	/// inspect stored credentials and forced redirects.
	pub fn build_reqwest_test_client(
		base_url: &str,
		mode: RenewalMode,
	) -> (ReqwestTestClient, Arc<MemoryStore>, NavigationLog) {
		let backend = Arc::new(MemoryStore::default());
		let (client, navigation) =
			build_reqwest_test_client_with(test_config(base_url, mode), backend.clone());

		(client, backend, navigation)
	}

	/// Constructs an [`ApiClient`] from an explicit configuration and persistence backend.
	pub fn build_reqwest_test_client_with(
		config: ClientConfig,
		store: Arc<dyn KeyValueStore>,
	) -> (ReqwestTestClient, NavigationLog) {
		let navigation = NavigationLog::default();
		let navigator: Arc<dyn Navigator> = Arc::new(navigation.clone());
		let client = ApiClient::new(config, TokenStore::new(store))
			.expect("Reqwest test client should build.")
			.with_navigator(navigator);

		(client, navigation)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tracing_subscriber as _};
