//! Demonstrates a staff session against a mock backend: sign in, hit an expired access token,
//! let the pipeline renew it, then page through donees and sign out.
//!
//! Run with `RUST_LOG=kenyanpad_client=debug` to watch the renewal.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use url::Url;
// self
use kenyanpad_client::{
	auth::TokenStore,
	config::ClientConfig,
	pipeline::{ApiClient, NavigationLog, Navigator},
	table::{SortKey, TableView},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
		)
		.init();

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/account/login");
			then.status(200).json_body(json!({
				"details": {
					"access_token": "demo-access",
					"refresh_token": "demo-refresh",
					"jwt_token": "demo-jwt",
					"expires_in": 36000,
					"token_type": "Bearer"
				}
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/account/user/profile");
			then.status(200).json_body(json!({
				"details": { "id": "u-1", "username": "staff", "name": "Demo Staff" }
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/account/staff/donnee")
				.header("authorization", "Bearer demo-access");
			then.status(401).json_body(json!({ "detail": "Token expired" }));
		})
		.await;

	let renewal = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/v1/auth/refresh")
				.json_body(json!({ "refresh_token": "demo-refresh" }));
			then.status(200).json_body(json!({
				"details": { "access_token": "renewed-access", "jwt_token": "renewed-jwt" }
			}));
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/account/staff/donnee")
				.header("authorization", "Bearer renewed-access");
			then.status(200).json_body(json!({
				"count": 2,
				"results": [
					{ "id": "d-1", "username": "wanjiru", "name": "Cate Wanjiru" },
					{ "id": "d-2", "username": "otieno", "name": "Amina Otieno" }
				]
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/account/logout");
			then.status(200);
		})
		.await;

	let navigation = NavigationLog::default();
	let navigator: Arc<dyn Navigator> = Arc::new(navigation.clone());
	let config = ClientConfig::builder(Url::parse(&server.base_url())?).build()?;
	let client = ApiClient::new(config, TokenStore::in_memory())?.with_navigator(navigator);
	let profile = client.sign_in("staff", "demo-password").await?;

	println!("Signed in as {} ({}).", profile.name, profile.username);

	let page = client.list_donees().await?;

	renewal.assert_async().await;

	let mut view = TableView::new(page.results);

	view.sort_by(SortKey::Name);

	for donee in view.current_page() {
		println!("{:<10} {}", donee.username, donee.name);
	}

	client.logout().await?;

	println!("Visited routes: {:?}.", navigation.routes());

	Ok(())
}
