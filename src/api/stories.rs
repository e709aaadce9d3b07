//! Public institution stories.

// self
use crate::{
	_prelude::*,
	api::{Page, Story},
	http::{ApiRequest, HttpTransport},
	pipeline::ApiClient,
};

/// Story feed endpoint.
pub const STORIES_PATH: &str = "/account/user/user-stories";
/// Account type whose stories are published.
pub const STORY_USER_TYPE: &str = "INSTITUTION";

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists institution stories.
	pub async fn list_stories(&self) -> Result<Page<Story>> {
		self.send_json(ApiRequest::get(STORIES_PATH).query("user_type", STORY_USER_TYPE)).await
	}
}
