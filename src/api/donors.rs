//! Donor accounts.

// self
use crate::{
	_prelude::*,
	api::{Donor, Page},
	http::{ApiRequest, HttpTransport},
	pipeline::ApiClient,
};

/// Staff view of all donors.
pub const DONORS_PATH: &str = "/account/staff/donor";

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists every donor visible to staff.
	pub async fn list_donors(&self) -> Result<Page<Donor>> {
		self.send_json(ApiRequest::get(DONORS_PATH)).await
	}
}
