//! Institution accounts.

// self
use crate::{
	_prelude::*,
	api::{ApiResponseBody, Details, Donee, Institution, NewInstitution, Page, form},
	http::{ApiRequest, HttpTransport},
	pipeline::ApiClient,
};

/// Collection path for institutions.
pub const INSTITUTIONS_PATH: &str = "/account/institution";
/// Donees registered under one institution, selected with `user_id`.
pub const INSTITUTION_DONEES_PATH: &str = "/account/institution/list-institution-donnees";

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists institutions.
	pub async fn list_institutions(&self) -> Result<Page<Institution>> {
		self.send_json(ApiRequest::get(INSTITUTIONS_PATH)).await
	}

	/// Fetches one institution.
	pub async fn institution(&self, id: &str) -> Result<Institution> {
		form::require("id", id)?;

		let Details { details } =
			self.send_json(ApiRequest::get(format!("{INSTITUTIONS_PATH}/{}", id.trim()))).await?;

		Ok(details)
	}

	/// Creates an institution; every contact field is required, the story is optional.
	pub async fn create_institution(&self, institution: &NewInstitution) -> Result<ApiResponseBody> {
		form::require_all(&[
			("name", institution.name.as_str()),
			("username", institution.username.as_str()),
			("postal_address", institution.postal_address.as_str()),
			("zip_code", institution.zip_code.as_str()),
			("physical_address", institution.physical_address.as_str()),
			("phone_number", institution.phone_number.as_str()),
		])?;

		let request = ApiRequest::post(INSTITUTIONS_PATH).json(institution)?;

		self.send_json(request).await
	}

	/// Lists the donees registered under an institution.
	pub async fn institution_donees(&self, id: &str) -> Result<Page<Donee>> {
		form::require("user_id", id)?;

		self.send_json(ApiRequest::get(INSTITUTION_DONEES_PATH).query("user_id", id.trim())).await
	}
}
