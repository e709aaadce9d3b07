//! Donee listing, single registration, and bulk CSV upload.

// self
use crate::{
	_prelude::*,
	api::{ApiResponseBody, Donee, DoneeUpload, NewDonee, Page, form},
	error::ValidationError,
	http::{ApiRequest, HttpTransport, MultipartForm},
	pipeline::ApiClient,
};

/// Staff view of all donees.
pub const DONEES_PATH: &str = "/account/staff/donnee";
/// Registration endpoint shared by single and bulk creation.
pub const CREATE_DONEES_PATH: &str = "/account/institution/create-donnees";
/// Header row a bulk upload document is expected to start with.
pub const DONEE_CSV_HEADER: &str = "user,name,username,completion_date";
/// MIME type sent with bulk upload documents.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Lists every donee visible to staff.
	pub async fn list_donees(&self) -> Result<Page<Donee>> {
		self.send_json(ApiRequest::get(DONEES_PATH)).await
	}

	/// Registers one donee under an institution.
	pub async fn create_donee(&self, donee: &NewDonee) -> Result<ApiResponseBody> {
		form::require_all(&[
			("user", donee.user.as_str()),
			("name", donee.name.as_str()),
			("username", donee.username.as_str()),
			("completion_date", donee.completion_date.as_str()),
		])?;

		let request = ApiRequest::post(CREATE_DONEES_PATH).json(donee)?;

		self.send_json(request).await
	}

	/// Uploads a CSV of donees as `multipart/form-data` with `institution` and `document` fields.
	pub async fn upload_donees(&self, upload: &DoneeUpload) -> Result<ApiResponseBody> {
		let form = upload_form(upload)?;

		self.send_json(ApiRequest::post(CREATE_DONEES_PATH).multipart(form)).await
	}
}

fn upload_form(upload: &DoneeUpload) -> Result<MultipartForm, ValidationError> {
	form::require("institution", &upload.institution)?;

	let document = upload.document.as_ref().ok_or(ValidationError::MissingDocument)?;

	if document.bytes.is_empty() {
		return Err(ValidationError::EmptyDocument { file_name: document.file_name.clone() });
	}

	Ok(MultipartForm::default()
		.file("document", &document.file_name, CSV_CONTENT_TYPE, document.bytes.clone())
		.text("institution", upload.institution.trim()))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{api::UploadDocument, http::FormPart};

	#[test]
	fn upload_requires_a_non_empty_document() {
		let mut upload = DoneeUpload { institution: "inst-1".into(), document: None };

		assert_eq!(upload_form(&upload).expect_err("Missing file."), ValidationError::MissingDocument);

		upload.document = Some(UploadDocument::new("donees.csv", Vec::new()));

		assert_eq!(
			upload_form(&upload).expect_err("Empty file."),
			ValidationError::EmptyDocument { file_name: "donees.csv".into() }
		);

		upload.institution = " ".into();

		assert_eq!(
			upload_form(&upload).expect_err("Missing institution."),
			ValidationError::MissingField { field: "institution" }
		);
	}

	#[test]
	fn upload_form_carries_document_and_institution() {
		let upload = DoneeUpload {
			institution: "inst-1".into(),
			document: Some(UploadDocument::new("donees.csv", DONEE_CSV_HEADER.as_bytes())),
		};
		let form = upload_form(&upload).expect("Upload should validate.");
		let names: Vec<_> = form
			.parts
			.iter()
			.map(|part| match part {
				FormPart::Text { name, .. } | FormPart::File { name, .. } => name.as_str(),
			})
			.collect();

		assert_eq!(names, ["document", "institution"]);
	}
}
