//! Wire records exchanged with the backend.

// self
use crate::_prelude::*;

/// Envelope used by single-record responses: `{"details": ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Details<T> {
	/// Wrapped record.
	pub details: T,
}

/// Paginated envelope used by list endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
	/// Total number of records across all pages.
	#[serde(default)]
	pub count: u64,
	/// URL of the next page.
	#[serde(default)]
	pub next: Option<String>,
	/// URL of the previous page.
	#[serde(default)]
	pub previous: Option<String>,
	/// Records on this page.
	#[serde(default = "Vec::new")]
	pub results: Vec<T>,
}

/// Untyped JSON returned by create calls, whose shape the backend does not fix.
pub type ApiResponseBody = serde_json::Value;

/// Profile of the signed-in user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
	/// User identifier.
	pub id: String,
	/// Login name.
	pub username: String,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Fields this client does not model.
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Contact and registration details attached to an institution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstitutionProfile {
	/// Registration code.
	pub code: String,
	/// Postal code.
	pub zip_code: String,
	/// Contact phone.
	pub phone_number: String,
	/// Postal address.
	pub postal_address: String,
	/// Physical location.
	pub physical_address: String,
	/// Public story, when the institution published one.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub story: Option<String>,
}

/// Institution account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
	/// Account identifier.
	pub id: String,
	/// Login name.
	pub username: String,
	/// Display name.
	pub name: String,
	/// Institution record identifier.
	#[serde(default)]
	pub institution_id: String,
	/// Contact details.
	#[serde(default)]
	pub profile_info: InstitutionProfile,
}

/// Beneficiary registered under an institution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donee {
	/// Account identifier.
	pub id: String,
	/// Login name.
	pub username: String,
	/// Display name.
	pub name: String,
}

/// Donor account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donor {
	/// Account identifier.
	pub id: String,
	/// Login name.
	pub username: String,
	/// Display name.
	pub name: String,
}

/// Public institution story.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
	/// Account identifier.
	pub id: String,
	/// Login name.
	pub username: String,
	/// Display name.
	pub name: String,
	/// Account status label.
	#[serde(default)]
	pub status: String,
	/// Contact details and story text.
	#[serde(default)]
	pub profile_info: InstitutionProfile,
}
impl Story {
	/// Story text, or a line built from the physical address when none was published.
	pub fn text(&self) -> String {
		match self.profile_info.story.as_deref().map(str::trim) {
			Some(story) if !story.is_empty() => story.to_owned(),
			_ => format!("Located in {}.", self.profile_info.physical_address),
		}
	}
}

/// Free-form extras sent with a new institution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionExtraInfo {
	/// Public story; sent as an empty string when omitted.
	#[serde(default)]
	pub story: String,
}

/// Payload for creating an institution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInstitution {
	/// Display name.
	pub name: String,
	/// Login name.
	pub username: String,
	/// Postal address.
	pub postal_address: String,
	/// Postal code.
	pub zip_code: String,
	/// Physical location.
	pub physical_address: String,
	/// Contact phone.
	pub phone_number: String,
	/// Extras.
	pub extra_info: InstitutionExtraInfo,
}

/// Payload for registering a single donee under an institution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDonee {
	/// Owning institution identifier.
	pub user: String,
	/// Display name.
	pub name: String,
	/// Login name.
	pub username: String,
	/// Programme completion date, `YYYY-MM-DD`.
	pub completion_date: String,
}

/// File picked for a bulk upload.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadDocument {
	/// Client-side file name.
	pub file_name: String,
	/// File contents.
	pub bytes: Vec<u8>,
}
impl UploadDocument {
	/// Creates a document from a name and its bytes.
	pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
		Self { file_name: file_name.into(), bytes: bytes.into() }
	}
}
impl Debug for UploadDocument {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UploadDocument")
			.field("file_name", &self.file_name)
			.field("len", &self.bytes.len())
			.finish()
	}
}

/// Bulk donee upload: a CSV document attached to an institution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DoneeUpload {
	/// Owning institution identifier.
	pub institution: String,
	/// Selected CSV file, if any.
	pub document: Option<UploadDocument>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn profile_keeps_unmodelled_fields() {
		let profile: UserProfile = serde_json::from_str(
			r#"{"id":"u-1","username":"staff","name":"Staff","user_type":"STAFF"}"#,
		)
		.expect("Profile should decode.");

		assert_eq!(profile.username, "staff");
		assert_eq!(profile.extra.get("user_type"), Some(&serde_json::json!("STAFF")));
	}

	#[test]
	fn story_text_falls_back_to_location() {
		let mut story: Story = serde_json::from_str(
			r#"{"id":"s-1","username":"inst","name":"Inst","status":"ACTIVE",
			"profile_info":{"code":"K1","physical_address":"Kisumu"}}"#,
		)
		.expect("Story should decode.");

		assert_eq!(story.text(), "Located in Kisumu.");

		story.profile_info.story = Some("We keep girls in school.".into());

		assert_eq!(story.text(), "We keep girls in school.");
	}

	#[test]
	fn new_institution_nests_story_under_extra_info() {
		let payload = NewInstitution {
			name: "Inst".into(),
			extra_info: InstitutionExtraInfo { story: "Hello".into() },
			..Default::default()
		};
		let value = serde_json::to_value(&payload).expect("Payload should serialize.");

		assert_eq!(value["extra_info"]["story"], "Hello");
		assert_eq!(value["phone_number"], "");
	}
}
