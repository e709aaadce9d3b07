// self
use crate::error::ValidationError;

/// Rejects a blank required field.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
	if value.trim().is_empty() { Err(ValidationError::MissingField { field }) } else { Ok(()) }
}

/// Checks each `(field, value)` pair in order, reporting the first blank one.
pub(crate) fn require_all(fields: &[(&'static str, &str)]) -> Result<(), ValidationError> {
	fields.iter().try_for_each(|(field, value)| require(field, value))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn first_blank_field_is_reported() {
		let err = require_all(&[("name", "Inst"), ("username", "  "), ("zip_code", "")])
			.expect_err("Blank fields should be rejected.");

		assert_eq!(err, ValidationError::MissingField { field: "username" });
		assert!(require_all(&[("name", "Inst")]).is_ok());
	}
}
