//! Typed staff-dashboard calls.
//!
//! Every call runs through [`ApiClient::send`](crate::pipeline::ApiClient::send), so each one
//! carries the stored credential pair and gets the single renewal on authorization failure. Form
//! input is validated before anything goes out.

pub mod donees;
pub mod donors;
pub mod institutions;
pub mod model;
pub mod stories;

pub(crate) mod form;

pub use model::*;
