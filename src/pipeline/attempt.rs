//! Retry bookkeeping carried explicitly alongside a call.

// self
use crate::_prelude::*;

/// Marks whether a call has already been replayed after a renewal.
///
/// The marker travels with the call instead of living on the request, so a replayed call can
/// never enter the renewal path a second time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Attempt {
	retried: bool,
}
impl Attempt {
	/// First dispatch of a call.
	pub const fn first() -> Self {
		Self { retried: false }
	}

	/// Returns `true` once the call has been replayed.
	pub const fn has_retried(self) -> bool {
		self.retried
	}

	/// Returns the replay marker, or `None` when the single replay is already spent.
	pub const fn retry(self) -> Option<Self> {
		if self.retried { None } else { Some(Self { retried: true }) }
	}
}

/// States a call moves through, used as a structured log field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallState {
	/// Dispatched with no stored credentials.
	Unauthenticated,
	/// Dispatched with the stored credential headers.
	Attached,
	/// Backend answered `401` on the first dispatch.
	AuthorizationFailed,
	/// Renewal succeeded; the call is being replayed.
	Renewing,
	/// Outcome is final and returned to the caller.
	Terminal,
}
impl CallState {
	/// Returns a stable label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Unauthenticated => "unauthenticated",
			Self::Attached => "attached",
			Self::AuthorizationFailed => "authorization_failed",
			Self::Renewing => "renewing",
			Self::Terminal => "terminal",
		}
	}
}
impl Display for CallState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
