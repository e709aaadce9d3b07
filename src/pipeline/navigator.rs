//! Route changes forced by the pipeline.

// self
use crate::_prelude::*;

/// Receives the redirect issued when a session can no longer be renewed.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Moves the user to `route`.
	fn navigate(&self, route: &str);
}

/// Default navigator that only logs the requested route.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNavigator;
impl Navigator for TracingNavigator {
	fn navigate(&self, route: &str) {
		tracing::info!(route, "Navigation requested.");
	}
}

/// Navigator that records every requested route; clones share the log.
#[derive(Clone, Debug, Default)]
pub struct NavigationLog(Arc<Mutex<Vec<String>>>);
impl NavigationLog {
	/// Returns every recorded route in request order.
	pub fn routes(&self) -> Vec<String> {
		self.0.lock().clone()
	}

	/// Returns the most recent route.
	pub fn last(&self) -> Option<String> {
		self.0.lock().last().cloned()
	}
}
impl Navigator for NavigationLog {
	fn navigate(&self, route: &str) {
		self.0.lock().push(route.to_owned());
	}
}
