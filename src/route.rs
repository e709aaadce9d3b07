//! Page access rules applied before rendering a route.

/// Where unauthenticated visitors are sent.
pub const LOGIN_ROUTE: &str = "/login";
/// Where authenticated visitors on an auth page are sent.
pub const DASHBOARD_ROUTE: &str = "/staff";
/// Sections that require a valid credential set, including every sub-path.
pub const PROTECTED_PREFIXES: [&str; 8] = [
	"/staff",
	"/institution",
	"/donnees",
	"/donors",
	"/donations",
	"/subscriptions",
	"/payments",
	"/settings",
];
/// Pages only meaningful while signed out.
pub const AUTH_PAGES: [&str; 3] = ["/login", "/forgot-password", "/reset-password"];

/// Outcome of [`gate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteDecision {
	/// Render the requested page.
	Allow,
	/// Send the visitor elsewhere.
	Redirect(&'static str),
}

/// Decides whether `path` may be shown to a visitor with or without a valid credential set.
///
/// Paths that are neither protected nor auth pages always pass.
pub fn gate(path: &str, authenticated: bool) -> RouteDecision {
	let path = normalize(path);

	if authenticated && AUTH_PAGES.contains(&path) {
		return RouteDecision::Redirect(DASHBOARD_ROUTE);
	}
	if !authenticated && is_protected(path) {
		return RouteDecision::Redirect(LOGIN_ROUTE);
	}

	RouteDecision::Allow
}

/// Returns `true` when `path` is a protected section or one of its sub-paths.
pub fn is_protected(path: &str) -> bool {
	let path = normalize(path);

	PROTECTED_PREFIXES.iter().any(|prefix| {
		path.strip_prefix(prefix).is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
	})
}

fn normalize(path: &str) -> &str {
	let path = path.split(['?', '#']).next().unwrap_or_default();
	let trimmed = path.trim_end_matches('/');

	if trimmed.is_empty() { "/" } else { trimmed }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn protected_sections_need_credentials() {
		assert_eq!(gate("/staff", false), RouteDecision::Redirect(LOGIN_ROUTE));
		assert_eq!(gate("/staff/users/institution/42", false), RouteDecision::Redirect(LOGIN_ROUTE));
		assert_eq!(gate("/settings/?tab=profile", false), RouteDecision::Redirect(LOGIN_ROUTE));
		assert_eq!(gate("/staff/users", true), RouteDecision::Allow);
	}

	#[test]
	fn prefixes_match_whole_segments() {
		assert!(!is_protected("/staffroom"));
		assert!(!is_protected("/donorsfaq"));
		assert!(is_protected("/donors"));
	}

	#[test]
	fn auth_pages_bounce_signed_in_visitors() {
		assert_eq!(gate("/login", true), RouteDecision::Redirect(DASHBOARD_ROUTE));
		assert_eq!(gate("/reset-password/", true), RouteDecision::Redirect(DASHBOARD_ROUTE));
		assert_eq!(gate("/login", false), RouteDecision::Allow);
	}

	#[test]
	fn public_pages_always_pass() {
		for path in ["/", "/about", "/stories"] {
			assert_eq!(gate(path, false), RouteDecision::Allow);
			assert_eq!(gate(path, true), RouteDecision::Allow);
		}
	}
}
