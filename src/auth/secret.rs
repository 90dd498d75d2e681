//! Identity token handed out by a [`CredentialProvider`](crate::auth::CredentialProvider).
//!
//! The dispatcher only ever turns an [`IdToken`] into an `Authorization: Bearer` header value;
//! it never parses, caches, or inspects expiry. Formatting is redacted so tokens stay out of
//! spans and logs even when a provider or credential set is debug-printed.

// self
use crate::_prelude::*;

/// Short-lived identity token; a refreshed token replaces it after a `401`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdToken(String);
impl IdToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the `Authorization` header value sent to both services.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl AsRef<str> for IdToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl From<&str> for IdToken {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}
impl From<String> for IdToken {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
impl Debug for IdToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("IdToken").field(&"<redacted>").finish()
	}
}
impl Display for IdToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
