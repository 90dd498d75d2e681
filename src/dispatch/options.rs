//! Per-call request descriptor.

// crates.io
use ::http::{HeaderMap, HeaderName, HeaderValue, Method};
// self
use crate::_prelude::*;

/// Options for one logical request.
///
/// `base_url` falls back to the dungeon-master base URL and `timeout` to the configured default.
/// Paths that are already absolute URLs ignore `base_url` entirely.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
	/// HTTP verb; `GET` unless a convenience method overrides it.
	pub method: Method,
	/// Caller headers; they override the default `Content-Type` but not auth headers.
	pub headers: HeaderMap,
	/// Serialized request body, omitted when `None`.
	pub body: Option<Vec<u8>>,
	/// Base URL joined with relative paths.
	pub base_url: Option<Url>,
	/// Per-request timeout override.
	pub timeout: Option<Duration>,
	/// Skips credential lookup and auth headers entirely.
	pub skip_auth: bool,
}
impl RequestOptions {
	/// Creates options for a `GET` with every default.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the HTTP verb.
	pub fn with_method(mut self, method: Method) -> Self {
		self.method = method;

		self
	}

	/// Sets a single caller header, replacing earlier values for `name`.
	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Merges a set of caller headers.
	pub fn with_headers(mut self, headers: HeaderMap) -> Self {
		self.headers.extend(headers);

		self
	}

	/// Sets a pre-serialized body.
	pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Targets a specific base URL.
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = Some(base_url);

		self
	}

	/// Overrides the timeout for this request.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Marks the request as anonymous.
	pub fn skip_auth(self) -> Self {
		self.with_skip_auth(true)
	}

	/// Overrides the anonymous flag.
	pub fn with_skip_auth(mut self, skip_auth: bool) -> Self {
		self.skip_auth = skip_auth;

		self
	}
}
