//! Structured error shape shared by every dispatcher failure mode, plus construction-time errors.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) type BoxError = Box<dyn StdError + Send + Sync>;

/// Status text attached to transport-level failures.
pub const NETWORK_ERROR_TEXT: &str = "Network Error";
/// Message substituted when a failure carries no message of its own.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unexpected error occurred";

const TIMEOUT_STATUS: u16 = 408;
const TIMEOUT_TEXT: &str = "Request Timeout";

/// Normalized failure returned for every dispatcher failure mode.
///
/// `status == 0` together with a `status_text` of [`NETWORK_ERROR_TEXT`] marks a failure where
/// no HTTP response was obtained (connection, DNS, malformed body). Every other status mirrors
/// the remote response, except `408`, which the dispatcher also raises on its own timeout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ThisError)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct Error {
	/// Human-readable summary.
	pub message: String,
	/// HTTP status code, or `0` for transport-level failures.
	pub status: u16,
	/// Reason phrase matching `status`.
	pub status_text: String,
	/// Best-effort payload captured from the response or the original failure.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
	/// Set when the failing response arrived on the forced-refresh retry.
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub after_refresh: bool,
}
impl Error {
	/// Builds an error for an HTTP status returned by a remote service.
	pub fn http(status: u16, status_text: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			status,
			status_text: status_text.into(),
			data: None,
			after_refresh: false,
		}
	}

	/// Builds a transport-level failure (`status == 0`).
	pub fn network(message: impl Into<String>) -> Self {
		Self::http(0, NETWORK_ERROR_TEXT, message)
	}

	/// Builds the error raised when a request outlives its timeout.
	pub fn timeout(after: Duration) -> Self {
		Self::http(
			TIMEOUT_STATUS,
			TIMEOUT_TEXT,
			format!("Request timed out after {}ms.", after.as_millis()),
		)
	}

	/// Attaches a payload to the error.
	pub fn with_data(mut self, data: Value) -> Self {
		self.data = Some(data);

		self
	}

	/// Marks the error as produced by the forced-refresh retry.
	pub fn with_after_refresh(mut self, after_refresh: bool) -> Self {
		self.after_refresh = after_refresh;

		self
	}

	/// Classifies the error by its status.
	pub fn kind(&self) -> ErrorKind {
		match self.status {
			0 => ErrorKind::Network,
			TIMEOUT_STATUS => ErrorKind::Timeout,
			401 => ErrorKind::Unauthorized,
			_ => ErrorKind::Remote,
		}
	}

	/// Returns `true` when no HTTP response was obtained.
	pub fn is_network(&self) -> bool {
		self.status == 0 && self.status_text == NETWORK_ERROR_TEXT
	}

	/// Converts any escaping failure into the structured shape.
	///
	/// Structured errors pass through untouched, so normalizing twice never double-wraps.
	pub fn normalize(failure: impl Into<Failure>) -> Self {
		match failure.into() {
			Failure::Api(err) => err,
			Failure::Error(err) => {
				let message = err.to_string();

				if message.is_empty() {
					Self::network(UNKNOWN_ERROR_MESSAGE)
				} else {
					Self::network(message)
				}
			},
			Failure::Opaque(value) => Self::network(UNKNOWN_ERROR_MESSAGE)
				.with_data(serde_json::json!({ "originalError": value })),
		}
	}
}

/// Coarse failure categories derived from [`Error::status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// The request was aborted before a response arrived.
	Timeout,
	/// The service rejected the credentials.
	Unauthorized,
	/// Any other non-2xx response.
	Remote,
	/// Transport or body parsing failure.
	Network,
}
impl ErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ErrorKind::Timeout => "timeout",
			ErrorKind::Unauthorized => "unauthorized",
			ErrorKind::Remote => "remote",
			ErrorKind::Network => "network",
		}
	}
}
impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Value escaping the dispatcher before normalization.
#[derive(Debug)]
pub enum Failure {
	/// Already structured; kept as-is.
	Api(Error),
	/// Ordinary error object; its message is preserved.
	Error(BoxError),
	/// Arbitrary non-error value; preserved under `data.originalError`.
	Opaque(Value),
}
impl Failure {
	/// Wraps any error object.
	pub fn error(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Error(Box::new(src))
	}
}
impl From<Error> for Failure {
	fn from(e: Error) -> Self {
		Self::Api(e)
	}
}
impl From<BoxError> for Failure {
	fn from(e: BoxError) -> Self {
		Self::Error(e)
	}
}
impl From<serde_json::Error> for Failure {
	fn from(e: serde_json::Error) -> Self {
		Self::error(e)
	}
}
impl From<url::ParseError> for Failure {
	fn from(e: url::ParseError) -> Self {
		Self::error(e)
	}
}
impl From<::http::Error> for Failure {
	fn from(e: ::http::Error) -> Self {
		Self::error(e)
	}
}
impl From<crate::http::TransportError> for Failure {
	fn from(e: crate::http::TransportError) -> Self {
		Self::error(e)
	}
}

/// Configuration and validation failures raised while assembling a client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A required service base URL was not supplied.
	#[error("Missing base URL for the {service} service.")]
	MissingBaseUrl {
		/// Service label.
		service: &'static str,
	},
	/// Base URLs must use http or https.
	#[error("The {service} base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Service label.
		service: &'static str,
		/// Offending URL.
		url: String,
	},
	/// Base URLs cannot carry a query or fragment.
	#[error("The {service} base URL must not carry a query or fragment: {url}.")]
	BaseUrlHasQuery {
		/// Service label.
		service: &'static str,
		/// Offending URL.
		url: String,
	},
	/// A base URL string could not be parsed.
	#[error("The {service} base URL is invalid.")]
	InvalidBaseUrl {
		/// Service label.
		service: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Timeouts must be positive.
	#[error("The default timeout must be greater than zero.")]
	ZeroTimeout,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
