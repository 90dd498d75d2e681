//! Transport primitives used by the dispatcher.
//!
//! [`HttpTransport`] is the crate's only dependency on an HTTP stack. Requests and responses use
//! the `http` crate's types with fully buffered bodies, so custom transports (test doubles,
//! alternative clients) never see reqwest types. Dropping the future returned by
//! [`HttpTransport::send`] must abort the in-flight call; the dispatcher relies on that to enforce
//! its timeout.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, error::BoxError};

/// Outbound request with a buffered body.
pub type HttpRequest = ::http::Request<Vec<u8>>;
/// Inbound response with a buffered body.
pub type HttpResponse = ::http::Response<Vec<u8>>;
/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks able to execute one request.
///
/// Implementations must be `Send + Sync + 'static` so a dispatcher can be shared across tasks,
/// and must not follow the request with retries of their own: retry policy belongs to the
/// dispatcher (single `401` retry) and its callers.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and buffers the full response body.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Transport-level failures (connect, send, body read).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("{source}")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Timeouts are enforced by the dispatcher per request, so the wrapped client should not carry
/// a global timeout shorter than the longest request timeout in use.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	async fn execute(
		client: ReqwestClient,
		request: HttpRequest,
	) -> Result<HttpResponse, TransportError> {
		let request = reqwest::Request::try_from(request)?;
		let response = client.execute(request).await?;
		let status = response.status();
		let version = response.version();
		let headers = response.headers().to_owned();
		let body = response.bytes().await?.to_vec();
		let mut response_new = HttpResponse::new(body);

		*response_new.status_mut() = status;
		*response_new.version_mut() = version;
		*response_new.headers_mut() = headers;

		Ok(response_new)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(Self::execute(self.0.clone(), request))
	}
}
