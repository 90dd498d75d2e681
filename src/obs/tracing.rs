// crates.io
use ::http::Method;
// self
use crate::{_prelude::*, auth::CredentialError};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// Span wrapping one logical request (both attempts).
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Creates a new span tagged with the service label + method.
	pub fn new(service: &'static str, method: &Method) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("questline_client.request", service, method = %method);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (service, method);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs the method and URL right before a transport send.
pub fn log_dispatch(method: &Method, url: &Url, attempt: u8) {
	#[cfg(feature = "tracing")]
	tracing::debug!(%method, %url, attempt, "dispatching request");
	#[cfg(not(feature = "tracing"))]
	let _ = (method, url, attempt);
}

/// Logs the parsed body of a successful response.
pub fn log_response(status: u16, body: &impl Debug) {
	#[cfg(feature = "tracing")]
	tracing::debug!(status, ?body, "request succeeded");
	#[cfg(not(feature = "tracing"))]
	let _ = (status, body);
}

/// Logs the `401` that triggers the forced-refresh retry.
pub fn log_retry(url: &Url) {
	#[cfg(feature = "tracing")]
	tracing::info!(%url, "received 401, retrying once with a refreshed credential");
	#[cfg(not(feature = "tracing"))]
	let _ = url;
}

/// Logs a credential provider failure; the request continues without a bearer token.
pub fn log_credential_failure(err: &CredentialError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(error = %err, "credential provider failed, continuing without a token");
	#[cfg(not(feature = "tracing"))]
	let _ = err;
}

/// Logs a credential that cannot be encoded as a header value.
pub fn log_unusable_credential(header: &str) {
	#[cfg(feature = "tracing")]
	tracing::warn!(header, "credential is not a valid header value, skipping it");
	#[cfg(not(feature = "tracing"))]
	let _ = header;
}

/// Logs the classified error right before it is returned.
pub fn log_failure(err: &Error) {
	#[cfg(feature = "tracing")]
	tracing::warn!(
		status = err.status,
		status_text = %err.status_text,
		kind = %err.kind(),
		after_refresh = err.after_refresh,
		message = %err.message,
		"request failed"
	);
	#[cfg(not(feature = "tracing"))]
	let _ = err;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = RequestSpan::new("dungeon_master", &Method::GET);
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn log_helpers_never_panic() {
		let url = Url::parse("https://dm.example.com/turns").expect("Failed to parse test URL.");

		log_dispatch(&Method::POST, &url, 0);
		log_response(200, &"body");
		log_retry(&url);
		log_unusable_credential("authorization");
		log_failure(&Error::network("offline"));
	}
}
