//! Optional observability helpers for dispatched requests.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to run each logical request inside a span named
//!   `questline_client.request` with `service` and `method` fields, and to emit the dispatch,
//!   retry, response, and failure events.
//! - Enable `metrics` to increment the `questline_client_request_total` counter for every
//!   attempt/retry/success/failure, labeled by `service` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, service::ServiceKind};

/// Label used when a request targets a URL outside the service directory.
pub const UNKNOWN_SERVICE: &str = "unknown";

/// Returns the span/metric label for an optional service.
pub fn service_label(service: Option<ServiceKind>) -> &'static str {
	service.map_or(UNKNOWN_SERVICE, ServiceKind::as_str)
}

/// Outcome labels recorded for each logical request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// A transport send was issued.
	Attempt,
	/// The forced-refresh retry was triggered by a `401`.
	Retry,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Retry => "retry",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
