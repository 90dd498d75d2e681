// self
use crate::obs::RequestOutcome;

/// Records a request outcome via the global metrics recorder (when enabled).
pub fn record_request_outcome(service: &'static str, outcome: RequestOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"questline_client_request_total",
			"service" => service,
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (service, outcome);
	}
}
