// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for dispatched requests.
#[derive(Debug, Default)]
pub struct DispatchMetrics {
	attempts: AtomicU64,
	retries: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	timeouts: AtomicU64,
}
impl DispatchMetrics {
	/// Returns the number of transport sends (a retried request counts twice).
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of forced-refresh retries triggered by a `401`.
	pub fn retries(&self) -> u64 {
		self.retries.load(Ordering::Relaxed)
	}

	/// Returns the number of logical requests that resolved successfully.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of logical requests that failed.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Returns the number of sends aborted by the request timeout.
	pub fn timeouts(&self) -> u64 {
		self.timeouts.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_retry(&self) {
		self.retries.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_timeout(&self) {
		self.timeouts.fetch_add(1, Ordering::Relaxed);
	}
}
