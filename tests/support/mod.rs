//! Fixtures shared by the dispatcher integration tests.

#![allow(dead_code)]

// std
use std::{sync::Arc, time::Duration};
// crates.io
use httpmock::MockServer;
use parking_lot::Mutex;
// self
use questline_client::{
	auth::{CredentialError, CredentialFuture, CredentialProvider, CredentialSlot, IdToken, SubjectId},
	config::ClientConfig,
	dispatch::Dispatcher,
	http::{HttpRequest, HttpResponse, HttpTransport, TransportError, TransportFuture},
	http_types::{HeaderMap, HeaderValue, Method, StatusCode, header::CONTENT_TYPE},
	url::Url,
};

pub const SUBJECT: &str = "player-7";

#[derive(Debug, thiserror::Error)]
#[error("identity provider is offline")]
pub struct ProviderOffline;

/// Credential provider with separate cached/refreshed tokens that records every call.
#[derive(Debug, Default)]
pub struct ScriptedCredentials {
	cached: Option<String>,
	refreshed: Option<String>,
	subject: Option<SubjectId>,
	failing: bool,
	rejection: Option<serde_json::Value>,
	calls: Mutex<Vec<bool>>,
	subject_reads: Mutex<usize>,
}
impl ScriptedCredentials {
	/// Hands out `cached` normally and `refreshed` when a refresh is forced.
	pub fn new(cached: &str, refreshed: &str) -> Self {
		Self {
			cached: Some(cached.to_owned()),
			refreshed: Some(refreshed.to_owned()),
			..Default::default()
		}
	}

	/// Always hands out `token`.
	pub fn fixed(token: &str) -> Self {
		Self::new(token, token)
	}

	/// Never has a token.
	pub fn tokenless() -> Self {
		Self::default()
	}

	/// Fails every token request.
	pub fn failing() -> Self {
		Self { failing: true, ..Default::default() }
	}

	/// Rejects every token request with a value that is not an error object.
	pub fn rejecting(value: serde_json::Value) -> Self {
		Self { rejection: Some(value), ..Default::default() }
	}

	pub fn with_subject(mut self, subject: &str) -> Self {
		self.subject = Some(SubjectId::new(subject).expect("Subject fixture should be valid."));

		self
	}

	/// `force_refresh` flags observed so far, in call order.
	pub fn calls(&self) -> Vec<bool> {
		self.calls.lock().clone()
	}

	pub fn subject_reads(&self) -> usize {
		*self.subject_reads.lock()
	}
}
impl CredentialProvider for ScriptedCredentials {
	fn id_token(&self, force_refresh: bool) -> CredentialFuture<'_> {
		self.calls.lock().push(force_refresh);

		let token = if force_refresh { self.refreshed.clone() } else { self.cached.clone() };
		let failing = self.failing;
		let rejection = self.rejection.clone();

		Box::pin(async move {
			if failing {
				return Err(CredentialError::provider(ProviderOffline));
			}
			if let Some(value) = rejection {
				return Err(CredentialError::Opaque { value });
			}

			Ok(token.map(IdToken::new))
		})
	}

	fn subject_id(&self) -> Option<SubjectId> {
		*self.subject_reads.lock() += 1;

		self.subject.clone()
	}
}

pub fn base_url(server: &MockServer) -> Url {
	Url::parse(&server.base_url()).expect("Mock server base URL should parse.")
}

pub fn config_for(dungeon_master: Url, journey_log: Url) -> ClientConfig {
	ClientConfig::builder()
		.dungeon_master(dungeon_master)
		.journey_log(journey_log)
		.default_timeout(Duration::from_secs(5))
		.build()
		.expect("Test client config should build.")
}

/// Reqwest-backed dispatcher pointing at two mock servers, plus the slot it reads.
#[cfg(feature = "reqwest")]
pub fn build_reqwest_dispatcher(
	dungeon_master: &MockServer,
	journey_log: &MockServer,
) -> (questline_client::dispatch::ReqwestDispatcher, CredentialSlot) {
	let slot = CredentialSlot::default();
	let dispatcher =
		Dispatcher::new(config_for(base_url(dungeon_master), base_url(journey_log)), slot.clone());

	(dispatcher, slot)
}

pub fn install(slot: &CredentialSlot, credentials: &Arc<ScriptedCredentials>) {
	slot.install(credentials.clone());
}

/// What a [`FakeTransport`] saw for one send.
#[derive(Clone, Debug)]
pub struct Recorded {
	pub method: Method,
	pub uri: String,
	pub headers: HeaderMap,
	pub body: Vec<u8>,
}

type Responder = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync>;

/// In-process transport that records requests and answers through a closure.
pub struct FakeTransport {
	responder: Responder,
	delay: Option<Duration>,
	requests: Mutex<Vec<Recorded>>,
	dropped_in_flight: Arc<Mutex<usize>>,
}
impl FakeTransport {
	pub fn new(
		responder: impl Fn(&HttpRequest) -> Result<HttpResponse, TransportError>
		+ 'static
		+ Send
		+ Sync,
	) -> Self {
		Self {
			responder: Box::new(responder),
			delay: None,
			requests: Mutex::new(Vec::new()),
			dropped_in_flight: Default::default(),
		}
	}

	/// Delays every answer by `delay`.
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);

		self
	}

	pub fn requests(&self) -> Vec<Recorded> {
		self.requests.lock().clone()
	}

	/// Number of sends whose future was dropped before it completed.
	pub fn dropped_in_flight(&self) -> usize {
		*self.dropped_in_flight.lock()
	}
}
impl HttpTransport for FakeTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		self.requests.lock().push(Recorded {
			method: request.method().clone(),
			uri: request.uri().to_string(),
			headers: request.headers().clone(),
			body: request.body().clone(),
		});

		let guard = InFlight { completed: false, dropped: self.dropped_in_flight.clone() };
		let delay = self.delay;

		Box::pin(async move {
			let mut guard = guard;

			if let Some(delay) = delay {
				tokio::time::sleep(delay).await;
			}

			guard.completed = true;

			(self.responder)(&request)
		})
	}
}

struct InFlight {
	completed: bool,
	dropped: Arc<Mutex<usize>>,
}
impl Drop for InFlight {
	fn drop(&mut self) {
		if !self.completed {
			*self.dropped.lock() += 1;
		}
	}
}

pub fn json_response(status: u16, body: &str) -> HttpResponse {
	let mut response = HttpResponse::new(body.as_bytes().to_vec());

	*response.status_mut() = StatusCode::from_u16(status).expect("Status should be valid.");
	response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

	response
}
