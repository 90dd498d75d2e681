//! Authenticated request dispatcher.
//!
//! [`Dispatcher::request`] performs one logical HTTP request: it resolves the final URL, looks
//! up which service owns it, attaches that service's auth headers from the current
//! [`CredentialProvider`], and sends the request under a hard timeout. A `401` is retried
//! exactly once with a force-refreshed token; every other outcome is terminal. Failures of any
//! origin come back as the structured [`Error`].

mod body;
mod metrics;
mod options;
mod service_client;

pub use body::Body;
pub use metrics::DispatchMetrics;
pub use options::RequestOptions;
pub use service_client::ServiceClient;

// crates.io
use ::http::{
	HeaderMap, HeaderValue, Method, StatusCode,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::{CredentialProvider, CredentialSlot},
	config::ClientConfig,
	error::Failure,
	http::{HttpRequest, HttpTransport},
	obs::{self, RequestOutcome, RequestSpan},
	service::{AuthPolicy, ServiceDirectory, ServiceEndpoint, ServiceKind},
};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestTransport};

/// Number of forced-refresh retries allowed per logical request.
const MAX_AUTH_RETRIES: u8 = 1;

#[cfg(feature = "reqwest")]
/// Dispatcher specialized for the crate's default reqwest transport.
pub type ReqwestDispatcher = Dispatcher<ReqwestTransport>;

/// Sends authenticated requests to the dungeon-master and journey-log services.
///
/// The dispatcher owns the transport, the configuration, and a clone of the application's
/// [`CredentialSlot`]. The slot is read once per logical request, so signing out or swapping
/// providers never affects a request already in flight.
pub struct Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Slot holding the current credential provider.
	pub credentials: CredentialSlot,
	/// Validated configuration.
	pub config: ClientConfig,
	/// Counters for attempts, retries, and outcomes.
	pub metrics: Arc<DispatchMetrics>,
	services: ServiceDirectory,
}
impl<T> Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a dispatcher that reuses the caller-provided transport.
	pub fn with_transport(
		config: ClientConfig,
		credentials: CredentialSlot,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self {
			transport: transport.into(),
			credentials,
			services: config.services(),
			config,
			metrics: Default::default(),
		}
	}

	/// Returns the service lookup table derived from the configuration.
	pub fn services(&self) -> &ServiceDirectory {
		&self.services
	}

	/// Returns a handle pre-bound to the dungeon-master base URL.
	pub fn dungeon_master(&self) -> ServiceClient<'_, T> {
		self.service(ServiceKind::DungeonMaster)
	}

	/// Returns a handle pre-bound to the journey-log base URL.
	pub fn journey_log(&self) -> ServiceClient<'_, T> {
		self.service(ServiceKind::JourneyLog)
	}

	/// Returns a handle pre-bound to the base URL of `kind`.
	pub fn service(&self, kind: ServiceKind) -> ServiceClient<'_, T> {
		ServiceClient::new(self, self.services.endpoint(kind))
	}

	/// Performs one logical request.
	///
	/// Relative `path`s are joined to `options.base_url` (or the dungeon-master base URL);
	/// absolute URLs are used verbatim.
	pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Body> {
		let url = self.resolve_url(path, options.base_url.as_ref());
		let service = url.as_ref().ok().and_then(|url| self.services.resolve(url));
		let label = obs::service_label(service.map(|endpoint| endpoint.kind));
		let span = RequestSpan::new(label, &options.method);

		span.instrument(async move {
			match self.run(url, service, label, options).await {
				Ok(body) => {
					self.metrics.record_success();
					obs::record_request_outcome(label, RequestOutcome::Success);

					Ok(body)
				},
				Err(failure) => Err(self.reject(label, failure)),
			}
		})
		.await
	}

	/// Issues a `GET`.
	pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Body> {
		self.request(path, options.with_method(Method::GET)).await
	}

	/// Issues a `DELETE`.
	pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<Body> {
		self.request(path, options.with_method(Method::DELETE)).await
	}

	/// Issues a `POST` without a body.
	pub async fn post(&self, path: &str, options: RequestOptions) -> Result<Body> {
		self.request(path, options.with_method(Method::POST)).await
	}

	/// Issues a `PUT` without a body.
	pub async fn put(&self, path: &str, options: RequestOptions) -> Result<Body> {
		self.request(path, options.with_method(Method::PUT)).await
	}

	/// Issues a `PATCH` without a body.
	pub async fn patch(&self, path: &str, options: RequestOptions) -> Result<Body> {
		self.request(path, options.with_method(Method::PATCH)).await
	}

	/// Issues a `POST` whose body is `body` serialized as JSON.
	pub async fn post_json<B>(&self, path: &str, body: &B, options: RequestOptions) -> Result<Body>
	where
		B: ?Sized + Serialize,
	{
		self.send_json(Method::POST, path, body, options).await
	}

	/// Issues a `PUT` whose body is `body` serialized as JSON.
	pub async fn put_json<B>(&self, path: &str, body: &B, options: RequestOptions) -> Result<Body>
	where
		B: ?Sized + Serialize,
	{
		self.send_json(Method::PUT, path, body, options).await
	}

	/// Issues a `PATCH` whose body is `body` serialized as JSON.
	pub async fn patch_json<B>(&self, path: &str, body: &B, options: RequestOptions) -> Result<Body>
	where
		B: ?Sized + Serialize,
	{
		self.send_json(Method::PATCH, path, body, options).await
	}

	async fn send_json<B>(
		&self,
		method: Method,
		path: &str,
		body: &B,
		options: RequestOptions,
	) -> Result<Body>
	where
		B: ?Sized + Serialize,
	{
		let payload = serde_json::to_vec(body).map_err(|e| self.reject(obs::UNKNOWN_SERVICE, e))?;

		self.request(path, options.with_method(method).with_body(payload)).await
	}

	// INIT -> AUTH_RESOLVE -> DISPATCH -> {TIMEOUT | RESPONSE}; a retry-eligible 401 loops back
	// to AUTH_RESOLVE once.
	async fn run(
		&self,
		url: Result<Url, url::ParseError>,
		service: Option<&ServiceEndpoint>,
		label: &'static str,
		options: RequestOptions,
	) -> Result<Body, Failure> {
		let url = url?;
		let timeout = options.timeout.unwrap_or(self.config.default_timeout);
		let provider = if options.skip_auth { None } else { self.credentials.current() };
		let policy = service.map(|endpoint| &endpoint.policy);
		let mut attempt = 0_u8;
		let response = loop {
			let mut headers = base_headers(&options.headers);

			if let (Some(provider), Some(policy)) = (provider.as_deref(), policy) {
				apply_auth(&mut headers, policy, provider, attempt > 0).await;
			}

			let request = build_request(&options, &url, headers)?;

			obs::log_dispatch(&options.method, &url, attempt);
			self.metrics.record_attempt();
			obs::record_request_outcome(label, RequestOutcome::Attempt);

			let response = match tokio::time::timeout(timeout, self.transport.send(request)).await
			{
				Ok(response) => response?,
				Err(_) => {
					self.metrics.record_timeout();

					return Err(Error::timeout(timeout).into());
				},
			};

			if response.status() == StatusCode::UNAUTHORIZED
				&& attempt < MAX_AUTH_RETRIES
				&& provider.is_some()
			{
				obs::log_retry(&url);
				self.metrics.record_retry();
				obs::record_request_outcome(label, RequestOutcome::Retry);

				attempt += 1;

				continue;
			}

			break response;
		};
		let status = response.status().as_u16();
		let body = body::read(response, attempt > 0)?;

		obs::log_response(status, &body);

		Ok(body)
	}

	fn reject(&self, label: &'static str, failure: impl Into<Failure>) -> Error {
		let err = Error::normalize(failure);

		obs::log_failure(&err);
		self.metrics.record_failure();
		obs::record_request_outcome(label, RequestOutcome::Failure);

		err
	}

	fn resolve_url(&self, path: &str, base_url: Option<&Url>) -> Result<Url, url::ParseError> {
		if let Ok(url) = Url::parse(path) {
			if url.has_host() {
				return Ok(url);
			}
		}

		let base = base_url.unwrap_or(&self.services.primary().base_url);

		Url::parse(&join_path(base, path))
	}
}
#[cfg(feature = "reqwest")]
impl Dispatcher<ReqwestTransport> {
	/// Creates a dispatcher backed by a default reqwest transport.
	pub fn new(config: ClientConfig, credentials: CredentialSlot) -> Self {
		Self::with_transport(config, credentials, ReqwestTransport::default())
	}

	/// Creates a dispatcher whose reqwest client comes from a customized builder.
	pub fn with_client_builder(
		config: ClientConfig,
		credentials: CredentialSlot,
		builder: reqwest::ClientBuilder,
	) -> Result<Self, ConfigError> {
		let client = builder.build()?;

		Ok(Self::with_transport(config, credentials, ReqwestTransport::with_client(client)))
	}
}
impl<T> Clone for Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			credentials: self.credentials.clone(),
			config: self.config.clone(),
			metrics: self.metrics.clone(),
			services: self.services.clone(),
		}
	}
}
impl<T> Debug for Dispatcher<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Dispatcher")
			.field("config", &self.config)
			.field("credentials", &self.credentials)
			.finish()
	}
}

fn join_path(base: &Url, path: &str) -> String {
	let base = base.as_str().trim_end_matches('/');

	if path.is_empty() {
		base.to_owned()
	} else if path.starts_with('/') {
		format!("{base}{path}")
	} else {
		format!("{base}/{path}")
	}
}

fn base_headers(caller: &HeaderMap) -> HeaderMap {
	let mut headers = HeaderMap::new();

	headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
	headers.extend(caller.clone());

	headers
}

// Credential failures degrade to an unauthenticated request; the server has the final say.
async fn apply_auth(
	headers: &mut HeaderMap,
	policy: &AuthPolicy,
	provider: &dyn CredentialProvider,
	force_refresh: bool,
) {
	if policy.bearer {
		match provider.id_token(force_refresh).await {
			Ok(Some(token)) => match HeaderValue::from_str(&token.bearer()) {
				Ok(mut value) => {
					value.set_sensitive(true);
					headers.insert(AUTHORIZATION, value);
				},
				Err(_) => obs::log_unusable_credential(AUTHORIZATION.as_str()),
			},
			Ok(None) => {},
			Err(err) => obs::log_credential_failure(&err),
		}
	}
	if let Some(header) = &policy.subject_header {
		if let Some(subject) = provider.subject_id() {
			match HeaderValue::from_str(&subject) {
				Ok(value) => {
					headers.insert(header.clone(), value);
				},
				Err(_) => obs::log_unusable_credential(header.as_str()),
			}
		}
	}
}

fn build_request(
	options: &RequestOptions,
	url: &Url,
	headers: HeaderMap,
) -> Result<HttpRequest, Failure> {
	let mut request = ::http::Request::builder()
		.method(options.method.clone())
		.uri(url.as_str())
		.body(options.body.clone().unwrap_or_default())?;

	*request.headers_mut() = headers;

	Ok(request)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn join_path_inserts_exactly_one_slash() {
		let base = Url::parse("https://dm.example.com/api/").expect("Failed to parse base URL.");

		assert_eq!(join_path(&base, "/turns"), "https://dm.example.com/api/turns");
		assert_eq!(join_path(&base, "turns"), "https://dm.example.com/api/turns");
		assert_eq!(join_path(&base, ""), "https://dm.example.com/api");
	}

	#[test]
	fn caller_headers_override_content_type() {
		let mut caller = HeaderMap::new();

		caller.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));

		let headers = base_headers(&caller);

		assert_eq!(headers[CONTENT_TYPE], "text/plain");
		assert_eq!(base_headers(&HeaderMap::new())[CONTENT_TYPE], "application/json");
	}

	#[cfg(feature = "reqwest")]
	#[test]
	fn client_builder_constructor_exposes_services() {
		let config = ClientConfig::builder()
			.dungeon_master(Url::parse("https://dm.example.com/").expect("Valid URL."))
			.journey_log(Url::parse("https://journal.example.com/").expect("Valid URL."))
			.build()
			.expect("Config should build.");
		let dispatcher = ReqwestDispatcher::with_client_builder(
			config,
			CredentialSlot::default(),
			ReqwestClient::builder(),
		)
		.expect("Default reqwest builder should succeed.");

		assert_eq!(dispatcher.journey_log().kind(), ServiceKind::JourneyLog);
		assert_eq!(dispatcher.dungeon_master().base_url().as_str(), "https://dm.example.com/");
	}
}
