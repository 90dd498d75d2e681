//! Known backend services and the auth conventions each one expects.
//!
//! Service identity is a closed set. Each [`ServiceEndpoint`] carries its base URL and an
//! [`AuthPolicy`] as plain data, and [`ServiceDirectory::resolve`] maps a request URL back to
//! the endpoint that owns it by origin and path prefix.

// crates.io
use ::http::HeaderName;
// self
use crate::_prelude::*;

/// Header carrying the subject identifier for services that key state by user.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Backend services the front-end talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
	/// Primary narrative service producing AI turns; the default target.
	DungeonMaster,
	/// Persistence service storing game state.
	JourneyLog,
}
impl ServiceKind {
	/// All known services.
	pub const ALL: [ServiceKind; 2] = [ServiceKind::DungeonMaster, ServiceKind::JourneyLog];

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			ServiceKind::DungeonMaster => "dungeon_master",
			ServiceKind::JourneyLog => "journey_log",
		}
	}

	/// Returns the header convention the service expects.
	pub fn auth_policy(self) -> AuthPolicy {
		match self {
			ServiceKind::DungeonMaster => AuthPolicy::bearer(),
			ServiceKind::JourneyLog => AuthPolicy::bearer()
				.with_subject_header(HeaderName::from_static(USER_ID_HEADER)),
		}
	}
}
impl Display for ServiceKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Which auth headers a service receives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthPolicy {
	/// Attach `Authorization: Bearer <token>` when a token is available.
	pub bearer: bool,
	/// Header used to forward the subject identifier, if the service wants it.
	pub subject_header: Option<HeaderName>,
}
impl AuthPolicy {
	/// Bearer token only.
	pub fn bearer() -> Self {
		Self { bearer: true, subject_header: None }
	}

	/// Adds a subject header to the policy.
	pub fn with_subject_header(mut self, header: HeaderName) -> Self {
		self.subject_header = Some(header);

		self
	}
}

/// A known service bound to its base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceEndpoint {
	/// Service identity.
	pub kind: ServiceKind,
	/// Base URL every request to the service starts with.
	pub base_url: Url,
	/// Header convention for the service.
	pub policy: AuthPolicy,
}
impl ServiceEndpoint {
	/// Binds `kind` to `base_url` with the service's default policy.
	pub fn new(kind: ServiceKind, base_url: Url) -> Self {
		Self { kind, base_url, policy: kind.auth_policy() }
	}

	/// Returns `true` when `url` lives under this endpoint's base URL.
	pub fn owns(&self, url: &Url) -> bool {
		if self.base_url.scheme() != url.scheme()
			|| self.base_url.host() != url.host()
			|| self.base_url.port_or_known_default() != url.port_or_known_default()
		{
			return false;
		}

		let base = self.base_url.path().trim_end_matches('/');

		match url.path().strip_prefix(base) {
			Some(rest) => rest.is_empty() || rest.starts_with('/'),
			None => false,
		}
	}
}

/// Closed lookup table from base URLs to services.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceDirectory {
	dungeon_master: ServiceEndpoint,
	journey_log: ServiceEndpoint,
}
impl ServiceDirectory {
	/// Creates the directory for the two known services.
	pub fn new(dungeon_master: Url, journey_log: Url) -> Self {
		Self {
			dungeon_master: ServiceEndpoint::new(ServiceKind::DungeonMaster, dungeon_master),
			journey_log: ServiceEndpoint::new(ServiceKind::JourneyLog, journey_log),
		}
	}

	/// Returns the endpoint bound to `kind`.
	pub fn endpoint(&self, kind: ServiceKind) -> &ServiceEndpoint {
		match kind {
			ServiceKind::DungeonMaster => &self.dungeon_master,
			ServiceKind::JourneyLog => &self.journey_log,
		}
	}

	/// Endpoint used when a request names no base URL.
	pub fn primary(&self) -> &ServiceEndpoint {
		&self.dungeon_master
	}

	/// Finds the endpoint owning `url`; the longest matching base path wins.
	pub fn resolve(&self, url: &Url) -> Option<&ServiceEndpoint> {
		ServiceKind::ALL
			.iter()
			.map(|kind| self.endpoint(*kind))
			.filter(|endpoint| endpoint.owns(url))
			.max_by_key(|endpoint| endpoint.base_url.path().trim_end_matches('/').len())
	}
}
