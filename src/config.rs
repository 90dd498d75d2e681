//! Validated client configuration: service base URLs and the default request timeout.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	service::{ServiceDirectory, ServiceKind},
};

/// Timeout applied when a request does not override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Immutable configuration consumed by the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawClientConfig", into = "RawClientConfig")]
pub struct ClientConfig {
	/// Base URL of the narrative service; also the default target.
	pub dungeon_master: Url,
	/// Base URL of the persistence service.
	pub journey_log: Url,
	/// Timeout applied when a request does not override it.
	pub default_timeout: Duration,
}
impl ClientConfig {
	/// Creates a new builder.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Returns the service lookup table described by this configuration.
	pub fn services(&self) -> ServiceDirectory {
		ServiceDirectory::new(self.dungeon_master.clone(), self.journey_log.clone())
	}

	fn validate(&self) -> Result<(), ConfigError> {
		validate_base_url(ServiceKind::DungeonMaster, &self.dungeon_master)?;
		validate_base_url(ServiceKind::JourneyLog, &self.journey_log)?;

		if self.default_timeout.is_zero() {
			return Err(ConfigError::ZeroTimeout);
		}

		Ok(())
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
	/// Base URL of the narrative service.
	pub dungeon_master: Option<Url>,
	/// Base URL of the persistence service.
	pub journey_log: Option<Url>,
	/// Optional override for [`DEFAULT_TIMEOUT`].
	pub default_timeout: Option<Duration>,
}
impl ClientConfigBuilder {
	/// Sets the narrative service base URL.
	pub fn dungeon_master(mut self, url: Url) -> Self {
		self.dungeon_master = Some(url);

		self
	}

	/// Sets the persistence service base URL.
	pub fn journey_log(mut self, url: Url) -> Self {
		self.journey_log = Some(url);

		self
	}

	/// Overrides the default request timeout.
	pub fn default_timeout(mut self, timeout: Duration) -> Self {
		self.default_timeout = Some(timeout);

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let dungeon_master = self
			.dungeon_master
			.ok_or(ConfigError::MissingBaseUrl { service: ServiceKind::DungeonMaster.as_str() })?;
		let journey_log = self
			.journey_log
			.ok_or(ConfigError::MissingBaseUrl { service: ServiceKind::JourneyLog.as_str() })?;
		let config = ClientConfig {
			dungeon_master,
			journey_log,
			default_timeout: self.default_timeout.unwrap_or(DEFAULT_TIMEOUT),
		};

		config.validate()?;

		Ok(config)
	}
}

/// Wire form of [`ClientConfig`]; the timeout travels as milliseconds.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClientConfig {
	dungeon_master_url: String,
	journey_log_url: String,
	#[serde(default = "default_timeout_ms")]
	timeout_ms: u64,
}
impl TryFrom<RawClientConfig> for ClientConfig {
	type Error = ConfigError;

	fn try_from(raw: RawClientConfig) -> Result<Self, Self::Error> {
		ClientConfig::builder()
			.dungeon_master(parse_base_url(ServiceKind::DungeonMaster, &raw.dungeon_master_url)?)
			.journey_log(parse_base_url(ServiceKind::JourneyLog, &raw.journey_log_url)?)
			.default_timeout(Duration::from_millis(raw.timeout_ms))
			.build()
	}
}
impl From<ClientConfig> for RawClientConfig {
	fn from(config: ClientConfig) -> Self {
		Self {
			dungeon_master_url: config.dungeon_master.into(),
			journey_log_url: config.journey_log.into(),
			timeout_ms: u64::try_from(config.default_timeout.as_millis()).unwrap_or(u64::MAX),
		}
	}
}

fn default_timeout_ms() -> u64 {
	u64::try_from(DEFAULT_TIMEOUT.as_millis()).unwrap_or(u64::MAX)
}

fn parse_base_url(kind: ServiceKind, raw: &str) -> Result<Url, ConfigError> {
	Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl { service: kind.as_str(), source })
}

fn validate_base_url(kind: ServiceKind, url: &Url) -> Result<(), ConfigError> {
	if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
		return Err(ConfigError::UnsupportedScheme {
			service: kind.as_str(),
			url: url.to_string(),
		});
	}
	if url.query().is_some() || url.fragment().is_some() {
		return Err(ConfigError::BaseUrlHasQuery { service: kind.as_str(), url: url.to_string() });
	}

	Ok(())
}
