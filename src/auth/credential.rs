//! Identity provider contract and the slot that tracks which provider is current.
//!
//! The application owns a [`CredentialSlot`] and hands a clone to the dispatcher at
//! construction. Signing in installs a provider, signing out clears it; the dispatcher reads the
//! slot once per logical request, so swaps only affect calls issued afterwards.

// self
use crate::{
	_prelude::*,
	auth::{IdToken, SubjectId},
	error::BoxError,
};

/// Boxed future returned by [`CredentialProvider::id_token`].
pub type CredentialFuture<'a> =
	Pin<Box<dyn Future<Output = Result<Option<IdToken>, CredentialError>> + 'a + Send>>;

/// Supplies bearer tokens and the stable subject identifier on demand.
///
/// `id_token(true)` must return a token at least as fresh as any prior call. The dispatcher
/// never inspects tokens for staleness; it only asks for a refresh on the `401` retry.
pub trait CredentialProvider
where
	Self: Send + Sync,
{
	/// Returns the current token, bypassing any cache when `force_refresh` is set.
	fn id_token(&self, force_refresh: bool) -> CredentialFuture<'_>;

	/// Returns the stable subject identifier for the signed-in user, if any.
	fn subject_id(&self) -> Option<SubjectId>;
}

/// Failure reported by a [`CredentialProvider`].
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// Provider raised an ordinary error.
	#[error("{0}")]
	Provider(#[source] BoxError),
	/// Provider rejected with a value that is not an error object.
	#[error("Credential provider rejected with a non-error value.")]
	Opaque {
		/// Rejected value, preserved for diagnostics.
		value: Value,
	},
}
impl CredentialError {
	/// Wraps a provider-specific error.
	pub fn provider(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Provider(Box::new(src))
	}
}

type SharedProvider = Arc<dyn CredentialProvider>;

/// Shared handle to the currently installed [`CredentialProvider`].
#[derive(Clone, Default)]
pub struct CredentialSlot(Arc<RwLock<Option<SharedProvider>>>);
impl CredentialSlot {
	/// Creates a slot that already holds `provider`.
	pub fn with_provider(provider: SharedProvider) -> Self {
		let slot = Self::default();

		slot.install(provider);

		slot
	}

	/// Installs `provider`, returning the one it replaced.
	pub fn install(&self, provider: SharedProvider) -> Option<SharedProvider> {
		self.0.write().replace(provider)
	}

	/// Removes the current provider (sign-out), returning it.
	pub fn clear(&self) -> Option<SharedProvider> {
		self.0.write().take()
	}

	/// Returns the provider installed right now.
	pub fn current(&self) -> Option<SharedProvider> {
		self.0.read().clone()
	}

	/// Returns `true` while a provider is installed.
	pub fn is_installed(&self) -> bool {
		self.0.read().is_some()
	}
}
impl Debug for CredentialSlot {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialSlot").field("installed", &self.is_installed()).finish()
	}
}

/// Provider returning a fixed token and subject; handy for service accounts and demos.
#[derive(Clone, Debug, Default)]
pub struct StaticCredentials {
	token: Option<IdToken>,
	subject: Option<SubjectId>,
}
impl StaticCredentials {
	/// Creates a provider that always hands out `token`.
	pub fn new(token: impl Into<IdToken>) -> Self {
		Self { token: Some(token.into()), subject: None }
	}

	/// Attaches a subject identifier.
	pub fn with_subject(mut self, subject: SubjectId) -> Self {
		self.subject = Some(subject);

		self
	}
}
impl CredentialProvider for StaticCredentials {
	fn id_token(&self, _force_refresh: bool) -> CredentialFuture<'_> {
		let token = self.token.clone();

		Box::pin(async move { Ok(token) })
	}

	fn subject_id(&self) -> Option<SubjectId> {
		self.subject.clone()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn provider(token: &str) -> SharedProvider {
		Arc::new(StaticCredentials::new(token))
	}

	#[test]
	fn slot_install_and_clear() {
		let slot = CredentialSlot::default();

		assert!(slot.current().is_none());
		assert!(slot.install(provider("a")).is_none());
		assert!(slot.is_installed());
		assert!(slot.install(provider("b")).is_some());
		assert!(slot.clear().is_some());
		assert!(!slot.is_installed());
		assert_eq!(format!("{slot:?}"), "CredentialSlot { installed: false }");
	}

	#[tokio::test]
	async fn captured_provider_survives_replacement() {
		let slot = CredentialSlot::with_provider(provider("first"));
		let captured = slot.current().expect("Provider should be installed.");

		slot.install(provider("second"));

		let token = captured
			.id_token(false)
			.await
			.expect("Static provider should not fail.")
			.expect("Static provider should return a token.");

		assert_eq!(token.expose(), "first");
	}

	#[test]
	fn clones_share_state() {
		let app_side = CredentialSlot::default();
		let dispatcher_side = app_side.clone();

		app_side.install(provider("shared"));

		assert!(dispatcher_side.is_installed());
	}
}
