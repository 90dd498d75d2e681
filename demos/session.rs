//! Demonstrates a signed-in session against mock dungeon-master and journey-log services,
//! including the forced-refresh retry after an expired token.

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	time::Duration,
};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use questline_client::{
	auth::{
		CredentialFuture, CredentialProvider, CredentialSlot, IdToken, StaticCredentials, SubjectId,
	},
	config::ClientConfig,
	dispatch::{Dispatcher, RequestOptions},
	url::Url,
};

/// Hands out an expired token until a refresh is forced.
#[derive(Debug, Default)]
struct ExpiringCredentials {
	refreshed: AtomicBool,
}
impl CredentialProvider for ExpiringCredentials {
	fn id_token(&self, force_refresh: bool) -> CredentialFuture<'_> {
		if force_refresh {
			self.refreshed.store(true, Ordering::SeqCst);
		}

		let token = if self.refreshed.load(Ordering::SeqCst) { "fresh-token" } else { "stale-token" };

		Box::pin(async move { Ok(Some(IdToken::new(token))) })
	}

	fn subject_id(&self) -> Option<SubjectId> {
		SubjectId::new("demo-player").ok()
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let dungeon_master = MockServer::start_async().await;
	let journey_log = MockServer::start_async().await;
	let stale = dungeon_master
		.mock_async(|when, then| {
			when.method(POST).path("/turns").header("authorization", "Bearer stale-token");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"message\":\"Token expired\"}");
		})
		.await;
	let turn = dungeon_master
		.mock_async(|when, then| {
			when.method(POST).path("/turns").header("authorization", "Bearer fresh-token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"narrative\":\"The door creaks open.\"}");
		})
		.await;
	let journal = journey_log
		.mock_async(|when, then| {
			when.method(GET).path("/characters/c-1/journal").header("x-user-id", "demo-player");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"entries\":[\"Entered the crypt\"]}");
		})
		.await;
	let config = ClientConfig::builder()
		.dungeon_master(Url::parse(&dungeon_master.base_url())?)
		.journey_log(Url::parse(&journey_log.base_url())?)
		.default_timeout(Duration::from_secs(10))
		.build()?;
	let slot = CredentialSlot::with_provider(Arc::new(ExpiringCredentials::default()));
	let dispatcher = Dispatcher::new(config, slot.clone());
	let narrative = dispatcher
		.dungeon_master()
		.post_json("/turns", &serde_json::json!({ "action": "open door" }), RequestOptions::new())
		.await?;

	println!("Turn result: {narrative:?}");

	let entries = dispatcher
		.journey_log()
		.get("/characters/c-1/journal", RequestOptions::new())
		.await?;

	println!("Journal: {entries:?}");

	stale.assert_async().await;
	turn.assert_async().await;
	journal.assert_async().await;

	slot.install(Arc::new(StaticCredentials::new("service-token")));

	if let Err(err) = dispatcher.get("/missing", RequestOptions::new()).await {
		println!("Structured error: {}", serde_json::to_string(&err)?);
	}

	println!(
		"Attempts: {}, retries: {}, failures: {}",
		dispatcher.metrics.attempts(),
		dispatcher.metrics.retries(),
		dispatcher.metrics.failures()
	);

	Ok(())
}
