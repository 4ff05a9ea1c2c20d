mod common;

use std::{sync::Arc, time::Duration};

use common::{FakeIndex, Health, MemoryStore, service, user};
use famrank_service::{SearchSession, SearchState};

fn session_for(store: Arc<MemoryStore>) -> SearchSession {
	let service = service(false, Arc::new(FakeIndex::new(Health::Healthy, Vec::new())), store);

	SearchSession::from_config(Arc::new(service))
}

fn result_names(state: &SearchState) -> Vec<&str> {
	state.results.iter().map(|r| r.profile.display_name.as_str()).collect()
}

#[tokio::test(start_paused = true)]
async fn keystrokes_within_window_trigger_one_search() {
	let store = Arc::new(MemoryStore::with_users(vec![user("u1", "Jane")]));
	let session = session_for(store.clone());
	let mut rx = session.subscribe();

	session.search("j");
	tokio::time::sleep(Duration::from_millis(100)).await;
	session.search("ja");
	tokio::time::sleep(Duration::from_millis(100)).await;
	session.search("jan");

	assert_eq!(store.calls(), 0);
	assert!(session.snapshot().loading);

	let state = rx
		.wait_for(|state| state.generation == 3 && !state.loading)
		.await
		.expect("Session state closed.")
		.clone();

	assert_eq!(store.prefix_queries(), vec!["jan".to_string()]);
	assert_eq!(result_names(&state), vec!["Jane"]);
	assert_eq!(state.error, None);
}

#[tokio::test(start_paused = true)]
async fn blank_input_clears_immediately() {
	let store = Arc::new(MemoryStore::with_users(vec![user("u1", "Jane")]));
	let session = session_for(store.clone());
	let mut rx = session.subscribe();

	session.search("jane");
	rx.wait_for(|state| state.generation == 1 && !state.loading).await.expect("Session state closed.");

	assert_eq!(session.snapshot().results.len(), 1);

	session.search("   ");

	let state = session.snapshot();

	assert!(state.results.is_empty());
	assert!(!state.loading);
	assert_eq!(state.error, None);

	tokio::time::sleep(Duration::from_secs(1)).await;

	assert_eq!(store.prefix_queries().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn short_query_sets_error_and_keeps_results() {
	let store = Arc::new(MemoryStore::with_users(vec![user("u1", "Jane")]));
	let session = session_for(store.clone());
	let mut rx = session.subscribe();

	session.search("jane");
	rx.wait_for(|state| state.generation == 1 && !state.loading).await.expect("Session state closed.");
	session.search("j");

	let state = rx
		.wait_for(|state| state.generation == 2 && !state.loading)
		.await
		.expect("Session state closed.")
		.clone();

	assert_eq!(state.error.as_deref(), Some("Search query must be at least 2 characters"));
	assert_eq!(result_names(&state), vec!["Jane"]);
	assert_eq!(store.prefix_queries(), vec!["jane".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn superseded_outcome_is_dropped() {
	let store = Arc::new(MemoryStore {
		delay: Duration::from_secs(1),
		..MemoryStore::with_users(vec![user("u1", "Jane"), user("u2", "Bob")])
	});
	let session = session_for(store.clone());
	let mut rx = session.subscribe();

	session.search("jane");
	// Past the debounce, so the first lookup is already in flight.
	tokio::time::sleep(Duration::from_millis(500)).await;
	session.search("bob");

	let state = rx
		.wait_for(|state| state.generation == 2 && !state.loading)
		.await
		.expect("Session state closed.")
		.clone();

	assert_eq!(result_names(&state), vec!["Bob"]);

	tokio::time::sleep(Duration::from_secs(2)).await;

	assert_eq!(store.prefix_queries(), vec!["jane".to_string(), "bob".to_string()]);
	assert_eq!(result_names(&session.snapshot()), vec!["Bob"]);
}

#[tokio::test(start_paused = true)]
async fn backend_failure_sets_error_and_clears_results() {
	let store = Arc::new(MemoryStore::failing());
	let session = session_for(store);
	let mut rx = session.subscribe();

	session.search("jane");

	let state = rx
		.wait_for(|state| state.generation == 1 && !state.loading)
		.await
		.expect("Session state closed.")
		.clone();

	assert!(state.results.is_empty());
	assert!(state.error.as_deref().is_some_and(|message| message.starts_with("Storage error:")));
}

#[tokio::test(start_paused = true)]
async fn clearing_and_dropping_cancel_the_pending_search() {
	let store = Arc::new(MemoryStore::with_users(vec![user("u1", "Jane")]));
	let session = session_for(store.clone());

	session.search("jane");
	session.clear_results();

	let state = session.snapshot();

	assert_eq!(state.generation, 2);
	assert!(!state.loading);

	session.search("jane");
	drop(session);
	tokio::time::sleep(Duration::from_secs(1)).await;

	assert_eq!(store.calls(), 0);
}
