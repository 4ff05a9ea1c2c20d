//! Debounced interactive search.
//!
//! Each keystroke goes through [`SearchSession::search`]. Only the last text typed within the
//! debounce window reaches the backends, and completions that belong to a superseded request are
//! dropped by [`SearchState::apply`].

use std::{
	sync::{
		Arc, Mutex,
		atomic::{AtomicU64, Ordering},
	},
	time::Duration,
};

use tokio::{sync::watch, task::JoinHandle};

use crate::{Error, FamRankService, ResultSource, SearchRequest, SearchResponse};
use famrank_domain::ScoredUser;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
	/// Generation of the latest request this state accepted.
	pub generation: u64,
	pub loading: bool,
	pub error: Option<String>,
	pub results: Vec<ScoredUser>,
	pub source: Option<ResultSource>,
}
impl SearchState {
	/// Applies an event and reports whether the state changed.
	///
	/// `Started` and `Cleared` move the state to a newer generation. Outcomes only land when their
	/// generation is still the current one.
	pub fn apply(&mut self, event: SearchEvent) -> bool {
		match event {
			SearchEvent::Started { generation } => {
				if generation < self.generation {
					return false;
				}

				self.generation = generation;
				self.loading = true;
			},
			SearchEvent::Cleared { generation } => {
				if generation < self.generation {
					return false;
				}

				self.generation = generation;
				self.loading = false;
				self.error = None;
				self.results.clear();
				self.source = None;
			},
			SearchEvent::Rejected { generation, message } => {
				if generation != self.generation {
					return false;
				}

				self.loading = false;
				self.error = Some(message);
			},
			SearchEvent::Completed { generation, response } => {
				if generation != self.generation {
					return false;
				}

				self.loading = false;
				self.error = None;
				self.results = response.results;
				self.source = response.source;
			},
			SearchEvent::Failed { generation, message } => {
				if generation != self.generation {
					return false;
				}

				self.loading = false;
				self.error = Some(message);
				self.results.clear();
				self.source = None;
			},
		}

		true
	}
}

#[derive(Debug, Clone)]
pub enum SearchEvent {
	Started { generation: u64 },
	Cleared { generation: u64 },
	/// The query failed validation. Displayed results stay.
	Rejected { generation: u64, message: String },
	Completed { generation: u64, response: SearchResponse },
	Failed { generation: u64, message: String },
}

pub struct SearchSession {
	service: Arc<FamRankService>,
	debounce: Duration,
	state: Arc<watch::Sender<SearchState>>,
	next_generation: AtomicU64,
	pending: Mutex<Option<JoinHandle<()>>>,
}
impl SearchSession {
	pub fn new(service: Arc<FamRankService>, debounce: Duration) -> Self {
		let (state, _) = watch::channel(SearchState::default());

		Self {
			service,
			debounce,
			state: Arc::new(state),
			next_generation: AtomicU64::new(0),
			pending: Mutex::new(None),
		}
	}

	pub fn from_config(service: Arc<FamRankService>) -> Self {
		let debounce = Duration::from_millis(service.cfg.search.debounce_ms);

		Self::new(service, debounce)
	}

	pub fn subscribe(&self) -> watch::Receiver<SearchState> {
		self.state.subscribe()
	}

	pub fn snapshot(&self) -> SearchState {
		self.state.borrow().clone()
	}

	/// Schedules a search for `query` after the debounce delay, cancelling any search scheduled
	/// earlier. Blank input clears the state without scheduling anything.
	///
	/// Must be called from within a tokio runtime.
	pub fn search(&self, query: &str) {
		let mut pending = self.pending.lock().unwrap_or_else(|err| err.into_inner());
		let generation = self.bump_generation(&mut pending);

		if query.trim().is_empty() {
			self.state.send_if_modified(|state| state.apply(SearchEvent::Cleared { generation }));

			return;
		}

		self.state.send_if_modified(|state| state.apply(SearchEvent::Started { generation }));

		let service = self.service.clone();
		let state = self.state.clone();
		let debounce = self.debounce;
		let request = SearchRequest { query: query.to_string() };

		*pending = Some(tokio::spawn(async move {
			tokio::time::sleep(debounce).await;

			// A fired search outlives later input. Its outcome is dropped by generation instead.
			tokio::spawn(run_search(service, state, generation, request));
		}));
	}

	pub fn clear_results(&self) {
		let mut pending = self.pending.lock().unwrap_or_else(|err| err.into_inner());
		let generation = self.bump_generation(&mut pending);

		self.state.send_if_modified(|state| state.apply(SearchEvent::Cleared { generation }));
	}

	fn bump_generation(&self, pending: &mut Option<JoinHandle<()>>) -> u64 {
		if let Some(handle) = pending.take() {
			handle.abort();
		}

		self.next_generation.fetch_add(1, Ordering::SeqCst) + 1
	}
}
impl Drop for SearchSession {
	fn drop(&mut self) {
		let pending = self.pending.get_mut().unwrap_or_else(|err| err.into_inner());

		if let Some(handle) = pending.take() {
			handle.abort();
		}
	}
}

async fn run_search(
	service: Arc<FamRankService>,
	state: Arc<watch::Sender<SearchState>>,
	generation: u64,
	request: SearchRequest,
) {
	let event = match service.search(request).await {
		Ok(response) => SearchEvent::Completed { generation, response },
		Err(err @ Error::QueryTooShort { .. }) =>
			SearchEvent::Rejected { generation, message: err.to_string() },
		Err(err) => {
			tracing::warn!(error = %err, generation, "User search failed.");

			SearchEvent::Failed { generation, message: err.to_string() }
		},
	};

	if !state.send_if_modified(|current| current.apply(event)) {
		tracing::debug!(generation, "Dropped a superseded search outcome.");
	}
}
