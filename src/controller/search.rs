//! Debounced Item Search
//!
//! Wraps the `search_items` procedure behind a debounce window so a
//! keystroke burst costs one remote call. Each query bumps a sequence
//! number; debounce timers and in-flight responses check it before
//! touching state, so superseded queries are discarded rather than
//! racing the newest one.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use crate::gateway::{Procedures, SearchHit};

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Default)]
struct SearchState {
    query: String,
    results: Vec<SearchHit>,
    loading: bool,
    error: Option<String>,
    seq: u64,
}

/// Live search feed over the household's items
#[derive(Clone)]
pub struct SearchFeed {
    procedures: Arc<dyn Procedures>,
    debounce: Duration,
    state: Arc<Mutex<SearchState>>,
}

impl SearchFeed {
    pub fn new(procedures: Arc<dyn Procedures>) -> Self {
        Self::with_debounce(procedures, DEFAULT_DEBOUNCE)
    }

    pub fn with_debounce(procedures: Arc<dyn Procedures>, debounce: Duration) -> Self {
        Self {
            procedures,
            debounce,
            state: Arc::new(Mutex::new(SearchState::default())),
        }
    }

    /// Record a new query and schedule its remote call after the
    /// debounce window. A blank query clears results immediately with
    /// no remote call.
    pub fn search(&self, query: &str) {
        let trimmed = query.trim().to_string();
        let seq = {
            let mut state = self.lock();
            state.query = query.to_string();
            state.seq += 1;
            if trimmed.is_empty() {
                state.results.clear();
                state.loading = false;
                state.error = None;
                return;
            }
            state.loading = true;
            state.seq
        };

        let procedures = Arc::clone(&self.procedures);
        let state = Arc::clone(&self.state);
        let debounce = self.debounce;
        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if state.lock().expect("search state poisoned").seq != seq {
                debug!(query = %trimmed, "query superseded before dispatch");
                return;
            }
            let outcome = procedures.search_items(&trimmed).await;
            let mut state = state.lock().expect("search state poisoned");
            if state.seq != seq {
                debug!(query = %trimmed, "stale response discarded");
                return;
            }
            state.loading = false;
            match outcome {
                Ok(results) => {
                    state.error = None;
                    state.results = results;
                }
                Err(e) => {
                    state.error = Some(e.to_string());
                }
            }
        });
    }

    pub fn query(&self) -> String {
        self.lock().query.clone()
    }

    pub fn results(&self) -> Vec<SearchHit> {
        self.lock().results.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SearchState> {
        self.state.lock().expect("search state poisoned")
    }
}
