//! Catalog session orchestration.
//!
//! The session owns the loaded source list, the currently open source, and
//! the normalized items for it. Overlapping `open_source` calls follow a
//! "last request wins" discipline: every dispatched fetch is tagged with the
//! session generation at dispatch time, and a result (success or failure) is
//! applied only if its tag still matches on arrival. Closing the view also
//! advances the generation, so in-flight results for a closed source are
//! discarded rather than resurrected.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::FetchError;
use crate::fetch::CatalogFetcher;
use crate::normalize::normalize;
use crate::types::{Item, Source};

/// What the detail view should currently render.
#[derive(Debug, Clone)]
pub enum CatalogView {
    /// No source is open.
    Idle,
    /// A fetch for the active source is in flight.
    Loading,
    /// Normalized items for the active source. May be empty, which renders
    /// as "no items found", not as an error.
    Loaded(Vec<Item>),
    /// The active source failed to load. A cross-origin block gets a
    /// different remedy (open externally / copy URL) than a generic failure.
    Failed(FetchError),
}

/// How an `open_source` call concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The result was applied to the session; carries the item count.
    Applied(usize),
    /// A newer request (or a close) superseded this one; its result was
    /// discarded on arrival.
    Superseded,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No source at index {0}")]
    UnknownSource(usize),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

struct SessionState {
    active: Option<usize>,
    view: CatalogView,
    generation: u64,
}

/// Orchestrates source selection, fetching, normalization, and search.
pub struct CatalogSession {
    fetcher: Arc<dyn CatalogFetcher>,
    /// Read-only after load; shared freely with the availability prober.
    sources: Arc<[Source]>,
    state: Mutex<SessionState>,
}

impl CatalogSession {
    pub fn new(sources: Vec<Source>, fetcher: Arc<dyn CatalogFetcher>) -> Self {
        Self {
            fetcher,
            sources: sources.into(),
            state: Mutex::new(SessionState {
                active: None,
                view: CatalogView::Idle,
                generation: 0,
            }),
        }
    }

    /// The full unfiltered source list, in registry order.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// The source currently open in the detail view, if any.
    pub fn active_source(&self) -> Option<Source> {
        let state = self.state.lock().unwrap();
        state.active.and_then(|i| self.sources.get(i).cloned())
    }

    /// Snapshot of the current detail view state.
    pub fn view(&self) -> CatalogView {
        self.state.lock().unwrap().view.clone()
    }

    /// Open the source at `index`: fetch its catalog, normalize it, and
    /// replace the session items wholesale on success.
    ///
    /// Sources are addressed by registry index because names are not unique.
    /// If a newer `open_source` or a `close_source` intervenes while the
    /// fetch is in flight, the arriving result is discarded and
    /// [`OpenOutcome::Superseded`] is returned; stale failures are likewise
    /// never surfaced.
    pub async fn open_source(&self, index: usize) -> Result<OpenOutcome, SessionError> {
        let source = self
            .sources
            .get(index)
            .cloned()
            .ok_or(SessionError::UnknownSource(index))?;

        let tag = {
            let mut state = self.state.lock().unwrap();
            state.generation += 1;
            state.active = Some(index);
            state.view = CatalogView::Loading;
            state.generation
        };

        debug!("Opening source {:?} (generation {tag})", source.name);
        let result = self.fetcher.fetch_document(&source.url).await;

        let mut state = self.state.lock().unwrap();
        if state.generation != tag {
            debug!("Discarding stale result for {:?} (generation {tag})", source.name);
            return Ok(OpenOutcome::Superseded);
        }

        match result {
            Ok(document) => {
                let items = normalize(&document);
                let count = items.len();
                state.view = CatalogView::Loaded(items);
                Ok(OpenOutcome::Applied(count))
            }
            Err(error) => {
                state.view = CatalogView::Failed(error.clone());
                Err(SessionError::Fetch(error))
            }
        }
    }

    /// Clear the active source and its items unconditionally.
    pub fn close_source(&self) {
        let mut state = self.state.lock().unwrap();
        state.generation += 1;
        state.active = None;
        state.view = CatalogView::Idle;
    }

    /// Case-insensitive substring filter over source name and URL.
    ///
    /// An empty (or whitespace-only) query is the identity: the full list in
    /// original order. The underlying list is never mutated.
    pub fn filter_sources(&self, query: &str) -> Vec<Source> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.sources.to_vec();
        }
        self.sources
            .iter()
            .filter(|s| {
                s.name.to_lowercase().contains(&needle) || s.url.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Case-insensitive substring filter over item display name and
    /// description. Same empty-query identity behavior as
    /// [`filter_sources`](Self::filter_sources).
    ///
    /// Only meaningful while a catalog is loaded; otherwise yields an empty
    /// list.
    pub fn filter_items(&self, query: &str) -> Vec<Item> {
        let state = self.state.lock().unwrap();
        let CatalogView::Loaded(items) = &state.view else {
            return Vec::new();
        };

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return items.clone();
        }
        items
            .iter()
            .filter(|item| {
                item.display_name.to_lowercase().contains(&needle)
                    || item
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }
}
