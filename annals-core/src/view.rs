//! Detail view lifecycle
//!
//! A view owns at most one in-flight fetch. Every `open` or `close` bumps a
//! generation counter; a fetch only lands if the ticket it was issued with
//! still carries the current generation. Results for a closed or superseded
//! view are dropped without touching state.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

use crate::catalog::Era;
use crate::chronicle::{Chronicler, DetailedRecord};
use crate::error::FetchError;

/// What the detail view currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Closed,
    Loading {
        era: &'static Era,
    },
    Loaded {
        era: &'static Era,
        record: DetailedRecord,
    },
    Failed {
        era: &'static Era,
        message: String,
    },
}

impl ViewState {
    pub fn era(&self) -> Option<&'static Era> {
        match self {
            ViewState::Closed => None,
            ViewState::Loading { era }
            | ViewState::Loaded { era, .. }
            | ViewState::Failed { era, .. } => Some(*era),
        }
    }
}

/// Issued by [`DetailView::open`]; identifies the fetch that may resolve it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    era: &'static Era,
}

impl FetchTicket {
    pub fn era(&self) -> &'static Era {
        self.era
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// State machine for a single detail view
#[derive(Debug)]
pub struct DetailView {
    generation: u64,
    state: ViewState,
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailView {
    pub fn new() -> Self {
        Self {
            generation: 0,
            state: ViewState::Closed,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, ViewState::Closed)
    }

    /// Open the view for an era and enter the loading state
    ///
    /// Any ticket issued earlier becomes stale.
    pub fn open(&mut self, era: &'static Era) -> FetchTicket {
        self.generation += 1;
        self.state = ViewState::Loading { era };
        FetchTicket {
            generation: self.generation,
            era,
        }
    }

    /// Tear the view down; in-flight fetches become no-ops
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = ViewState::Closed;
    }

    /// Apply a fetch result if its ticket is still current
    ///
    /// Returns whether the result was applied.
    pub fn resolve(&mut self, ticket: FetchTicket, result: Result<DetailedRecord, FetchError>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Discarding stale result for {} (ticket generation {}, current {})",
                ticket.era.id, ticket.generation, self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(record) => ViewState::Loaded {
                era: ticket.era,
                record,
            },
            Err(e) => {
                warn!("Detail fetch for {} failed: {}", ticket.era.id, e);
                ViewState::Failed {
                    era: ticket.era,
                    message: e.user_message().to_string(),
                }
            }
        };
        true
    }
}

/// Drives a [`DetailView`] with a shared [`Chronicler`]
///
/// Each `select` spawns the view's single fetch on the current tokio runtime
/// and aborts the fetch it replaces. `dismiss` aborts the pending fetch too.
#[derive(Debug, Clone)]
pub struct ViewSession {
    chronicler: Arc<Chronicler>,
    view: Arc<Mutex<DetailView>>,
    inflight: Arc<Mutex<Option<AbortHandle>>>,
}

impl ViewSession {
    pub fn new(chronicler: Arc<Chronicler>) -> Self {
        Self {
            chronicler,
            view: Arc::new(Mutex::new(DetailView::new())),
            inflight: Arc::new(Mutex::new(None)),
        }
    }

    /// Open the view for an era and start its fetch
    ///
    /// The handle yields whether the result was applied to the view. A handle
    /// from an earlier `select` finishes as cancelled if its fetch was still
    /// running.
    pub async fn select(&self, era: &'static Era) -> JoinHandle<bool> {
        let mut inflight = self.inflight.lock().await;
        if let Some(previous) = inflight.take() {
            previous.abort();
        }

        let ticket = self.view.lock().await.open(era);
        let chronicler = Arc::clone(&self.chronicler);
        let view = Arc::clone(&self.view);

        let handle = tokio::spawn(async move {
            let result = chronicler
                .fetch_details(ticket.era().name, ticket.era().localized_name)
                .await;
            view.lock().await.resolve(ticket, result)
        });
        *inflight = Some(handle.abort_handle());
        handle
    }

    /// Close the view and abort its pending fetch
    ///
    /// A fetch that already finished stays finished; the generation check
    /// keeps its late result off the closed view.
    pub async fn dismiss(&self) {
        let mut inflight = self.inflight.lock().await;
        if let Some(pending) = inflight.take() {
            debug!("Aborting pending detail fetch");
            pending.abort();
        }
        self.view.lock().await.close();
    }

    /// Current view state
    pub async fn snapshot(&self) -> ViewState {
        self.view.lock().await.state().clone()
    }
}
