//! Session view state and the single owner that mutates it.
//!
//! Remote calls run as spawned tasks; each one reports back through one
//! unbounded channel as a [`SessionEvent`]. All state changes happen in
//! [`Session::apply`], on the thread that owns the `Session`, so completions
//! are applied strictly one at a time.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::api::{ApiError, MovieService, SearchOutcome};
use crate::constants::constants;
use crate::language::Language;
use crate::models::{MovieDetail, MovieSummary};
use crate::navigation::Navigator;
use crate::search::SearchController;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
  #[default]
  Browse,
  Detail,
}

/// Everything the UI renders. Read it through [`Session::state`]; change it
/// through the `Session` entry points.
#[derive(Debug, Default)]
pub struct SessionViewState {
  pub view: View,
  pub trending: Vec<MovieSummary>,
  /// Present iff `view == View::Detail`.
  pub selected: Option<MovieDetail>,
  pub recommendations: Vec<MovieSummary>,
  pub trailer_url: Option<String>,
  pub query: String,
  pub suggestions: Vec<MovieSummary>,
  pub did_you_mean: Option<String>,
  pub language: Language,
  pub loading: bool,
  /// Banner for the most recent navigation-level failure.
  pub error: Option<String>,
  /// Transient notice, cleared by the next user action.
  pub info: Option<String>,
}

impl SessionViewState {
  pub fn new(language: Language) -> Self {
    Self { language, ..Self::default() }
  }

  /// First trending movie, featured at the top of the browse view.
  pub fn hero(&self) -> Option<&MovieSummary> {
    self.trending.first()
  }

  /// `view` and `selected` agree, and detail-only data is absent in Browse.
  pub fn is_consistent(&self) -> bool {
    let detail = self.view == View::Detail;
    detail == self.selected.is_some()
      && (detail || (self.recommendations.is_empty() && self.trailer_url.is_none()))
  }
}

/// Completion of a spawned remote call or timer, tagged with the generation
/// that was current when it was issued.
#[derive(Debug)]
pub enum SessionEvent {
  TrendingLoaded { generation: u64, language: Language, result: Result<Vec<MovieSummary>, ApiError> },
  SearchDue { ticket: u64 },
  SearchFinished { generation: u64, query: String, result: Result<SearchOutcome, ApiError> },
  DetailLoaded { generation: u64, id: u64, result: Result<MovieDetail, ApiError> },
  RecommendationsLoaded { generation: u64, id: u64, result: Result<Vec<MovieSummary>, ApiError> },
  TrailerLoaded { generation: u64, id: u64, result: Result<Option<String>, ApiError> },
}

/// Monotonic request counter for one logical request stream.
#[derive(Debug, Default)]
pub struct Generation(u64);

impl Generation {
  /// Supersede everything issued so far and return the new current value.
  pub fn advance(&mut self) -> u64 {
    self.0 += 1;
    self.0
  }

  pub fn current(&self) -> u64 {
    self.0
  }

  pub fn is_current(&self, generation: u64) -> bool {
    self.0 == generation
  }
}

/// Spawns remote calls and timers whose results come back as [`SessionEvent`]s.
pub struct Tasks<S> {
  service: Arc<S>,
  tx: mpsc::UnboundedSender<SessionEvent>,
}

impl<S> Clone for Tasks<S> {
  fn clone(&self) -> Self {
    Self { service: Arc::clone(&self.service), tx: self.tx.clone() }
  }
}

impl<S: MovieService> Tasks<S> {
  pub fn spawn<F, Fut>(&self, job: F) -> JoinHandle<()>
  where
    F: FnOnce(Arc<S>) -> Fut,
    Fut: Future<Output = SessionEvent> + Send + 'static,
  {
    let fut = job(Arc::clone(&self.service));
    let tx = self.tx.clone();
    tokio::spawn(async move {
      // The receiver only goes away with the session.
      let _ = tx.send(fut.await);
    })
  }

  /// Deliver `event` once `delay` has passed, measured from this call.
  pub fn send_after(&self, delay: Duration, event: SessionEvent) -> JoinHandle<()> {
    let deadline = Instant::now() + delay;
    let tx = self.tx.clone();
    tokio::spawn(async move {
      tokio::time::sleep_until(deadline).await;
      let _ = tx.send(event);
    })
  }
}

pub struct Session<S> {
  state: SessionViewState,
  search: SearchController,
  nav: Navigator,
  tasks: Tasks<S>,
  events: mpsc::UnboundedReceiver<SessionEvent>,
}

impl<S: MovieService> Session<S> {
  pub fn new(service: Arc<S>, language: Language) -> Self {
    let (tx, events) = mpsc::unbounded_channel();
    let c = constants();
    Self {
      state: SessionViewState::new(language),
      search: SearchController::new(c.search_debounce(), c.suggestion_limit),
      nav: Navigator::default(),
      tasks: Tasks { service, tx },
      events,
    }
  }

  pub fn state(&self) -> &SessionViewState {
    &self.state
  }

  /// Enter Browse for the first time: load trending for the current language.
  pub fn start(&mut self) {
    info!(language = self.state.language.code(), "session: start");
    self.nav.refresh_trending(&mut self.state, &self.tasks);
  }

  pub fn set_query(&mut self, text: &str) {
    self.state.info = None;
    self.search.on_query_changed(&mut self.state, text, &self.tasks);
  }

  /// Replace the query with the service's spelling correction.
  pub fn accept_correction(&mut self) {
    if let Some(correction) = self.state.did_you_mean.clone() {
      self.set_query(&correction);
    }
  }

  pub fn open_movie(&mut self, id: u64) {
    self.state.info = None;
    self.nav.open_movie(id, &mut self.state, &self.tasks);
  }

  pub fn go_home(&mut self) {
    self.state.info = None;
    self.nav.go_home(&mut self.state, &self.tasks);
  }

  pub fn change_language(&mut self, language: Language) {
    self.state.info = None;
    self.nav.change_language(language, &mut self.state, &self.tasks);
  }

  pub fn request_trailer(&mut self) {
    self.state.info = None;
    self.nav.request_trailer(&mut self.state, &self.tasks);
  }

  pub fn dismiss_trailer(&mut self) {
    self.nav.dismiss_trailer(&mut self.state);
  }

  /// Apply every completion that has already arrived. Returns whether any did.
  pub fn check_pending(&mut self) -> bool {
    let mut applied = false;
    while let Ok(event) = self.events.try_recv() {
      self.apply(event);
      applied = true;
    }
    applied
  }

  /// Wait for the next completion and apply it.
  #[cfg(test)]
  pub async fn process_next(&mut self) {
    // Session holds a sender, so the channel never closes while we wait.
    if let Some(event) = self.events.recv().await {
      self.apply(event);
    }
  }

  pub fn apply(&mut self, event: SessionEvent) {
    match event {
      SessionEvent::TrendingLoaded { generation, language, result } => {
        self.nav.on_trending_loaded(generation, language, result, &mut self.state);
      }
      SessionEvent::SearchDue { ticket } => {
        self.search.on_timer_fired(ticket, &self.state, &self.tasks);
      }
      SessionEvent::SearchFinished { generation, query, result } => {
        self.search.on_search_finished(generation, &query, result, &mut self.state);
      }
      SessionEvent::DetailLoaded { generation, id, result } => {
        if self.nav.on_detail_loaded(generation, id, result, &mut self.state) {
          self.search.reset(&mut self.state);
          self.nav.fetch_recommendations(id, &self.tasks);
        }
      }
      SessionEvent::RecommendationsLoaded { generation, id, result } => {
        self.nav.on_recommendations_loaded(generation, id, result, &mut self.state);
      }
      SessionEvent::TrailerLoaded { generation, id, result } => {
        self.nav.on_trailer_loaded(generation, id, result, &mut self.state);
      }
    }
    debug_assert!(self.state.is_consistent(), "view/selected out of sync");
    debug!(view = ?self.state.view, loading = self.state.loading, "session: event applied");
  }
}
