//! Live search: debounce the query, keep at most one request in flight, and
//! publish suggestions plus the service's spelling correction.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{ApiError, MovieService, SearchOutcome};
use crate::session::{Generation, SessionEvent, SessionViewState, Tasks};

pub struct SearchController {
  debounce: Duration,
  limit: usize,
  /// Identity of the pending debounce timer. Only the latest one may fire.
  ticket: Generation,
  timer: Option<JoinHandle<()>>,
  /// Identity of the current search request.
  generation: Generation,
  in_flight: Option<CancellationToken>,
}

impl SearchController {
  pub fn new(debounce: Duration, limit: usize) -> Self {
    Self { debounce, limit, ticket: Generation::default(), timer: None, generation: Generation::default(), in_flight: None }
  }

  pub fn on_query_changed<S: MovieService>(&mut self, state: &mut SessionViewState, text: &str, tasks: &Tasks<S>) {
    state.query = text.to_string();
    self.cancel_timer();

    if text.trim().is_empty() {
      self.cancel_in_flight();
      state.suggestions.clear();
      state.did_you_mean = None;
      return;
    }

    let ticket = self.ticket.advance();
    self.timer = Some(tasks.send_after(self.debounce, SessionEvent::SearchDue { ticket }));
  }

  pub fn on_timer_fired<S: MovieService>(&mut self, ticket: u64, state: &SessionViewState, tasks: &Tasks<S>) {
    if !self.ticket.is_current(ticket) {
      debug!(ticket, "search: superseded debounce timer ignored");
      return;
    }
    self.timer = None;

    let query = state.query.trim().to_string();
    if query.is_empty() {
      return;
    }

    self.cancel_in_flight();
    let generation = self.generation.advance();
    let token = CancellationToken::new();
    self.in_flight = Some(token.clone());
    info!(query = %query, generation, "search: issuing request");

    tasks.spawn(move |service| async move {
      let result = service.search(&query, token).await;
      SessionEvent::SearchFinished { generation, query, result }
    });
  }

  pub fn on_search_finished(
    &mut self,
    generation: u64,
    query: &str,
    result: Result<SearchOutcome, ApiError>,
    state: &mut SessionViewState,
  ) {
    if !self.generation.is_current(generation) {
      debug!(query = %query, generation, "search: stale response discarded");
      return;
    }
    self.in_flight = None;

    match result {
      Ok(SearchOutcome::Completed(found)) => {
        debug!(query = %query, hits = found.movies.len(), did_you_mean = ?found.did_you_mean, "search: results");
        state.suggestions = found.movies.into_iter().take(self.limit).collect();
        state.did_you_mean = found.did_you_mean;
      }
      Ok(SearchOutcome::Canceled) => {
        debug!(query = %query, "search: canceled");
      }
      Err(e) => {
        warn!(query = %query, err = %e, "search: request failed");
      }
    }
  }

  /// Drop all search state, as when a movie is opened.
  pub fn reset(&mut self, state: &mut SessionViewState) {
    self.cancel_timer();
    self.cancel_in_flight();
    state.query.clear();
    state.suggestions.clear();
    state.did_you_mean = None;
  }

  fn cancel_timer(&mut self) {
    if let Some(handle) = self.timer.take() {
      handle.abort();
    }
    // A timer that already fired may have its event queued; retire its ticket.
    self.ticket.advance();
  }

  /// Cancel the outstanding request and make any late result from it inert.
  fn cancel_in_flight(&mut self) {
    if let Some(token) = self.in_flight.take() {
      debug!(generation = self.generation.current(), "search: canceling in-flight request");
      token.cancel();
    }
    self.generation.advance();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::ApiError;
  use crate::language::Language;
  use crate::models::{SearchResult, movie};
  use crate::session::Session;
  use crate::testing::{Call, FakeService};
  use std::sync::Arc;
  use tokio::time::Instant;

  const DEBOUNCE: Duration = Duration::from_millis(300);

  fn session(fake: &Arc<FakeService>) -> Session<FakeService> {
    Session::new(Arc::clone(fake), Language::En)
  }

  fn found(titles: &[(u64, &str)], did_you_mean: Option<&str>) -> Result<SearchOutcome, ApiError> {
    Ok(SearchOutcome::Completed(SearchResult {
      movies: titles.iter().map(|(id, t)| movie(*id, t)).collect(),
      did_you_mean: did_you_mean.map(str::to_string),
    }))
  }

  fn titles(state: &SessionViewState) -> Vec<&str> {
    state.suggestions.iter().map(|m| m.title.as_str()).collect()
  }

  /// Let spawned tasks run without moving the paused clock.
  async fn settle() {
    for _ in 0..10 {
      tokio::task::yield_now().await;
    }
  }

  #[tokio::test(start_paused = true)]
  async fn typed_query_populates_suggestions_and_correction() {
    let fake = Arc::new(FakeService::default());
    let mut s = session(&fake);

    s.set_query("bat");
    s.process_next().await; // debounce fires
    fake.reply_search("bat", found(&[(5, "Batman")], Some("batman"))).await;
    s.process_next().await;

    assert_eq!(titles(s.state()), ["Batman"]);
    assert_eq!(s.state().did_you_mean.as_deref(), Some("batman"));
    assert!(s.state().error.is_none());
  }

  #[tokio::test(start_paused = true)]
  async fn padded_query_is_sent_trimmed_but_shown_as_typed() {
    let fake = Arc::new(FakeService::default());
    let mut s = session(&fake);

    s.set_query("  dark knight ");
    s.process_next().await;
    fake.reply_search("dark knight", found(&[(155, "The Dark Knight")], None)).await;
    s.process_next().await;

    assert_eq!(fake.search_queries(), ["dark knight"]);
    assert_eq!(s.state().query, "  dark knight ");
    assert_eq!(titles(s.state()), ["The Dark Knight"]);
  }

  #[tokio::test(start_paused = true)]
  async fn burst_collapses_into_one_request_for_final_text() {
    let fake = Arc::new(FakeService::default());
    let mut s = session(&fake);

    s.set_query("b");
    tokio::time::advance(Duration::from_millis(100)).await;
    s.set_query("ba");
    tokio::time::advance(Duration::from_millis(100)).await;
    s.set_query("bat");
    let typed_at = Instant::now();
    settle().await;
    assert!(!s.check_pending(), "no timer may fire inside the burst");

    s.process_next().await;
    assert!(typed_at.elapsed() >= DEBOUNCE);
    fake.wait_for(&Call::Search("bat".to_string())).await;
    settle().await;

    assert_eq!(fake.search_queries(), ["bat"]);
  }

  #[tokio::test(start_paused = true)]
  async fn nothing_is_issued_before_the_interval() {
    let fake = Arc::new(FakeService::default());
    let mut s = session(&fake);

    s.set_query("dune");
    tokio::time::advance(DEBOUNCE - Duration::from_millis(1)).await;
    settle().await;
    assert!(!s.check_pending());
    assert!(fake.search_queries().is_empty());

    tokio::time::advance(Duration::from_millis(1)).await;
    settle().await;
    assert!(s.check_pending());
    fake.wait_for(&Call::Search("dune".to_string())).await;
  }

  #[tokio::test(start_paused = true)]
  async fn typed_then_deleted_issues_nothing() {
    let fake = Arc::new(FakeService::default());
    let mut s = session(&fake);

    s.set_query("x");
    tokio::time::advance(Duration::from_millis(50)).await;
    s.set_query("");
    tokio::time::advance(DEBOUNCE * 2).await;
    settle().await;
    s.check_pending();

    assert!(fake.search_queries().is_empty());
    assert!(s.state().suggestions.is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn empty_query_clears_and_cancels_in_flight() {
    let fake = Arc::new(FakeService::default());
    let mut s = session(&fake);

    s.set_query("bat");
    s.process_next().await;
    fake.reply_search("bat", found(&[(5, "Batman")], Some("batman"))).await;
    s.process_next().await;
    assert_eq!(titles(s.state()), ["Batman"]);

    s.set_query("batm");
    s.process_next().await;
    fake.wait_for(&Call::Search("batm".to_string())).await;

    s.set_query("   ");
    assert!(s.state().suggestions.is_empty());
    assert!(s.state().did_you_mean.is_none());

    // The canceled request reports back; it must change nothing.
    s.process_next().await;
    assert!(fake.was_canceled("batm"));
    assert!(s.state().suggestions.is_empty());
    assert!(s.state().did_you_mean.is_none());
    assert!(s.state().error.is_none());
  }

  #[tokio::test(start_paused = true)]
  async fn superseding_search_cancels_the_previous_request() {
    let fake = Arc::new(FakeService::default());
    let mut s = session(&fake);

    s.set_query("star");
    s.process_next().await;
    fake.wait_for(&Call::Search("star".to_string())).await;

    s.set_query("star wars");
    s.process_next().await; // timer fires, "star" gets canceled
    fake.wait_for(&Call::Search("star wars".to_string())).await;
    s.process_next().await; // canceled outcome from "star", discarded
    assert!(fake.was_canceled("star"));

    fake.reply_search("star wars", found(&[(11, "Star Wars")], None)).await;
    s.process_next().await;
    assert_eq!(titles(s.state()), ["Star Wars"]);
    assert!(s.state().error.is_none());
  }

  #[tokio::test(start_paused = true)]
  async fn late_result_from_older_request_is_discarded() {
    let fake = Arc::new(FakeService::ignoring_cancellation());
    let mut s = session(&fake);

    s.set_query("avat");
    s.process_next().await;
    fake.wait_for(&Call::Search("avat".to_string())).await;

    s.set_query("alien");
    s.process_next().await;
    fake.wait_for(&Call::Search("alien".to_string())).await;

    fake.reply_search("alien", found(&[(348, "Alien")], None)).await;
    s.process_next().await;
    fake.reply_search("avat", found(&[(19995, "Avatar")], Some("avatar"))).await;
    s.process_next().await;

    assert_eq!(titles(s.state()), ["Alien"]);
    assert!(s.state().did_you_mean.is_none());
  }

  #[tokio::test(start_paused = true)]
  async fn suggestions_capped_at_limit() {
    let fake = Arc::new(FakeService::default());
    let mut s = session(&fake);
    let many: Vec<(u64, String)> = (1..=15).map(|i| (i, format!("Movie {}", i))).collect();
    let refs: Vec<(u64, &str)> = many.iter().map(|(i, t)| (*i, t.as_str())).collect();

    s.set_query("movie");
    s.process_next().await;
    fake.reply_search("movie", found(&refs, None)).await;
    s.process_next().await;

    assert_eq!(s.state().suggestions.len(), 8);
    assert_eq!(s.state().suggestions[0].id, 1);
    assert_eq!(s.state().suggestions[7].id, 8);
  }

  #[tokio::test(start_paused = true)]
  async fn next_response_replaces_rather_than_merges() {
    let fake = Arc::new(FakeService::default());
    let mut s = session(&fake);

    s.set_query("matrix");
    s.process_next().await;
    fake.reply_search("matrix", found(&[(603, "The Matrix"), (604, "The Matrix Reloaded")], Some("the matrix"))).await;
    s.process_next().await;

    s.set_query("matrix rev");
    s.process_next().await;
    fake.reply_search("matrix rev", found(&[(605, "The Matrix Revolutions")], None)).await;
    s.process_next().await;

    assert_eq!(titles(s.state()), ["The Matrix Revolutions"]);
    assert!(s.state().did_you_mean.is_none());
  }

  #[tokio::test(start_paused = true)]
  async fn search_failure_is_not_a_session_error() {
    let fake = Arc::new(FakeService::default());
    let mut s = session(&fake);

    s.set_query("oops");
    s.process_next().await;
    fake.reply_search("oops", Err(ApiError::Service { status: 500, message: "boom".to_string() })).await;
    s.process_next().await;

    assert!(s.state().error.is_none());
    assert!(s.state().suggestions.is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn accepting_correction_searches_for_it() {
    let fake = Arc::new(FakeService::default());
    let mut s = session(&fake);

    s.set_query("batmn");
    s.process_next().await;
    fake.reply_search("batmn", found(&[(5, "Batman")], Some("Batman"))).await;
    s.process_next().await;

    s.accept_correction();
    assert_eq!(s.state().query, "Batman");
    s.process_next().await;
    fake.wait_for(&Call::Search("Batman".to_string())).await;
  }
}
