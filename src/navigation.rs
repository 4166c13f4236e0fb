//! Browse/Detail navigation.
//!
//! Trending and detail are the two "entering a screen" fetches: they drive
//! `loading` and own the error banner. Recommendations and trailers are
//! secondary and fail silently. Each stream carries its own [`Generation`];
//! a response is applied only if its generation is still current.

use tracing::{debug, info, warn};

use crate::api::{ApiError, MovieService};
use crate::constants::constants;
use crate::language::Language;
use crate::models::{MovieDetail, MovieSummary};
use crate::session::{Generation, SessionEvent, SessionViewState, Tasks, View};

#[derive(Debug, Default)]
pub struct Navigator {
  trending: Generation,
  detail: Generation,
  /// Advanced only when the shown movie changes, so a failed open keeps them.
  recommendations: Generation,
  trailer: Generation,
  trending_pending: bool,
  detail_pending: bool,
}

impl Navigator {
  pub fn refresh_trending<S: MovieService>(&mut self, state: &mut SessionViewState, tasks: &Tasks<S>) {
    let generation = self.trending.advance();
    let language = state.language;
    self.trending_pending = true;
    self.sync_loading(state);
    info!(language = language.code(), generation, "nav: loading trending");

    tasks.spawn(move |service| async move {
      let result = service.fetch_trending(language).await;
      SessionEvent::TrendingLoaded { generation, language, result }
    });
  }

  pub fn change_language<S: MovieService>(
    &mut self,
    language: Language,
    state: &mut SessionViewState,
    tasks: &Tasks<S>,
  ) {
    if state.language == language {
      return;
    }
    info!(from = state.language.code(), to = language.code(), "nav: language changed");
    state.language = language;
    self.refresh_trending(state, tasks);
  }

  pub fn on_trending_loaded(
    &mut self,
    generation: u64,
    language: Language,
    result: Result<Vec<MovieSummary>, ApiError>,
    state: &mut SessionViewState,
  ) {
    if !self.trending.is_current(generation) {
      debug!(language = language.code(), generation, "nav: stale trending response discarded");
      return;
    }
    self.trending_pending = false;
    self.sync_loading(state);

    match result {
      Ok(movies) => {
        info!(language = language.code(), count = movies.len(), "nav: trending loaded");
        state.trending = movies;
        state.error = None;
      }
      Err(e) => {
        // The previous list stays on screen under the banner.
        warn!(language = language.code(), err = %e, "nav: trending failed");
        state.error = Some(constants().trending_error.clone());
      }
    }
  }

  pub fn open_movie<S: MovieService>(&mut self, id: u64, state: &mut SessionViewState, tasks: &Tasks<S>) {
    let generation = self.detail.advance();
    self.detail_pending = true;
    self.sync_loading(state);
    info!(movie_id = id, generation, "nav: opening movie");

    tasks.spawn(move |service| async move {
      let result = service.fetch_detail(id).await;
      SessionEvent::DetailLoaded { generation, id, result }
    });
  }

  /// Returns true when the session entered (or re-entered) Detail for `id`.
  pub fn on_detail_loaded(
    &mut self,
    generation: u64,
    id: u64,
    result: Result<MovieDetail, ApiError>,
    state: &mut SessionViewState,
  ) -> bool {
    if !self.detail.is_current(generation) {
      debug!(movie_id = id, generation, "nav: stale detail response discarded");
      return false;
    }
    self.detail_pending = false;
    self.sync_loading(state);

    match result {
      Ok(detail) => {
        info!(movie_id = id, title = %detail.summary.title, "nav: entered detail");
        self.recommendations.advance();
        self.trailer.advance();
        state.selected = Some(detail);
        state.recommendations.clear();
        state.trailer_url = None;
        state.view = View::Detail;
        state.error = None;
        true
      }
      Err(e) => {
        warn!(movie_id = id, err = %e, "nav: detail failed");
        state.error = Some(constants().detail_error.clone());
        false
      }
    }
  }

  /// Follow-up fetch after entering Detail.
  pub fn fetch_recommendations<S: MovieService>(&self, id: u64, tasks: &Tasks<S>) {
    let generation = self.recommendations.current();
    tasks.spawn(move |service| async move {
      let result = service.fetch_recommendations(id).await;
      SessionEvent::RecommendationsLoaded { generation, id, result }
    });
  }

  pub fn on_recommendations_loaded(
    &mut self,
    generation: u64,
    id: u64,
    result: Result<Vec<MovieSummary>, ApiError>,
    state: &mut SessionViewState,
  ) {
    if !self.recommendations.is_current(generation) || state.selected.as_ref().map(MovieDetail::id) != Some(id) {
      debug!(movie_id = id, generation, "nav: stale recommendations discarded");
      return;
    }
    match result {
      Ok(movies) => {
        debug!(movie_id = id, count = movies.len(), "nav: recommendations loaded");
        state.recommendations = movies;
      }
      Err(e) => {
        warn!(movie_id = id, err = %e, "nav: recommendations failed");
      }
    }
  }

  pub fn go_home<S: MovieService>(&mut self, state: &mut SessionViewState, tasks: &Tasks<S>) {
    info!("nav: home");
    // Nothing still in flight may pull us back into Detail.
    self.detail.advance();
    self.detail_pending = false;
    self.recommendations.advance();
    self.trailer.advance();

    state.selected = None;
    state.recommendations.clear();
    state.trailer_url = None;
    state.view = View::Browse;
    self.refresh_trending(state, tasks);
  }

  pub fn request_trailer<S: MovieService>(&mut self, state: &mut SessionViewState, tasks: &Tasks<S>) {
    let Some(id) = state.selected.as_ref().map(MovieDetail::id) else { return };
    let generation = self.trailer.advance();
    debug!(movie_id = id, generation, "nav: trailer requested");

    tasks.spawn(move |service| async move {
      let result = service.fetch_trailer_url(id).await;
      SessionEvent::TrailerLoaded { generation, id, result }
    });
  }

  pub fn on_trailer_loaded(
    &mut self,
    generation: u64,
    id: u64,
    result: Result<Option<String>, ApiError>,
    state: &mut SessionViewState,
  ) {
    if !self.trailer.is_current(generation) || state.view != View::Detail {
      debug!(movie_id = id, generation, "nav: stale trailer discarded");
      return;
    }
    match result {
      Ok(Some(url)) => {
        info!(movie_id = id, url = %url, "nav: trailer ready");
        state.trailer_url = Some(url);
      }
      Ok(None) => {
        state.info = Some(constants().trailer_unavailable.clone());
      }
      Err(e) => {
        warn!(movie_id = id, err = %e, "nav: trailer lookup failed");
        state.info = Some(constants().trailer_unavailable.clone());
      }
    }
  }

  pub fn dismiss_trailer(&mut self, state: &mut SessionViewState) {
    self.trailer.advance();
    state.trailer_url = None;
  }

  fn sync_loading(&self, state: &mut SessionViewState) {
    state.loading = self.trending_pending || self.detail_pending;
  }
}
