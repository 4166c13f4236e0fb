use ratatui::widgets::ListState;
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::MovieApi;
use crate::config::Config;
use crate::language::Language;
use crate::models::MovieSummary;
use crate::session::{Session, SessionViewState, View};
use crate::theme::{THEMES, Theme};

/// Which widget receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Search,
  Suggestions,
  Movies,
}

pub struct App {
  pub session: Session<MovieApi>,
  pub focus: Focus,
  pub theme_index: usize,
  /// Cursor within the query, as a char index.
  pub cursor_position: usize,
  pub input_scroll: usize,
  pub suggestion_state: ListState,
  pub movie_state: ListState,
  pub should_quit: bool,
  /// Preferences as loaded at startup.
  config: Config,
}

impl App {
  pub fn new(api: MovieApi, language: Language, config: Config) -> Self {
    let theme_index =
      if let Some(ref name) = config.theme_name { THEMES.iter().position(|t| t.name == name).unwrap_or(0) } else { 0 };

    let mut session = Session::new(Arc::new(api), language);
    session.start();

    Self {
      session,
      focus: Focus::Movies,
      theme_index,
      cursor_position: 0,
      input_scroll: 0,
      suggestion_state: ListState::default(),
      movie_state: ListState::default().with_selected(Some(0)),
      should_quit: false,
      config,
    }
  }

  pub fn state(&self) -> &SessionViewState {
    self.session.state()
  }

  pub fn theme(&self) -> &'static Theme {
    // Safety: theme_index is bounded by modular arithmetic in next_theme()
    // and by position() on initialization.
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.save_config();
  }

  fn save_config(&self) {
    self.config.with_choices(self.theme().name, self.state().language).save();
  }

  /// Apply finished remote calls and keep selections inside the new lists.
  pub fn check_pending(&mut self) {
    let before = self.state().view;
    if self.session.check_pending() {
      let after = self.state().view;
      if before != after {
        // New screen: start at the top and hand focus back to the list.
        self.movie_state.select(Some(0));
        self.focus = Focus::Movies;
      }
      self.clamp_selections();
    }
  }

  fn clamp_selections(&mut self) {
    let query_len = self.state().query.chars().count();
    if self.cursor_position > query_len {
      self.cursor_position = query_len;
      self.input_scroll = 0;
    }

    let suggestions = self.state().suggestions.len();
    match self.suggestion_state.selected() {
      _ if suggestions == 0 => {
        self.suggestion_state.select(None);
        if self.focus == Focus::Suggestions {
          self.focus = Focus::Search;
        }
      }
      Some(i) if i >= suggestions => self.suggestion_state.select(Some(suggestions - 1)),
      _ => {}
    }

    let movies = self.visible_movies().len();
    match self.movie_state.selected() {
      _ if movies == 0 => self.movie_state.select(Some(0)),
      Some(i) if i >= movies => self.movie_state.select(Some(movies - 1)),
      None => self.movie_state.select(Some(0)),
      _ => {}
    }
  }

  /// The list the movie pane shows: trending in Browse, recommendations in Detail.
  pub fn visible_movies(&self) -> &[MovieSummary] {
    match self.state().view {
      View::Browse => &self.state().trending,
      View::Detail => &self.state().recommendations,
    }
  }

  // --- Query editing ---

  pub fn edit_query(&mut self, edit: impl FnOnce(&mut String, &mut usize)) {
    let mut text = self.state().query.clone();
    edit(&mut text, &mut self.cursor_position);
    if text != self.state().query {
      self.session.set_query(&text);
      self.suggestion_state.select(None);
    }
  }

  pub fn accept_correction(&mut self) {
    self.session.accept_correction();
    self.cursor_position = self.state().query.chars().count();
  }

  // --- Navigation ---

  pub fn open_selected_suggestion(&mut self) {
    let idx = self.suggestion_state.selected().unwrap_or(0);
    if let Some(id) = self.state().suggestions.get(idx).map(|m| m.id) {
      self.session.open_movie(id);
    }
  }

  pub fn open_selected_movie(&mut self) {
    let idx = self.movie_state.selected().unwrap_or(0);
    if let Some(id) = self.visible_movies().get(idx).map(|m| m.id) {
      self.session.open_movie(id);
    }
  }

  pub fn open_hero(&mut self) {
    if let Some(id) = self.state().hero().map(|m| m.id) {
      self.session.open_movie(id);
    }
  }

  pub fn go_home(&mut self) {
    self.session.go_home();
    self.movie_state.select(Some(0));
  }

  pub fn next_language(&mut self) {
    self.switch_language(self.state().language.next());
  }

  pub fn prev_language(&mut self) {
    self.switch_language(self.state().language.prev());
  }

  fn switch_language(&mut self, language: Language) {
    self.session.change_language(language);
    self.movie_state.select(Some(0));
    self.save_config();
  }

  pub fn move_movie_selection(&mut self, down: bool) {
    let count = self.visible_movies().len();
    step(&mut self.movie_state, count, down);
  }

  pub fn move_suggestion_selection(&mut self, down: bool) {
    let count = self.state().suggestions.len();
    step(&mut self.suggestion_state, count, down);
  }

  // --- Trailer ---

  pub fn open_trailer_in_browser(&self) {
    let Some(url) = self.state().trailer_url.as_deref().map(watch_url) else { return };
    #[cfg(target_os = "macos")]
    let cmd = "open";
    #[cfg(not(target_os = "macos"))]
    let cmd = "xdg-open";
    match std::process::Command::new(cmd)
      .arg(&url)
      .stdin(std::process::Stdio::null())
      .stdout(std::process::Stdio::null())
      .stderr(std::process::Stdio::null())
      .spawn()
    {
      Ok(mut child) => {
        info!(url = %url, "trailer: opened in browser");
        // Reap the child in a background thread to avoid zombie processes.
        std::thread::spawn(move || {
          let _ = child.wait();
        });
      }
      Err(e) => {
        warn!(url = %url, err = %e, "trailer: failed to launch browser");
      }
    }
  }
}

/// Wrap-around selection step over a list of `count` items.
fn step(list: &mut ListState, count: usize, down: bool) {
  if count == 0 {
    return;
  }
  let i = match (list.selected(), down) {
    (None, _) => 0,
    (Some(i), true) => (i + 1) % count,
    (Some(0), false) => count - 1,
    (Some(i), false) => (i - 1).min(count - 1),
  };
  list.select(Some(i));
}

/// Embedded-player URLs are unpleasant in a browser tab; prefer the watch page.
pub fn watch_url(url: &str) -> String {
  match url.split_once("youtube.com/embed/") {
    Some((_, key)) if !key.is_empty() => format!("https://www.youtube.com/watch?v={}", key),
    _ => url.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn watch_url_rewrites_embed_links() {
    assert_eq!(watch_url("https://www.youtube.com/embed/abc123"), "https://www.youtube.com/watch?v=abc123");
  }

  #[test]
  fn watch_url_leaves_other_links() {
    assert_eq!(watch_url("https://vimeo.com/42"), "https://vimeo.com/42");
    assert_eq!(watch_url("https://www.youtube.com/embed/"), "https://www.youtube.com/embed/");
  }

  #[test]
  fn step_wraps_both_ways() {
    let mut list = ListState::default();
    step(&mut list, 3, true);
    assert_eq!(list.selected(), Some(0));
    step(&mut list, 3, false);
    assert_eq!(list.selected(), Some(2));
    step(&mut list, 3, true);
    assert_eq!(list.selected(), Some(0));
  }

  #[test]
  fn step_on_empty_list_is_noop() {
    let mut list = ListState::default();
    step(&mut list, 0, true);
    assert_eq!(list.selected(), None);
  }

  #[test]
  fn step_clamps_stale_selection() {
    let mut list = ListState::default().with_selected(Some(9));
    step(&mut list, 3, false);
    assert_eq!(list.selected(), Some(2));
  }
}
