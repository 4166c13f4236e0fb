use ratatui::crossterm::event::{self, KeyCode, KeyModifiers};

use crate::app::{App, Focus};
use crate::session::View;

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) {
    match key.code {
      KeyCode::Char('c') => {
        app.should_quit = true;
        return;
      }
      KeyCode::Char('t') => {
        app.next_theme();
        return;
      }
      KeyCode::Char('l') => {
        app.next_language();
        return;
      }
      KeyCode::Char('y') => {
        app.accept_correction();
        return;
      }
      KeyCode::Char('f') => {
        app.focus = Focus::Search;
        return;
      }
      _ => {}
    }
  }

  // The trailer modal swallows keys until it is closed.
  if app.state().trailer_url.is_some() {
    handle_trailer_key(app, key);
    return;
  }

  match app.focus {
    Focus::Search => handle_search_key(app, key),
    Focus::Suggestions => handle_suggestions_key(app, key),
    Focus::Movies => handle_movies_key(app, key),
  }
}

fn handle_search_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      if !app.state().suggestions.is_empty() {
        app.open_selected_suggestion();
      }
    }
    KeyCode::Char(c) => {
      app.edit_query(|text, cursor| {
        let byte_idx = char_to_byte_index(text, *cursor);
        text.insert(byte_idx, c);
        *cursor += 1;
      });
    }
    KeyCode::Backspace => {
      app.edit_query(|text, cursor| {
        if *cursor > 0 {
          *cursor -= 1;
          let byte_idx = char_to_byte_index(text, *cursor);
          text.remove(byte_idx);
        }
      });
    }
    KeyCode::Delete => {
      app.edit_query(|text, cursor| {
        if *cursor < text.chars().count() {
          let byte_idx = char_to_byte_index(text, *cursor);
          text.remove(byte_idx);
        }
      });
    }
    KeyCode::Left => {
      app.cursor_position = app.cursor_position.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.cursor_position < app.state().query.chars().count() {
        app.cursor_position += 1;
      }
    }
    KeyCode::Home => {
      app.cursor_position = 0;
    }
    KeyCode::End => {
      app.cursor_position = app.state().query.chars().count();
    }
    KeyCode::Down | KeyCode::Tab => {
      if app.state().suggestions.is_empty() {
        app.focus = Focus::Movies;
      } else {
        app.suggestion_state.select(Some(0));
        app.focus = Focus::Suggestions;
      }
    }
    KeyCode::Esc => {
      if !app.state().query.is_empty() {
        app.edit_query(|text, cursor| {
          text.clear();
          *cursor = 0;
        });
        app.input_scroll = 0;
      } else {
        app.focus = Focus::Movies;
      }
    }
    _ => {}
  }
}

fn handle_suggestions_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.open_selected_suggestion();
    }
    KeyCode::Down | KeyCode::Char('j') => {
      app.move_suggestion_selection(true);
    }
    KeyCode::Up | KeyCode::Char('k') => {
      if app.suggestion_state.selected() == Some(0) {
        app.focus = Focus::Search;
      } else {
        app.move_suggestion_selection(false);
      }
    }
    KeyCode::Esc | KeyCode::BackTab => {
      app.focus = Focus::Search;
    }
    _ => {}
  }
}

fn handle_movies_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter => {
      app.open_selected_movie();
    }
    KeyCode::Char(' ') if app.state().view == View::Browse => {
      app.open_hero();
    }
    KeyCode::Down | KeyCode::Char('j') => {
      app.move_movie_selection(true);
    }
    KeyCode::Up | KeyCode::Char('k') => {
      app.move_movie_selection(false);
    }
    KeyCode::Char('/') | KeyCode::Tab => {
      app.focus = Focus::Search;
    }
    KeyCode::Char('l') => {
      app.next_language();
    }
    KeyCode::Char('L') => {
      app.prev_language();
    }
    KeyCode::Char('t') if app.state().view == View::Detail => {
      app.session.request_trailer();
    }
    KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') if app.state().view == View::Detail => {
      app.go_home();
    }
    KeyCode::Char('q') => {
      app.should_quit = true;
    }
    _ => {}
  }
}

fn handle_trailer_key(app: &mut App, key: event::KeyEvent) {
  match key.code {
    KeyCode::Enter | KeyCode::Char('o') => {
      app.open_trailer_in_browser();
    }
    KeyCode::Esc | KeyCode::Char('x') | KeyCode::Char('q') => {
      app.session.dismiss_trailer();
    }
    _ => {}
  }
}
