use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Flex, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, BorderType, Clear, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, Focus, watch_url};
use crate::constants::constants;
use crate::models::{ImageSize, MovieSummary};
use crate::session::View;
use crate::theme::Theme;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

fn rating_label(movie: &MovieSummary) -> Option<String> {
  movie.vote_average.filter(|v| *v > 0.0).map(|v| format!("★ {:.1}", v))
}

fn rounded(theme: &Theme) -> Block<'static> {
  Block::bordered().border_type(BorderType::Rounded).border_style(Style::default().fg(theme.border))
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, input_area, status_area, main_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
    Constraint::Min(5),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, app, header_area);
  render_input(frame, app, input_area);
  render_status(frame, app, status_area);
  let view = app.session.state().view;
  match view {
    View::Browse => render_browse(frame, app, main_area),
    View::Detail => render_detail(frame, app, main_area),
  }
  render_suggestions(frame, app, main_area);
  render_trailer(frame, app, main_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let left = Line::from(Span::styled(" 🎬 reel ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  let right_text = format!("{}  v{} ", app.session.state().language.label(), env!("CARGO_PKG_VERSION"));
  let width = right_text.chars().count() as u16;
  let right = Line::from(Span::styled(right_text, Style::default().fg(theme.muted)));
  let right_area = Rect { x: area.x + area.width.saturating_sub(width), width: width.min(area.width), ..area };
  frame.render_widget(right, right_area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let focused = app.focus == Focus::Search;
  let border_color = if focused { theme.accent } else { theme.border };
  let mut input_block = Block::bordered()
    .title(" Search movies ")
    .title_style(Style::default().fg(border_color))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  if let Some(correction) = &app.session.state().did_you_mean {
    input_block = input_block.title_bottom(Line::from(vec![
      Span::styled(" Did you mean: ", Style::default().fg(theme.muted)),
      Span::styled(correction.clone(), Style::default().fg(theme.accent).add_modifier(Modifier::ITALIC)),
      Span::styled(" (^y) ", Style::default().fg(theme.muted)),
    ]));
  }

  let query = app.session.state().query.clone();
  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&query, app.cursor_position);

  if cursor_col < app.input_scroll {
    app.input_scroll = cursor_col;
  } else if cursor_col >= app.input_scroll + inner_w {
    app.input_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = query
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.input_scroll)
    .take_while(|(start, _, _)| *start < app.input_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block);
  frame.render_widget(paragraph, area);

  if focused {
    let cursor_x = area.x + 2 + (cursor_col - app.input_scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let state = app.session.state();
  let (text, style) = if state.loading {
    (" ⏳ Loading…".to_string(), Style::default().fg(theme.status))
  } else if let Some(err) = &state.error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if let Some(info) = &state.info {
    (format!(" ℹ  {}", info), Style::default().fg(theme.muted))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn movie_items<'a>(movies: &'a [MovieSummary], selected: Option<usize>, theme: &Theme, inner_w: usize) -> Vec<ListItem<'a>> {
  movies
    .iter()
    .enumerate()
    .map(|(i, movie)| {
      let is_selected = Some(i) == selected;
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };

      let year = movie.release_year().unwrap_or_default();
      let rating = rating_label(movie).unwrap_or_default();
      let right = match (!year.is_empty(), !rating.is_empty()) {
        (true, true) => format!("{}  {}", year, rating),
        (true, false) => year,
        (false, true) => rating,
        (false, false) => String::new(),
      };
      let marker = if movie.poster_path.is_some() { "" } else { "▢ " };

      let right_w = right.chars().count();
      let title_max = inner_w.saturating_sub(right_w + 2 + marker.chars().count());
      let title = truncate_str(&movie.title, title_max);
      let gap = inner_w.saturating_sub(marker.chars().count() + title.chars().count() + right_w);

      let line = Line::from(vec![
        Span::styled(marker, Style::default().fg(theme.muted)),
        Span::styled(title, Style::default().fg(fg)),
        Span::raw(" ".repeat(gap)),
        Span::styled(right, Style::default().fg(theme.muted)),
      ]);
      ListItem::new(line).bg(bg)
    })
    .collect()
}

fn render_movie_list(frame: &mut Frame, app: &mut App, area: Rect, title: String) {
  let theme = app.theme();
  let focused = app.focus == Focus::Movies;
  let state = app.session.state();
  let movies = match state.view {
    View::Browse => &state.trending,
    View::Detail => &state.recommendations,
  };
  let inner_w = area.width.saturating_sub(4) as usize;
  let items = movie_items(movies, app.movie_state.selected(), theme, inner_w);

  let border = if focused { theme.accent } else { theme.border };
  let list = List::new(items)
    .block(
      rounded(theme)
        .title(title)
        .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        .border_style(Style::default().fg(border)),
    )
    .highlight_symbol(if focused { "▶ " } else { "  " })
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(list, area, &mut app.movie_state);
}

fn render_browse(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let state = app.session.state();

  let Some(hero) = state.hero() else {
    let text = if state.loading { "Loading trending movies…" } else { "No movies to show." };
    let paragraph = Paragraph::new(vec![Line::from(""), Line::from(Span::styled(text, Style::default().fg(theme.muted)))])
      .alignment(Alignment::Center)
      .block(rounded(theme));
    frame.render_widget(paragraph, area);
    return;
  };

  let [hero_area, list_area] = Layout::vertical([Constraint::Length(8), Constraint::Min(3)]).areas(area);

  let mut meta = Vec::new();
  if let Some(year) = hero.release_year() {
    meta.push(Span::styled(year, Style::default().fg(theme.muted)));
    meta.push(Span::raw("  "));
  }
  if let Some(rating) = rating_label(hero) {
    meta.push(Span::styled(rating, Style::default().fg(theme.rating)));
  }

  let mut lines = vec![
    Line::from(Span::styled(hero.title.clone(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD))),
    Line::from(meta),
    Line::from(Span::styled(
      hero.short_overview(constants().hero_overview_chars),
      Style::default().fg(theme.fg),
    )),
  ];
  if let Some(thumb) = hero.poster_url(ImageSize::W200) {
    lines.push(Line::from(Span::styled(thumb, Style::default().fg(theme.muted))));
  }
  let hero_block = rounded(theme)
    .title(Span::styled(" Featured ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)))
    .title_bottom(Span::styled(" Space ▶ View ", Style::default().fg(theme.muted)))
    .padding(Padding::horizontal(1));
  frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(hero_block), hero_area);

  let title = format!(" 🔥 Trending · {} ", state.language.label());
  render_movie_list(frame, app, list_area, title);
}

fn render_detail(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let Some(movie) = app.session.state().selected.as_ref() else { return };

  let [info_area, recs_area] =
    Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);

  let summary = &movie.summary;
  let mut lines = vec![Line::from(Span::styled(
    summary.title.clone(),
    Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
  ))];
  if let Some(tagline) = movie.tagline.as_deref().filter(|t| !t.is_empty()) {
    lines.push(Line::from(Span::styled(tagline.to_string(), Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC))));
  }

  let mut meta = Vec::new();
  if let Some(v) = summary.vote_average {
    meta.push(Span::styled(format!("⭐ {:.1}", v), Style::default().fg(theme.rating)));
  }
  for part in [summary.release_year(), movie.runtime_label()].into_iter().flatten() {
    if !meta.is_empty() {
      meta.push(Span::styled("  ·  ", Style::default().fg(theme.muted)));
    }
    meta.push(Span::styled(part, Style::default().fg(theme.fg)));
  }
  lines.push(Line::from(meta));

  if !movie.genres.is_empty() {
    let genres = movie.genres.iter().map(|g| g.name.as_str()).collect::<Vec<_>>().join(", ");
    lines.push(Line::from(Span::styled(genres, Style::default().fg(theme.muted))));
  }
  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(summary.overview.clone().unwrap_or_default(), Style::default().fg(theme.fg))));
  lines.push(Line::from(""));
  let images = [("Poster    ", summary.poster_url(ImageSize::W500)), ("Backdrop  ", summary.backdrop_url())];
  for (label, url) in images {
    if let Some(url) = url {
      lines.push(Line::from(vec![
        Span::styled(label, Style::default().fg(theme.muted)),
        Span::styled(url, Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED)),
      ]));
    }
  }

  let info_block = rounded(theme)
    .title(Span::styled(" Movie ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)))
    .title_bottom(Span::styled(" t ▶ Watch trailer · Esc ⬅ Back home ", Style::default().fg(theme.muted)))
    .padding(Padding::horizontal(1));
  frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(info_block), info_area);

  render_movie_list(frame, app, recs_area, " Recommended ".to_string());
}

fn render_suggestions(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let state = app.session.state();
  if state.suggestions.is_empty() || !matches!(app.focus, Focus::Search | Focus::Suggestions) {
    return;
  }

  let height = (state.suggestions.len() as u16 + 2).min(area.height);
  let width = area.width.min(72);
  let popup = Rect { x: area.x, y: area.y, width, height };
  let inner_w = width.saturating_sub(4) as usize;

  let items: Vec<ListItem> = state
    .suggestions
    .iter()
    .map(|movie| {
      let year = movie.release_year().unwrap_or_default();
      let title = truncate_str(&movie.title, inner_w.saturating_sub(year.chars().count() + 2));
      let gap = inner_w.saturating_sub(title.chars().count() + year.chars().count());
      ListItem::new(Line::from(vec![
        Span::styled(title, Style::default().fg(theme.fg)),
        Span::raw(" ".repeat(gap)),
        Span::styled(year, Style::default().fg(theme.muted)),
      ]))
    })
    .collect();

  let list = List::new(items)
    .block(
      rounded(theme)
        .title(" Suggestions ")
        .title_style(Style::default().fg(theme.accent))
        .style(Style::default().bg(theme.bg)),
    )
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_widget(Clear, popup);
  frame.render_stateful_widget(list, popup, &mut app.suggestion_state);
}

fn render_trailer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let Some(url) = app.session.state().trailer_url.as_deref() else { return };

  let [popup] = Layout::horizontal([Constraint::Max(70)]).flex(Flex::Center).areas(area);
  let [popup] = Layout::vertical([Constraint::Length(7)]).flex(Flex::Center).areas(popup);

  let lines = vec![
    Line::from(""),
    Line::from(Span::styled(
      truncate_str(&watch_url(url), popup.width.saturating_sub(4) as usize),
      Style::default().fg(theme.accent).add_modifier(Modifier::UNDERLINED),
    )),
    Line::from(""),
    Line::from(Span::styled("o open in browser · x close", Style::default().fg(theme.muted))),
  ];
  let block = rounded(theme)
    .title(Span::styled(" 🎬 Trailer ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)))
    .border_style(Style::default().fg(theme.accent))
    .style(Style::default().bg(theme.bg));

  frame.render_widget(Clear, popup);
  frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), popup);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let state = app.session.state();
  let keys: Vec<(&str, &str)> = if state.trailer_url.is_some() {
    vec![("o", "Open"), ("x", "Close")]
  } else {
    match app.focus {
      Focus::Search => {
        let mut k = vec![("Tab", "Results")];
        if !state.suggestions.is_empty() {
          k.insert(0, ("Enter", "Open"));
        }
        if state.did_you_mean.is_some() {
          k.push(("^y", "Accept"));
        }
        k.push(("^l", "Language"));
        k.push(("Esc", "Clear"));
        k
      }
      Focus::Suggestions => vec![("Enter", "Open"), ("j/k", "Navigate"), ("Esc", "Back")],
      Focus::Movies => {
        let mut k = vec![("Enter", "Open"), ("j/k", "Navigate"), ("/", "Search"), ("l/L", "Language")];
        if state.view == View::Detail {
          k.push(("t", "Trailer"));
          k.push(("Esc", "Home"));
        } else {
          k.push(("q", "Quit"));
        }
        k
      }
    }
  };

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}
