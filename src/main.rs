mod api;
mod app;
mod config;
mod constants;
mod input;
mod language;
mod logging;
mod models;
mod navigation;
mod search;
mod session;
#[cfg(test)]
mod testing;
mod theme;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::time::Duration;
use tracing::info;

use api::MovieApi;
use app::App;
use config::Config;
use constants::constants;
use language::Language;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Browse trending movies, search and watch trailers", long_about = None)]
struct Args {
  /// Content language (defaults to the saved preference, then English)
  #[arg(short, long, value_enum)]
  language: Option<Language>,

  /// Base URL of the movie service
  #[arg(long)]
  api_url: Option<String>,

  /// Log filter used when neither REEL_LOG nor RUST_LOG is set
  #[arg(long, default_value = "info")]
  log_level: String,

  /// Print a shell completion script and exit
  #[arg(long, value_enum)]
  completions: Option<clap_complete::Shell>,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    let mut cmd = Args::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    return Ok(());
  }

  let _log_guard = logging::init(&args.log_level)?;

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, args).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, args: Args) -> Result<()> {
  let config = Config::load();
  let language = args.language.or(config.language).unwrap_or_default();
  let api_url = args.api_url.or_else(|| config.api_url.clone()).unwrap_or_else(|| constants().api_base_url.clone());
  info!(%api_url, language = language.code(), "starting");

  let mut app = App::new(MovieApi::new(api_url), language, config);

  loop {
    app.check_pending();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(50))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  info!("exiting");
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cli_parses_language_and_url() {
    let args = Args::try_parse_from(["reel", "--language", "te", "--api-url", "http://localhost:8000"]).unwrap();
    assert_eq!(args.language, Some(Language::Te));
    assert_eq!(args.api_url.as_deref(), Some("http://localhost:8000"));
    assert_eq!(args.log_level, "info");
  }

  #[test]
  fn cli_rejects_unknown_language() {
    assert!(Args::try_parse_from(["reel", "--language", "fr"]).is_err());
  }

  #[test]
  fn cli_definition_is_valid() {
    Args::command().debug_assert();
  }
}
