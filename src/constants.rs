//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available,
//! parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  pub api_base_url: String,
  pub image_base_url: String,

  // Live search
  pub search_debounce_ms: u64,
  pub suggestion_limit: usize,

  // Browse view
  pub hero_overview_chars: usize,

  // Banner texts
  pub trending_error: String,
  pub detail_error: String,
  pub trailer_unavailable: String,

  // Logging
  pub log_file_prefix: String,
}

impl Constants {
  pub fn search_debounce(&self) -> Duration {
    Duration::from_millis(self.search_debounce_ms)
  }
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed every test below fails.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert_eq!(c.search_debounce(), Duration::from_millis(300));
    assert_eq!(c.suggestion_limit, 8);
    assert_eq!(c.hero_overview_chars, 180);
    assert_eq!(c.detail_error, "Failed to load movie details.");
    assert_eq!(c.trending_error, "Failed to load movies.");
  }
}
