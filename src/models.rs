use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::constants::constants;

/// A movie as listed by the metadata service (trending, search, recommendations).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
  pub id: u64,
  #[serde(default)]
  pub title: String,
  pub poster_path: Option<String>,
  pub backdrop_path: Option<String>,
  pub overview: Option<String>,
  pub release_date: Option<String>,
  pub vote_average: Option<f64>,
}

impl MovieSummary {
  pub fn poster_url(&self, size: ImageSize) -> Option<String> {
    image_url(size, self.poster_path.as_deref())
  }

  pub fn backdrop_url(&self) -> Option<String> {
    image_url(ImageSize::Original, self.backdrop_path.as_deref())
  }

  /// Four-digit release year, if the service sent a release date.
  pub fn release_year(&self) -> Option<String> {
    let raw = self.release_date.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
      Ok(date) => Some(date.year().to_string()),
      Err(_) => Some(raw.chars().take(4).collect()),
    }
  }

  /// Hero teaser: the first `max_chars` of the overview, always followed by "...".
  /// No overview, no teaser.
  pub fn short_overview(&self, max_chars: usize) -> String {
    match self.overview.as_deref().map(str::trim).filter(|o| !o.is_empty()) {
      Some(overview) => format!("{}...", overview.chars().take(max_chars).collect::<String>()),
      None => String::new(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Genre {
  pub id: u64,
  pub name: String,
}

/// Full record returned by `GET /movie/{id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetail {
  #[serde(flatten)]
  pub summary: MovieSummary,
  pub tagline: Option<String>,
  pub runtime: Option<u32>,
  #[serde(default)]
  pub genres: Vec<Genre>,
}

impl MovieDetail {
  pub fn id(&self) -> u64 {
    self.summary.id
  }

  /// "2h 28m" style runtime.
  pub fn runtime_label(&self) -> Option<String> {
    let minutes = self.runtime.filter(|m| *m > 0)?;
    Some(match (minutes / 60, minutes % 60) {
      (0, m) => format!("{}m", m),
      (h, 0) => format!("{}h", h),
      (h, m) => format!("{}h {}m", h, m),
    })
  }
}

/// One page of live-search results plus the service's spelling correction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
  pub movies: Vec<MovieSummary>,
  pub did_you_mean: Option<String>,
}

// --- Wire envelopes ---

#[derive(Debug, Deserialize)]
pub(crate) struct ResultsEnvelope {
  #[serde(default)]
  pub(crate) results: Vec<MovieSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchEnvelope {
  #[serde(default)]
  pub(crate) results: Vec<MovieSummary>,
  #[serde(default)]
  pub(crate) did_you_mean: Option<String>,
}

impl From<SearchEnvelope> for SearchResult {
  fn from(raw: SearchEnvelope) -> Self {
    SearchResult { movies: raw.results, did_you_mean: raw.did_you_mean.filter(|s| !s.trim().is_empty()) }
  }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrailerEnvelope {
  #[serde(default)]
  pub(crate) trailer_url: Option<String>,
}

// --- Images ---

/// Size token understood by the image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
  W200,
  W500,
  Original,
}

impl ImageSize {
  pub fn token(self) -> &'static str {
    match self {
      ImageSize::W200 => "w200",
      ImageSize::W500 => "w500",
      ImageSize::Original => "original",
    }
  }
}

/// Compose a CDN URL for an image path. No path, no image.
pub fn image_url(size: ImageSize, path: Option<&str>) -> Option<String> {
  let path = path.map(str::trim).filter(|p| !p.is_empty())?;
  Some(format!("{}/{}{}", constants().image_base_url.trim_end_matches('/'), size.token(), path))
}

#[cfg(test)]
pub(crate) fn movie(id: u64, title: &str) -> MovieSummary {
  MovieSummary {
    id,
    title: title.to_string(),
    poster_path: None,
    backdrop_path: None,
    overview: None,
    release_date: None,
    vote_average: None,
  }
}
