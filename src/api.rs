//! Typed client for the movie metadata service.
//!
//! Every call is a single `GET` against the service's base URL. The client
//! never touches session state; callers own merging results.

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::future::Future;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::language::Language;
use crate::models::{MovieDetail, MovieSummary, ResultsEnvelope, SearchEnvelope, SearchResult, TrailerEnvelope};

#[derive(Debug, Error)]
pub enum ApiError {
  /// Connection, timeout, or body transfer failure.
  #[error("network error: {0}")]
  Network(#[from] reqwest::Error),

  /// Non-2xx HTTP status.
  #[error("service returned HTTP {status}: {message}")]
  Service { status: u16, message: String },

  /// 2xx response whose body carries a `status_code` (e.g. unknown movie id).
  #[error("service rejected the request (status_code {status_code}): {message}")]
  Rejected { status_code: i64, message: String },

  #[error("unexpected response shape at `{path}`: {source}")]
  Decode { path: String, source: serde_json::Error },
}

/// Outcome of a cancellable search. Cancellation is not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
  Completed(SearchResult),
  Canceled,
}

/// The metadata service as seen by the controllers.
pub trait MovieService: Send + Sync + 'static {
  fn fetch_trending(&self, language: Language) -> impl Future<Output = Result<Vec<MovieSummary>, ApiError>> + Send;

  fn search(&self, query: &str, cancel: CancellationToken)
  -> impl Future<Output = Result<SearchOutcome, ApiError>> + Send;

  fn fetch_detail(&self, id: u64) -> impl Future<Output = Result<MovieDetail, ApiError>> + Send;

  fn fetch_recommendations(&self, id: u64) -> impl Future<Output = Result<Vec<MovieSummary>, ApiError>> + Send;

  /// `Ok(None)` when the service holds no trailer for the movie.
  fn fetch_trailer_url(&self, id: u64) -> impl Future<Output = Result<Option<String>, ApiError>> + Send;
}

pub struct MovieApi {
  client: Client,
  base_url: String,
}

impl MovieApi {
  pub fn new(base_url: impl Into<String>) -> Self {
    Self::with_client(Client::new(), base_url)
  }

  pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_string();
    Self { client, base_url }
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T, ApiError> {
    let url = self.url(path);
    debug!(url = %url, "api: GET");
    let response = self.client.get(&url).query(query).send().await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
      return Err(ApiError::Service { status: status.as_u16(), message: body });
    }
    let deserializer = &mut serde_json::Deserializer::from_str(&body);
    serde_path_to_error::deserialize(deserializer)
      .map_err(|e| ApiError::Decode { path: e.path().to_string(), source: e.into_inner() })
  }
}

impl MovieService for MovieApi {
  async fn fetch_trending(&self, language: Language) -> Result<Vec<MovieSummary>, ApiError> {
    let raw: ResultsEnvelope = self.get("/trending", &[("language", language.code())]).await?;
    Ok(raw.results)
  }

  async fn search(&self, query: &str, cancel: CancellationToken) -> Result<SearchOutcome, ApiError> {
    let params = [("query", query)];
    tokio::select! {
      biased;
      _ = cancel.cancelled() => {
        debug!(query = %query, "api: search canceled");
        Ok(SearchOutcome::Canceled)
      }
      raw = self.get::<SearchEnvelope>("/search", &params) => {
        Ok(SearchOutcome::Completed(raw?.into()))
      }
    }
  }

  async fn fetch_detail(&self, id: u64) -> Result<MovieDetail, ApiError> {
    let value: serde_json::Value = self.get(&format!("/movie/{}", id), &[]).await?;
    if let Some(code) = value.get("status_code") {
      let message = value.get("status_message").and_then(|m| m.as_str()).unwrap_or("unknown movie").to_string();
      return Err(ApiError::Rejected { status_code: code.as_i64().unwrap_or_default(), message });
    }
    serde_path_to_error::deserialize(value)
      .map_err(|e| ApiError::Decode { path: e.path().to_string(), source: e.into_inner() })
  }

  async fn fetch_recommendations(&self, id: u64) -> Result<Vec<MovieSummary>, ApiError> {
    let raw: ResultsEnvelope = self.get(&format!("/recommend/{}", id), &[]).await?;
    Ok(raw.results)
  }

  async fn fetch_trailer_url(&self, id: u64) -> Result<Option<String>, ApiError> {
    let raw: TrailerEnvelope = self.get(&format!("/trailer/{}", id), &[]).await?;
    Ok(raw.trailer_url.filter(|url| !url.trim().is_empty()))
  }
}
