//! In-memory `MovieService` whose replies are released by the test, so the
//! order in which responses complete is fully controlled.

use std::sync::Mutex as StdMutex;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, MovieService, SearchOutcome};
use crate::language::Language;
use crate::models::{MovieDetail, MovieSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
  Trending(Language),
  Search(String),
  Detail(u64),
  Recommendations(u64),
  Trailer(u64),
}

#[derive(Debug)]
pub(crate) enum Reply {
  Movies(Result<Vec<MovieSummary>, ApiError>),
  Search(Result<SearchOutcome, ApiError>),
  Detail(Result<MovieDetail, ApiError>),
  Trailer(Result<Option<String>, ApiError>),
}

#[derive(Default)]
pub(crate) struct FakeService {
  ignore_cancel: bool,
  calls: StdMutex<Vec<Call>>,
  pending: StdMutex<Vec<(Call, oneshot::Sender<Reply>)>>,
  canceled: StdMutex<Vec<String>>,
}

impl FakeService {
  /// A service whose searches run to completion even after cancellation.
  pub(crate) fn ignoring_cancellation() -> Self {
    Self { ignore_cancel: true, ..Self::default() }
  }

  fn register(&self, call: Call) -> oneshot::Receiver<Reply> {
    let (tx, rx) = oneshot::channel();
    self.calls.lock().unwrap().push(call.clone());
    self.pending.lock().unwrap().push((call, tx));
    rx
  }

  fn is_pending(&self, call: &Call) -> bool {
    self.pending.lock().unwrap().iter().any(|(c, tx)| c == call && !tx.is_closed())
  }

  /// Yield until the session has issued `call` and it is waiting for a reply.
  pub(crate) async fn wait_for(&self, call: &Call) {
    for _ in 0..1000 {
      if self.is_pending(call) {
        return;
      }
      tokio::task::yield_now().await;
    }
    panic!("call was never issued: {:?}", call);
  }

  pub(crate) async fn reply(&self, call: Call, reply: Reply) {
    self.wait_for(&call).await;
    let tx = {
      let mut pending = self.pending.lock().unwrap();
      let idx = pending.iter().position(|(c, tx)| *c == call && !tx.is_closed()).unwrap();
      pending.remove(idx).1
    };
    tx.send(reply).unwrap();
  }

  pub(crate) async fn reply_trending(&self, language: Language, result: Result<Vec<MovieSummary>, ApiError>) {
    self.reply(Call::Trending(language), Reply::Movies(result)).await;
  }

  pub(crate) async fn reply_search(&self, query: &str, result: Result<SearchOutcome, ApiError>) {
    self.reply(Call::Search(query.to_string()), Reply::Search(result)).await;
  }

  pub(crate) async fn reply_detail(&self, id: u64, result: Result<MovieDetail, ApiError>) {
    self.reply(Call::Detail(id), Reply::Detail(result)).await;
  }

  pub(crate) async fn reply_recommendations(&self, id: u64, result: Result<Vec<MovieSummary>, ApiError>) {
    self.reply(Call::Recommendations(id), Reply::Movies(result)).await;
  }

  pub(crate) async fn reply_trailer(&self, id: u64, result: Result<Option<String>, ApiError>) {
    self.reply(Call::Trailer(id), Reply::Trailer(result)).await;
  }

  pub(crate) fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  pub(crate) fn search_queries(&self) -> Vec<String> {
    self
      .calls()
      .into_iter()
      .filter_map(|c| match c {
        Call::Search(q) => Some(q),
        _ => None,
      })
      .collect()
  }

  pub(crate) fn was_canceled(&self, query: &str) -> bool {
    self.canceled.lock().unwrap().iter().any(|q| q == query)
  }
}

fn dropped() -> ApiError {
  ApiError::Service { status: 0, message: "test dropped the reply".to_string() }
}

impl MovieService for FakeService {
  async fn fetch_trending(&self, language: Language) -> Result<Vec<MovieSummary>, ApiError> {
    match self.register(Call::Trending(language)).await {
      Ok(Reply::Movies(result)) => result,
      Ok(other) => panic!("wrong reply for trending: {:?}", other),
      Err(_) => Err(dropped()),
    }
  }

  async fn search(&self, query: &str, cancel: CancellationToken) -> Result<SearchOutcome, ApiError> {
    let rx = self.register(Call::Search(query.to_string()));
    let reply = if self.ignore_cancel {
      rx.await
    } else {
      tokio::select! {
        biased;
        _ = cancel.cancelled() => {
          self.canceled.lock().unwrap().push(query.to_string());
          return Ok(SearchOutcome::Canceled);
        }
        reply = rx => reply,
      }
    };
    match reply {
      Ok(Reply::Search(result)) => result,
      Ok(other) => panic!("wrong reply for search: {:?}", other),
      Err(_) => Err(dropped()),
    }
  }

  async fn fetch_detail(&self, id: u64) -> Result<MovieDetail, ApiError> {
    match self.register(Call::Detail(id)).await {
      Ok(Reply::Detail(result)) => result,
      Ok(other) => panic!("wrong reply for detail: {:?}", other),
      Err(_) => Err(dropped()),
    }
  }

  async fn fetch_recommendations(&self, id: u64) -> Result<Vec<MovieSummary>, ApiError> {
    match self.register(Call::Recommendations(id)).await {
      Ok(Reply::Movies(result)) => result,
      Ok(other) => panic!("wrong reply for recommendations: {:?}", other),
      Err(_) => Err(dropped()),
    }
  }

  async fn fetch_trailer_url(&self, id: u64) -> Result<Option<String>, ApiError> {
    match self.register(Call::Trailer(id)).await {
      Ok(Reply::Trailer(result)) => result,
      Ok(other) => panic!("wrong reply for trailer: {:?}", other),
      Err(_) => Err(dropped()),
    }
  }
}

pub(crate) fn detail(id: u64, title: &str) -> MovieDetail {
  MovieDetail { summary: crate::models::movie(id, title), tagline: None, runtime: None, genres: Vec::new() }
}
