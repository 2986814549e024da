//! Cancellable background query for the detail view.
//!
//! A `Query<T>` runs its fetcher on a spawned task and hands the result back
//! through a channel. Dropping the receiver marks the query inactive: a result
//! that arrives after `cancel()` is discarded instead of being applied to a
//! view that has moved on.
//!
//! # Example
//!
//! ```ignore
//! let store = Arc::clone(&store);
//! let mut query = Query::new(move || {
//!     let store = Arc::clone(&store);
//!     async move { store.load_detail(EntityKind::People, "1").await }
//! });
//!
//! query.fetch();
//! tokio::select! {
//!     _ = query.wait() => {}
//!     _ = tokio::signal::ctrl_c() => {}
//! }
//! // A fetch still pending here is abandoned
//! query.cancel();
//!
//! match query.state() {
//!     QueryState::Success(detail) => render(detail),
//!     QueryState::Failed => render_error(store.snapshot().error),
//!     _ => {}
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use tokio::sync::oneshot;

/// The state of a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T> {
  /// Not started, or cancelled
  Idle,
  Loading,
  Success(T),
  /// The fetcher produced nothing; the reason lives in the store's error field
  Failed,
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }
}

/// A boxed future yielding the fetched value, or `None` on failure
type BoxFuture<T> = Pin<Box<dyn Future<Output = Option<T>> + Send>>;

/// A factory function that creates futures for fetching data
type FetcherFn<T> = Box<dyn Fn() -> BoxFuture<T> + Send + Sync>;

pub struct Query<T> {
  state: QueryState<T>,
  fetcher: FetcherFn<T>,
  receiver: Option<oneshot::Receiver<Option<T>>>,
}

impl<T: Send + 'static> Query<T> {
  /// Create a new query with the given fetcher function.
  ///
  /// The fetcher is called each time `fetch()` starts a new fetch.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<T>> + Send + 'static,
  {
    Self {
      state: QueryState::Idle,
      fetcher: Box::new(move || Box::pin(fetcher())),
      receiver: None,
    }
  }

  pub fn state(&self) -> &QueryState<T> {
    &self.state
  }

  /// Start fetching unless a fetch is already pending.
  pub fn fetch(&mut self) {
    if self.state.is_loading() {
      return;
    }
    self.start_fetch();
  }

  /// Stop listening for the pending result.
  pub fn cancel(&mut self) {
    self.receiver = None;
    if self.state.is_loading() {
      self.state = QueryState::Idle;
    }
  }

  /// Wait for the pending fetch to settle and return the resulting state.
  pub async fn wait(&mut self) -> &QueryState<T> {
    if let Some(receiver) = self.receiver.as_mut() {
      let result = receiver.await.ok().flatten();
      self.apply(result);
    }
    &self.state
  }

  fn apply(&mut self, result: Option<T>) {
    self.receiver = None;
    self.state = match result {
      Some(data) => QueryState::Success(data),
      None => QueryState::Failed,
    };
  }

  fn start_fetch(&mut self) {
    let (tx, rx) = oneshot::channel();
    self.receiver = Some(rx);
    self.state = QueryState::Loading;

    let future = (self.fetcher)();
    tokio::spawn(async move {
      // Receiver may be gone if the query was cancelled
      let _ = tx.send(future.await);
    });
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("state", &self.state)
      .field("active", &self.receiver.is_some())
      .finish_non_exhaustive()
  }
}
