use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::domain::errors::RepositoryError;
use crate::domain::order::{QueueChange, QueueChangeHandler};
use crate::infrastructure::persistence::postgres::QUEUE_CHANGES_CHANNEL;

/// Base delay before resubscribing; grows with each consecutive failure
const RETRY_DELAY_BASE: Duration = Duration::from_millis(500);
const RETRY_DELAY_MAX: Duration = Duration::from_secs(5);

/// Decodes a `queue_changes` notification payload
pub fn parse_change(payload: &str) -> Result<QueueChange, serde_json::Error> {
  serde_json::from_str(payload)
}

/// An open subscription yielding raw notification payloads
#[async_trait]
pub trait ChangeSubscription: Send {
  async fn recv(&mut self) -> Result<String, RepositoryError>;
}

/// Opens subscriptions to the `queue_changes` channel
#[async_trait]
pub trait ChangeSource: Send + Sync {
  async fn subscribe(&self) -> Result<Box<dyn ChangeSubscription>, RepositoryError>;
}

struct PgChangeSource {
  pool: PgPool,
}

struct PgChangeSubscription(PgListener);

#[async_trait]
impl ChangeSource for PgChangeSource {
  async fn subscribe(&self) -> Result<Box<dyn ChangeSubscription>, RepositoryError> {
    let mut listener = PgListener::connect_with(&self.pool).await?;
    listener.listen(QUEUE_CHANGES_CHANNEL).await?;
    Ok(Box::new(PgChangeSubscription(listener)))
  }
}

#[async_trait]
impl ChangeSubscription for PgChangeSubscription {
  async fn recv(&mut self) -> Result<String, RepositoryError> {
    let notification = self.0.recv().await?;
    Ok(notification.payload().to_string())
  }
}

/// Listens for queue changes published by queue saves and hands them to a handler.
///
/// A failed subscription is reopened with a growing delay until `close` is called.
pub struct QueueChangeStream {
  source: Arc<dyn ChangeSource>,
  retry_delay_base: Duration,
  cancel: CancellationToken,
  watching: AtomicBool,
}

impl QueueChangeStream {
  pub fn new(pool: PgPool) -> Self {
    Self::with_source(Arc::new(PgChangeSource { pool }), RETRY_DELAY_BASE)
  }

  pub fn with_source(source: Arc<dyn ChangeSource>, retry_delay_base: Duration) -> Self {
    Self {
      source,
      retry_delay_base,
      cancel: CancellationToken::new(),
      watching: AtomicBool::new(false),
    }
  }

  pub fn is_watching(&self) -> bool {
    self.watching.load(Ordering::SeqCst)
  }

  /// Runs until `close` is called. Returns immediately when another watch
  /// is already running.
  pub async fn watch(&self, handler: Arc<dyn QueueChangeHandler>) {
    if self.watching.swap(true, Ordering::SeqCst) {
      tracing::debug!("Queue change stream is already being watched");
      return;
    }

    tracing::info!("Starting queue change stream");
    let mut consecutive_errors: u32 = 0;

    while !self.cancel.is_cancelled() {
      let error = match self.source.subscribe().await {
        Ok(subscription) => {
          consecutive_errors = 0;
          match self.listen(subscription, handler.as_ref()).await {
            Ok(()) => break,
            Err(e) => e,
          }
        }
        Err(e) => e,
      };

      consecutive_errors = consecutive_errors.saturating_add(1);
      let delay = self
        .retry_delay_base
        .saturating_mul(consecutive_errors)
        .min(RETRY_DELAY_MAX);
      tracing::warn!(
        "Queue change stream failed: {}; resubscribing in {} ms",
        error,
        delay.as_millis()
      );

      tokio::select! {
        _ = self.cancel.cancelled() => break,
        _ = tokio::time::sleep(delay) => {}
      }
    }

    tracing::info!("Closing queue change stream");
    self.watching.store(false, Ordering::SeqCst);
  }

  /// Forwards changes until cancelled (`Ok`) or the subscription fails (`Err`)
  async fn listen(
    &self,
    mut subscription: Box<dyn ChangeSubscription>,
    handler: &dyn QueueChangeHandler,
  ) -> Result<(), RepositoryError> {
    loop {
      tokio::select! {
        _ = self.cancel.cancelled() => return Ok(()),
        payload = subscription.recv() => {
          let payload = payload?;
          tracing::debug!("A queue change occurred");
          match parse_change(&payload) {
            Ok(change) => handler.on_change(change).await,
            Err(e) => tracing::warn!("Ignoring malformed queue change {:?}: {}", payload, e),
          }
        }
      }
    }
  }

  /// Stops a running watch; later watches return immediately
  pub fn close(&self) {
    self.cancel.cancel();
  }
}
