//! Error types surfaced synchronously by a [`Single`](crate::single::Single).
//!
//! Emission failures are not listed here: they keep the emitter's own
//! `Err` type and only ever travel to an error handler.

use futures::task::SpawnError;
use thiserror::Error;

/// Returned by [`SingleIterator::next`](crate::emitter::SingleIterator::next)
/// once the single emitter slot has been pulled.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("single is exhausted: its emitter was already pulled")]
pub struct ExhaustedError;

/// Failures while setting up a subscription.
///
/// Normal emission outcomes never show up here.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SubscribeError {
  /// The scheduler refused the dispatch task, usually because it shut down.
  #[error("failed to spawn dispatch task: {0}")]
  Spawn(#[from] SpawnError),
}

impl SubscribeError {
  /// Returns a short stable label (snake_case) for use in logs.
  ///
  /// ```
  /// use futures::task::SpawnError;
  /// use rxsingle::SubscribeError;
  ///
  /// let err = SubscribeError::from(SpawnError::shutdown());
  /// assert_eq!(err.as_label(), "subscribe_spawn");
  /// ```
  pub fn as_label(&self) -> &'static str {
    match self {
      SubscribeError::Spawn(_) => "subscribe_spawn",
    }
  }
}
