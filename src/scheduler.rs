//! Where dispatch tasks run.
//!
//! A [`Single`](crate::single::Single) spawns its dispatch onto any
//! [`futures::task::Spawn`] executor. Without an explicit choice it uses a
//! process-wide thread pool created on first use.

use std::sync::Arc;

use futures::{
  future::FutureObj,
  task::{Spawn, SpawnError},
};

mod sync;
#[cfg(feature = "futures-scheduler")]
mod thread_pool_scheduler;
#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;

pub use sync::SyncScheduler;
#[cfg(feature = "futures-scheduler")]
pub use thread_pool_scheduler::SchedulerConfig;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

/// Type-erased scheduler shared by every subscription of a single.
pub type SharedScheduler = Arc<dyn Spawn + Send + Sync>;

/// Returns the default scheduler.
///
/// With the `futures-scheduler` feature this is the shared thread pool. If
/// that pool could not be started, or the feature is off, the returned
/// scheduler refuses every task, so `subscribe` fails with
/// [`SubscribeError::Spawn`](crate::error::SubscribeError::Spawn) instead of
/// blocking.
pub fn default_scheduler() -> SharedScheduler {
  #[cfg(feature = "futures-scheduler")]
  if let Some(pool) = thread_pool_scheduler::default_pool() {
    return Arc::new(pool);
  }
  Arc::new(Unavailable)
}

/// Stand-in when no default executor exists.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Unavailable;

impl Spawn for Unavailable {
  fn spawn_obj(&self, _: FutureObj<'static, ()>) -> Result<(), SpawnError> { Err(SpawnError::shutdown()) }
}
