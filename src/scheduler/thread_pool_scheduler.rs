use std::io;

use futures::executor::ThreadPool;
use once_cell::sync::Lazy;
use tracing::warn;

use super::SharedScheduler;

static DEFAULT_RUNTIME: Lazy<Option<ThreadPool>> = Lazy::new(|| {
  SchedulerConfig::default()
    .build()
    .map_err(|err| warn!(error = %err, "default dispatch pool unavailable, subscriptions will be refused"))
    .ok()
});

pub(crate) fn default_pool() -> Option<ThreadPool> { DEFAULT_RUNTIME.as_ref().cloned() }

/// Settings for a dedicated dispatch thread pool.
///
/// ```
/// use rxsingle::scheduler::SchedulerConfig;
///
/// let scheduler = SchedulerConfig::default().pool_size(2).into_scheduler().unwrap();
/// # drop(scheduler);
/// ```
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
  pool_size: Option<usize>,
  name_prefix: String,
}

impl Default for SchedulerConfig {
  fn default() -> Self {
    SchedulerConfig {
      pool_size: None,
      name_prefix: "rxsingle-dispatch-".to_owned(),
    }
  }
}

impl SchedulerConfig {
  /// Number of worker threads. Defaults to the number of CPUs.
  pub fn pool_size(mut self, size: usize) -> Self {
    self.pool_size = Some(size);
    self
  }

  /// Prefix for worker thread names.
  pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.name_prefix = prefix.into();
    self
  }

  pub fn build(&self) -> io::Result<ThreadPool> {
    let mut builder = ThreadPool::builder();
    builder.name_prefix(self.name_prefix.clone());
    if let Some(size) = self.pool_size {
      builder.pool_size(size);
    }
    builder.create()
  }

  pub fn into_scheduler(self) -> io::Result<SharedScheduler> {
    let pool = self.build()?;
    Ok(std::sync::Arc::new(pool))
  }
}
