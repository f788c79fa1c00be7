use futures::{
  future::FutureObj,
  task::{Spawn, SpawnError},
};
use tokio::runtime::Handle;

/// Spawns dispatch tasks onto a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioScheduler(Handle);

impl TokioScheduler {
  pub fn new(handle: Handle) -> Self { TokioScheduler(handle) }

  /// Uses the runtime the caller is running in.
  ///
  /// Returns `None` outside of a tokio runtime.
  pub fn current() -> Option<Self> { Handle::try_current().ok().map(TokioScheduler) }
}

impl Spawn for TokioScheduler {
  fn spawn_obj(&self, future: FutureObj<'static, ()>) -> Result<(), SpawnError> {
    self.0.spawn(future);
    Ok(())
  }
}
