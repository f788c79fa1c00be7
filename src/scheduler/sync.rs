use std::{
  future::Future,
  pin::pin,
  sync::Arc,
  task::{Context, Poll},
  thread::{self, Thread},
};

use futures::{
  future::FutureObj,
  task::{waker, ArcWake, Spawn, SpawnError},
};

/// Runs every spawned task to completion on the calling thread.
///
/// With this scheduler `subscribe` returns only after the handler ran, which
/// makes ordering deterministic at the cost of blocking the caller. It parks
/// the thread instead of entering an executor, so it also works from inside
/// a handler running on a thread pool.
#[derive(Clone, Copy, Debug, Default)]
pub struct SyncScheduler;

struct ThreadWaker(Thread);

impl ArcWake for ThreadWaker {
  fn wake_by_ref(arc_self: &Arc<Self>) { arc_self.0.unpark() }
}

impl Spawn for SyncScheduler {
  fn spawn_obj(&self, future: FutureObj<'static, ()>) -> Result<(), SpawnError> {
    let waker = waker(Arc::new(ThreadWaker(thread::current())));
    let mut cx = Context::from_waker(&waker);
    let mut future = pin!(future);
    while future.as_mut().poll(&mut cx) == Poll::Pending {
      thread::park();
    }
    Ok(())
  }
}
