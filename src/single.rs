//! The `Single` orchestrator.
//!
//! A [`Single`] wraps exactly one [`Emitter`]. It can be pulled once through
//! [`SingleIterator::next`], or subscribed to: `subscribe` stamps a fresh
//! [`Subscription`], spawns a dispatch task on the configured scheduler and
//! returns without waiting for it.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use rxsingle::prelude::*;
//!
//! struct Answer;
//!
//! impl Emitter for Answer {
//!   type Item = u32;
//!   type Err = String;
//!
//!   fn emit(&self) -> Result<u32, String> { Ok(42) }
//! }
//!
//! let seen = Arc::new(Mutex::new(None));
//! let c_seen = seen.clone();
//! let single = Single::new(Answer);
//! single
//!   .subscribe(NextFunc(move |v: u32| *c_seen.lock().unwrap() = Some(v)))
//!   .unwrap();
//! single.dispatched().unwrap().wait();
//! assert_eq!(*seen.lock().unwrap(), Some(42));
//! ```

use std::{
  fmt::{Debug, Formatter},
  future::Future,
  panic::{catch_unwind, AssertUnwindSafe},
  pin::Pin,
  sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
  task::{Context, Poll},
};

use futures::{
  future,
  task::{AtomicWaker, Spawn, SpawnExt},
};
use tracing::{debug, error, trace};

use crate::{
  emitter::{Emitter, SingleIterator},
  error::{ExhaustedError, SubscribeError},
  observer::Handlers,
  scheduler::{default_scheduler, SharedScheduler},
  stream::SingleStream,
  subscription::{DispatchState, Subscription, SubscriptionLike},
};

/// A single bound to the zero-value emitter, for lifecycle-only use.
pub type DefaultSingle = Single<()>;

#[derive(Default)]
struct SingleState {
  consumed: bool,
  current: Option<Subscription>,
  dispatch: Option<Dispatch>,
}

/// Producer of exactly one value or one error.
pub struct Single<E> {
  emitter: Arc<E>,
  state: Mutex<SingleState>,
  scheduler: SharedScheduler,
}

impl<E> Single<E> {
  /// Wraps `emitter`, dispatching on the default scheduler.
  pub fn new(emitter: E) -> Self {
    Single {
      emitter: Arc::new(emitter),
      state: Mutex::default(),
      scheduler: default_scheduler(),
    }
  }

  /// Wraps `emitter`, dispatching on `scheduler`.
  pub fn with_scheduler<S>(emitter: E, scheduler: S) -> Self
  where
    S: Spawn + Send + Sync + 'static,
  {
    Single {
      emitter: Arc::new(emitter),
      state: Mutex::default(),
      scheduler: Arc::new(scheduler),
    }
  }

  /// The wrapped emitter.
  pub fn emitter(&self) -> &E { &self.emitter }

  /// Stamps `UnsubscribeAt` on the most recent subscription and returns it.
  ///
  /// A dispatch already in flight still runs to completion. Without any prior
  /// `subscribe` a detached, empty record is returned.
  pub fn unsubscribe(&self) -> Subscription {
    let current = self.lock().current.clone();
    match current {
      Some(mut subscription) => {
        subscription.unsubscribe();
        debug!(state = ?subscription.state(), "unsubscribed");
        subscription
      }
      None => {
        debug!("unsubscribe without a prior subscribe");
        Subscription::detached()
      }
    }
  }

  /// Completion signal of the most recent dispatch, if any subscribe happened.
  pub fn dispatched(&self) -> Option<Dispatch> { self.lock().dispatch.clone() }

  fn lock(&self) -> MutexGuard<'_, SingleState> { self.state.lock().unwrap_or_else(PoisonError::into_inner) }
}

impl<E> Single<E>
where
  E: Emitter + Send + Sync + 'static,
{
  /// Subscribes `handlers` to the outcome of the wrapped emitter.
  ///
  /// The returned subscription already carries `SubscribeAt`; the handler
  /// runs later on the scheduler. Emission errors never surface here, the
  /// only failure is a scheduler that refuses the task, which includes the
  /// default scheduler when its thread pool could not be started.
  pub fn subscribe<H>(&self, handlers: H) -> Result<Subscription, SubscribeError>
  where
    H: Handlers<E::Item, E::Err> + Send + 'static,
  {
    let subscription = Subscription::start();
    let signal = Arc::new(Signal::default());
    let completion = Completion(signal.clone());
    let dispatch = Dispatch(signal);

    let mut state = self.lock();
    let previous = (state.current.replace(subscription.clone()), state.dispatch.replace(dispatch));
    drop(state);

    let emitter = self.emitter.clone();
    let record = subscription.clone();
    let task = future::lazy(move |_| {
      if catch_unwind(AssertUnwindSafe(|| run_dispatch(&*emitter, handlers, &record))).is_err() {
        error!("handler panicked during dispatch");
        record.set_state(DispatchState::Completed);
      }
      drop(completion);
    });

    if let Err(err) = self.scheduler.spawn(task) {
      let mut state = self.lock();
      // A concurrent subscribe may already own the slot.
      if state.current.as_ref().is_some_and(|c| c.is_same(&subscription)) {
        state.current = previous.0;
        state.dispatch = previous.1;
      }
      debug!(error = %err, "dispatch spawn refused");
      return Err(err.into());
    }

    trace!(emitter = std::any::type_name::<E>(), "subscribed");
    Ok(subscription)
  }
}

fn run_dispatch<E, H>(emitter: &E, handlers: H, record: &Subscription)
where
  E: Emitter,
  H: Handlers<E::Item, E::Err>,
{
  record.set_state(DispatchState::Dispatching);
  match emitter.emit() {
    Ok(value) if handlers.has_next() => handlers.next(value),
    Err(err) if handlers.has_error() => handlers.error(err),
    Ok(_) => trace!("no next handler, value dropped"),
    Err(_) => trace!("no error handler, error dropped"),
  }
  record.set_state(DispatchState::Completed);
}

impl<E> SingleStream for Single<E>
where
  E: Emitter + Send + Sync + 'static,
{
  type Item = E::Item;
  type Err = E::Err;

  fn subscribe<H>(&self, handlers: H) -> Result<Subscription, SubscribeError>
  where
    H: Handlers<E::Item, E::Err> + Send + 'static,
  {
    Single::subscribe(self, handlers)
  }

  fn unsubscribe(&self) -> Subscription { Single::unsubscribe(self) }
}

impl<E: Emitter> SingleIterator for Single<E> {
  type Source = E;

  fn next(&self) -> Result<Arc<E>, ExhaustedError> {
    let mut state = self.lock();
    if state.consumed {
      return Err(ExhaustedError);
    }
    state.consumed = true;
    Ok(self.emitter.clone())
  }
}

impl<E: Default> Default for Single<E> {
  fn default() -> Self { Single::new(E::default()) }
}

impl<E> Debug for Single<E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let state = self.lock();
    f.debug_struct("Single")
      .field("emitter", &std::any::type_name::<E>())
      .field("consumed", &state.consumed)
      .field("current", &state.current)
      .finish()
  }
}

// ============================================================================
// Dispatch - completion signal
// ============================================================================

#[derive(Default)]
struct Signal {
  done: Mutex<bool>,
  finished: Condvar,
  waker: AtomicWaker,
}

impl Signal {
  fn done(&self) -> MutexGuard<'_, bool> { self.done.lock().unwrap_or_else(PoisonError::into_inner) }

  fn complete(&self) {
    *self.done() = true;
    self.finished.notify_all();
    self.waker.wake();
  }
}

/// Completes the paired [`Dispatch`] when dropped, also when the scheduler
/// drops the task without running it.
struct Completion(Arc<Signal>);

impl Drop for Completion {
  fn drop(&mut self) { self.0.complete() }
}

/// Resolves once a dispatch task finished, or was dropped by its scheduler.
///
/// Cloning is cheap; every clone observes the same task. Waiting never enters
/// an executor, so it is allowed inside a handler.
#[derive(Clone)]
pub struct Dispatch(Arc<Signal>);

impl Dispatch {
  /// Blocks the current thread until the dispatch finished.
  pub fn wait(&self) {
    let mut done = self.0.done();
    while !*done {
      done = self.0.finished.wait(done).unwrap_or_else(PoisonError::into_inner);
    }
  }

  /// Whether the dispatch already finished, without blocking.
  pub fn is_done(&self) -> bool { *self.0.done() }
}

impl Future for Dispatch {
  type Output = ();

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
    self.0.waker.register(cx.waker());
    if self.is_done() { Poll::Ready(()) } else { Poll::Pending }
  }
}

impl Debug for Dispatch {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Dispatch").field("done", &self.is_done()).finish()
  }
}

#[cfg(test)]
mod test {
  use std::{
    convert::Infallible,
    sync::{
      atomic::{AtomicUsize, Ordering},
      mpsc::{channel, Receiver, Sender},
    },
    thread,
    time::{Duration, SystemTime},
  };

  use futures::{future::FutureObj, task::SpawnError};

  use super::*;
  use crate::{
    observer::{ErrFunc, NextFunc, Noop, Observer},
    scheduler::SyncScheduler,
    subscription::Subscriptor,
  };

  #[derive(Debug, PartialEq)]
  struct Number(i32);

  impl Emitter for Number {
    type Item = i32;
    type Err = Infallible;

    fn emit(&self) -> Result<i32, Infallible> { Ok(self.0) }
  }

  struct Text;

  impl Emitter for Text {
    type Item = String;
    type Err = String;

    fn emit(&self) -> Result<String, String> { Err("text error".to_owned()) }
  }

  struct Refused;

  impl Spawn for Refused {
    fn spawn_obj(&self, _: FutureObj<'static, ()>) -> Result<(), SpawnError> { Err(SpawnError::shutdown()) }
  }

  // Holds the first spawn until released, then refuses it. Later spawns run inline.
  struct Gated {
    calls: AtomicUsize,
    entered: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
  }

  impl Spawn for Gated {
    fn spawn_obj(&self, future: FutureObj<'static, ()>) -> Result<(), SpawnError> {
      if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
        self.entered.lock().unwrap().send(()).unwrap();
        self.release.lock().unwrap().recv().unwrap();
        return Err(SpawnError::shutdown());
      }
      SyncScheduler.spawn_obj(future)
    }
  }

  #[test]
  fn next_is_one_shot() {
    let single = Single::new(Number(1));
    assert_eq!(*single.next().unwrap(), Number(1));
    assert_eq!(single.next().unwrap_err(), ExhaustedError);
    assert_eq!(single.next().unwrap_err(), ExhaustedError);
  }

  #[test]
  fn subscribe_ignores_exhaustion() {
    let single = Single::with_scheduler(Number(4), SyncScheduler);
    single.next().unwrap();
    let got = Arc::new(AtomicUsize::new(0));
    let c_got = got.clone();
    single
      .subscribe(NextFunc(move |v: i32| c_got.store(v as usize, Ordering::SeqCst)))
      .unwrap();
    assert_eq!(got.load(Ordering::SeqCst), 4);
  }

  #[test]
  fn sync_scheduler_dispatches_before_return() {
    let single = Single::with_scheduler(Text, SyncScheduler);
    let msg = Arc::new(Mutex::new(String::new()));
    let c_msg = msg.clone();
    let sub = single.subscribe(ErrFunc(move |e: String| *c_msg.lock().unwrap() = e)).unwrap();
    assert_eq!(*msg.lock().unwrap(), "text error");
    assert_eq!(sub.state(), DispatchState::Completed);
    assert!(single.dispatched().unwrap().is_done());
  }

  #[test]
  fn exactly_one_handler_runs() {
    let hits = Arc::new(AtomicUsize::new(0));
    let (c1, c2) = (hits.clone(), hits.clone());
    let single = Single::new(Number(1));
    single
      .subscribe(Observer::new(
        move |_: i32| {
          c1.fetch_add(1, Ordering::SeqCst);
        },
        move |_: Infallible| {
          c2.fetch_add(10, Ordering::SeqCst);
        },
      ))
      .unwrap();
    single.dispatched().unwrap().wait();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn missing_capability_drops_outcome() {
    let single = Single::new(Text);
    let sub = single.subscribe(NextFunc(|_: String| panic!("no value expected"))).unwrap();
    single.dispatched().unwrap().wait();
    assert_eq!(sub.state(), DispatchState::Completed);
  }

  #[test]
  fn panicking_handler_still_completes() {
    let single = Single::new(Number(1));
    let sub = single.subscribe(NextFunc(|_: i32| panic!("boom"))).unwrap();
    single.dispatched().unwrap().wait();
    assert_eq!(sub.state(), DispatchState::Completed);
  }

  #[test]
  fn unsubscribe_returns_same_record() {
    let single = DefaultSingle::default();
    let before = SystemTime::now();
    let sub1 = single.subscribe(Noop).unwrap();
    let sub2 = single.unsubscribe();
    assert!(sub1.is_same(&sub2));
    assert_eq!(sub1.subscribe_at(), sub2.subscribe_at());
    assert_eq!(sub1.unsubscribe_at(), sub2.unsubscribe_at());
    let at = sub1.subscribe_at().unwrap();
    assert!(at.duration_since(before).unwrap_or_default() < Duration::from_millis(20));
  }

  #[test]
  fn unsubscribe_tracks_latest_subscription() {
    let single = DefaultSingle::default();
    let first = single.subscribe(Noop).unwrap();
    let second = single.subscribe(Noop).unwrap();
    let unsub = single.unsubscribe();
    assert!(unsub.is_same(&second));
    assert!(!first.is_closed());
  }

  #[test]
  fn unsubscribe_before_subscribe_is_detached() {
    let single = DefaultSingle::default();
    let sub = single.unsubscribe();
    assert_eq!(sub.subscribe_at(), None);
    assert_eq!(sub.unsubscribe_at(), None);
    assert!(single.dispatched().is_none());
  }

  #[test]
  fn refused_spawn_keeps_previous_subscription() {
    let single = Single::with_scheduler((), Refused);
    let err = single.subscribe(Noop).unwrap_err();
    assert_eq!(err.as_label(), "subscribe_spawn");
    assert!(single.dispatched().is_none());
    assert_eq!(single.unsubscribe().subscribe_at(), None);
  }

  #[test]
  fn refused_spawn_spares_concurrent_subscription() {
    let (entered_tx, entered_rx) = channel();
    let (release_tx, release_rx) = channel();
    let single = Arc::new(Single::with_scheduler(
      (),
      Gated {
        calls: AtomicUsize::new(0),
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
      },
    ));

    let c_single = single.clone();
    let refused = thread::spawn(move || c_single.subscribe(Noop));
    entered_rx.recv().unwrap();
    let live = single.subscribe(Noop).unwrap();
    release_tx.send(()).unwrap();
    assert!(refused.join().unwrap().is_err());

    let unsub = single.unsubscribe();
    assert!(unsub.is_same(&live));
    assert!(live.unsubscribe_at().is_some());
    assert!(single.dispatched().unwrap().is_done());
  }

  #[cfg(feature = "futures-scheduler")]
  #[test]
  fn wait_inside_handler() {
    use crate::scheduler::SchedulerConfig;

    let outer_pool = SchedulerConfig::default().pool_size(1).build().unwrap();
    let inner_pool = SchedulerConfig::default().pool_size(1).build().unwrap();
    let outer = Single::with_scheduler(Number(1), outer_pool);
    let finished = Arc::new(AtomicUsize::new(0));
    let c_finished = finished.clone();
    outer
      .subscribe(NextFunc(move |_: i32| {
        let inline = Single::with_scheduler(Number(2), SyncScheduler);
        let pooled = Single::with_scheduler(Number(3), inner_pool);
        for single in [&inline, &pooled] {
          let c_finished = c_finished.clone();
          single
            .subscribe(NextFunc(move |v: i32| {
              c_finished.fetch_add(v as usize, Ordering::SeqCst);
            }))
            .unwrap();
          single.dispatched().unwrap().wait();
        }
        c_finished.fetch_add(10, Ordering::SeqCst);
      }))
      .unwrap();
    outer.dispatched().unwrap().wait();
    assert_eq!(finished.load(Ordering::SeqCst), 15);
  }

  #[test]
  fn single_is_iterator_and_stream() {
    fn assert_iterator<S: SingleIterator>(_: &S) {}
    fn assert_stream<S: SingleStream>(_: &S) {}

    let single = DefaultSingle::default();
    assert_iterator(&single);
    assert_stream(&single);

    let sub = SingleStream::subscribe(&single, Noop).unwrap();
    assert!(SingleStream::unsubscribe(&single).is_same(&sub));
  }
}
