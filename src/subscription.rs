use std::{
  fmt::{Debug, Formatter},
  sync::{Arc, Mutex, MutexGuard, PoisonError},
  time::SystemTime,
};

/// Read access to the lifecycle timestamps of a subscription.
pub trait Subscriptor {
  /// When the subscription was created. `None` only for a detached record.
  fn subscribe_at(&self) -> Option<SystemTime>;

  /// When the subscription was cancelled, `None` while it is still active.
  fn unsubscribe_at(&self) -> Option<SystemTime>;
}

/// Subscription returns from `Single.subscribe(Handlers)` to allow
///  unsubscribing.
pub trait SubscriptionLike {
  /// Marks the subscription as cancelled. It never interrupts a dispatch that
  /// is already running.
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

/// Progress of the dispatch task attached to a subscription.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DispatchState {
  #[default]
  Created,
  Dispatching,
  Completed,
}

#[derive(Debug, Default)]
struct Lifecycle {
  subscribe_at: Option<SystemTime>,
  unsubscribe_at: Option<SystemTime>,
  state: DispatchState,
}

/// Lifecycle record of one `subscribe` call.
///
/// Cloning is cheap and keeps the identity: every clone observes the same
/// timestamps, whether it came from `subscribe` or from `unsubscribe`.
#[derive(Clone, Default)]
pub struct Subscription(Arc<Mutex<Lifecycle>>);

impl Subscription {
  /// Creates a record stamped with the current wall-clock time.
  pub(crate) fn start() -> Self {
    Subscription(Arc::new(Mutex::new(Lifecycle {
      subscribe_at: Some(SystemTime::now()),
      ..Lifecycle::default()
    })))
  }

  /// Returns a record that was never subscribed.
  pub fn detached() -> Self { Self::default() }

  /// Whether both handles point at the same record.
  pub fn is_same(&self, other: &Subscription) -> bool { Arc::ptr_eq(&self.0, &other.0) }

  pub fn state(&self) -> DispatchState { self.lock().state }

  pub(crate) fn set_state(&self, state: DispatchState) { self.lock().state = state; }

  /// Activates "RAII" behavior for this subscription. That means
  /// `unsubscribe()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self> { SubscriptionGuard(self) }

  // Every write leaves the record consistent, so a poisoned lock is still usable.
  fn lock(&self) -> MutexGuard<'_, Lifecycle> { self.0.lock().unwrap_or_else(PoisonError::into_inner) }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.lock();
    f.debug_struct("Subscription")
      .field("subscribe_at", &inner.subscribe_at)
      .field("unsubscribe_at", &inner.unsubscribe_at)
      .field("state", &inner.state)
      .finish()
  }
}

impl Subscriptor for Subscription {
  #[inline]
  fn subscribe_at(&self) -> Option<SystemTime> { self.lock().subscribe_at }

  #[inline]
  fn unsubscribe_at(&self) -> Option<SystemTime> { self.lock().unsubscribe_at }
}

impl SubscriptionLike for Subscription {
  fn unsubscribe(&mut self) {
    let mut inner = self.lock();
    if inner.unsubscribe_at.is_none() {
      inner.unsubscribe_at = Some(SystemTime::now());
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.lock().unsubscribe_at.is_some() }
}

impl<T: ?Sized> SubscriptionLike for Box<T>
where
  T: SubscriptionLike,
{
  #[inline]
  fn unsubscribe(&mut self) {
    let s = &mut **self;
    s.unsubscribe()
  }

  #[inline]
  fn is_closed(&self) -> bool {
    let s = &**self;
    s.is_closed()
  }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(subscription) }

  /// The guarded subscription.
  pub fn inner(&self) -> &T { &self.0 }
}

impl<T: SubscriptionLike> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
