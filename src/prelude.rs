//! Prelude module for convenient imports

pub use crate::{
  emitter::{Emitter, SingleIterator},
  error::{ExhaustedError, SubscribeError},
  observer::{BoxedHandlers, DynHandlers, ErrFunc, Handlers, NextFunc, Noop, Observer},
  scheduler::{default_scheduler, SharedScheduler, SyncScheduler},
  single::{DefaultSingle, Dispatch, Single},
  stream::SingleStream,
  subscription::{DispatchState, Subscription, SubscriptionGuard, SubscriptionLike, Subscriptor},
};
