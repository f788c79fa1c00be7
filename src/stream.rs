//! The push side: subscribing consumers to a single outcome.

use crate::{error::SubscribeError, observer::Handlers, subscription::Subscription};

/// A source that delivers its outcome to subscribed [`Handlers`].
///
/// Together with [`SingleIterator`](crate::emitter::SingleIterator) this is
/// the capability set of a [`Single`](crate::single::Single).
pub trait SingleStream {
  type Item;
  type Err;

  /// Registers `handlers` and returns the lifecycle record without waiting
  /// for delivery.
  fn subscribe<H>(&self, handlers: H) -> Result<Subscription, SubscribeError>
  where
    H: Handlers<Self::Item, Self::Err> + Send + 'static;

  /// Stamps and returns the most recent subscription.
  fn unsubscribe(&self) -> Subscription;
}
