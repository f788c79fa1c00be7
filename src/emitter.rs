//! The pull side: emitters produce one outcome, iterators hand out emitters.

use std::{convert::Infallible, sync::Arc};

use crate::error::ExhaustedError;

/// A capability that produces one outcome on demand.
///
/// `emit` is expected to be deterministic and free of side effects visible to
/// the caller; a [`Single`](crate::single::Single) may call it again for every
/// subscription.
pub trait Emitter {
  type Item;
  type Err;

  fn emit(&self) -> Result<Self::Item, Self::Err>;
}

/// The zero-value emitter: always succeeds with `()`.
impl Emitter for () {
  type Item = ();
  type Err = Infallible;

  #[inline]
  fn emit(&self) -> Result<(), Infallible> { Ok(()) }
}

impl<E: Emitter + ?Sized> Emitter for Arc<E> {
  type Item = E::Item;
  type Err = E::Err;

  #[inline]
  fn emit(&self) -> Result<Self::Item, Self::Err> { (**self).emit() }
}

impl<E: Emitter + ?Sized> Emitter for Box<E> {
  type Item = E::Item;
  type Err = E::Err;

  #[inline]
  fn emit(&self) -> Result<Self::Item, Self::Err> { (**self).emit() }
}

/// Pull-based, one-shot source of emitters.
///
/// The first `next` hands out the emitter; every later call fails with
/// [`ExhaustedError`]. There is no way to reset it.
pub trait SingleIterator {
  type Source: Emitter;

  fn next(&self) -> Result<Arc<Self::Source>, ExhaustedError>;
}

#[cfg(test)]
mod test {
  use super::*;

  struct Fails;

  impl Emitter for Fails {
    type Item = u8;
    type Err = &'static str;

    fn emit(&self) -> Result<u8, &'static str> { Err("nope") }
  }

  #[test]
  fn unit_always_emits() {
    assert_eq!(().emit(), Ok(()));
  }

  #[test]
  fn smart_pointers_forward() {
    let boxed: Box<dyn Emitter<Item = u8, Err = &'static str>> = Box::new(Fails);
    assert_eq!(boxed.emit(), Err("nope"));
    assert_eq!(Arc::new(Fails).emit(), Err("nope"));
  }
}
