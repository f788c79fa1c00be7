//! Handlers and the Observer that composes them
//!
//! A consumer handed to [`Single::subscribe`](crate::single::Single::subscribe)
//! is any [`Handlers`] implementation. Each one advertises which outcomes it
//! can take through `has_next` / `has_error`; dispatch only calls the method
//! matching the outcome and drops the outcome otherwise.

// ============================================================================
// Handlers Trait
// ============================================================================

/// Consumer capability set for one single-value outcome.
///
/// Both methods consume `self`: a dispatch delivers exactly one outcome, so
/// after it the consumer is done. The default implementations advertise no
/// capability and discard what they receive.
pub trait Handlers<Item, Err> {
  /// Whether this consumer accepts a value.
  fn has_next(&self) -> bool { false }

  /// Whether this consumer accepts an error.
  fn has_error(&self) -> bool { false }

  /// Receive the emitted value.
  fn next(self, _value: Item)
  where
    Self: Sized,
  {
  }

  /// Receive the emission error.
  fn error(self, _err: Err)
  where
    Self: Sized,
  {
  }
}

// ============================================================================
// DynHandlers Trait - Object-safe Handlers
// ============================================================================

/// Object-safe mirror of [`Handlers`], so consumers can be boxed.
pub trait DynHandlers<Item, Err> {
  fn box_has_next(&self) -> bool;
  fn box_has_error(&self) -> bool;
  fn box_next(self: Box<Self>, value: Item);
  fn box_error(self: Box<Self>, err: Err);
}

impl<T, Item, Err> DynHandlers<Item, Err> for T
where
  T: Handlers<Item, Err>,
{
  fn box_has_next(&self) -> bool { self.has_next() }
  fn box_has_error(&self) -> bool { self.has_error() }
  fn box_next(self: Box<Self>, value: Item) { (*self).next(value) }
  fn box_error(self: Box<Self>, err: Err) { (*self).error(err) }
}

/// Boxed consumer that can cross threads.
pub type BoxedHandlers<'a, Item, Err> = Box<dyn DynHandlers<Item, Err> + Send + 'a>;

impl<'a, Item, Err> Handlers<Item, Err> for BoxedHandlers<'a, Item, Err> {
  #[inline]
  fn has_next(&self) -> bool { (**self).box_has_next() }

  #[inline]
  fn has_error(&self) -> bool { (**self).box_has_error() }

  #[inline]
  fn next(self, value: Item) { self.box_next(value) }

  #[inline]
  fn error(self, err: Err) { self.box_error(err) }
}

// ============================================================================
// Closure adapters
// ============================================================================

/// Next-only consumer built from a closure.
#[derive(Clone)]
pub struct NextFunc<F>(pub F);

impl<F, Item, Err> Handlers<Item, Err> for NextFunc<F>
where
  F: FnOnce(Item),
{
  #[inline]
  fn has_next(&self) -> bool { true }

  #[inline]
  fn next(self, value: Item) { (self.0)(value) }
}

/// Error-only consumer built from a closure.
#[derive(Clone)]
pub struct ErrFunc<F>(pub F);

impl<F, Item, Err> Handlers<Item, Err> for ErrFunc<F>
where
  F: FnOnce(Err),
{
  #[inline]
  fn has_error(&self) -> bool { true }

  #[inline]
  fn error(self, err: Err) { (self.0)(err) }
}

/// Consumer without any capability. Every outcome is dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct Noop;

impl<Item, Err> Handlers<Item, Err> for Noop {}

// ============================================================================
// Observer - composed consumer
// ============================================================================

/// Composes a next handler and an error handler into one consumer.
///
/// ```
/// use rxsingle::prelude::*;
///
/// let ob = Observer::new(|v: i32| println!("got {v}"), |e: String| eprintln!("{e}"));
/// assert!(Handlers::<i32, String>::has_next(&ob));
/// assert!(Handlers::<i32, String>::has_error(&ob));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Observer<N, E> {
  pub next_handler: N,
  pub err_handler: E,
}

impl<N, E> Observer<N, E> {
  /// Wraps an already built pair of handlers.
  pub fn compose(next_handler: N, err_handler: E) -> Self { Observer { next_handler, err_handler } }
}

impl<N, E> Observer<NextFunc<N>, ErrFunc<E>> {
  /// Builds an observer from a pair of closures.
  pub fn new(next: N, error: E) -> Self { Observer::compose(NextFunc(next), ErrFunc(error)) }
}

impl<N> Observer<NextFunc<N>, Noop> {
  /// Builds an observer that only takes values.
  pub fn from_next(next: N) -> Self { Observer::compose(NextFunc(next), Noop) }
}

impl<E> Observer<Noop, ErrFunc<E>> {
  /// Builds an observer that only takes errors.
  pub fn from_error(error: E) -> Self { Observer::compose(Noop, ErrFunc(error)) }
}

impl<N, E, Item, Err> Handlers<Item, Err> for Observer<N, E>
where
  N: Handlers<Item, Err>,
  E: Handlers<Item, Err>,
{
  #[inline]
  fn has_next(&self) -> bool { self.next_handler.has_next() }

  #[inline]
  fn has_error(&self) -> bool { self.err_handler.has_error() }

  #[inline]
  fn next(self, value: Item) { self.next_handler.next(value) }

  #[inline]
  fn error(self, err: Err) { self.err_handler.error(err) }
}

/// Option consumer - None has no capability, Some delegates to inner
impl<H, Item, Err> Handlers<Item, Err> for Option<H>
where
  H: Handlers<Item, Err>,
{
  fn has_next(&self) -> bool { self.as_ref().is_some_and(<H as Handlers<Item, Err>>::has_next) }

  fn has_error(&self) -> bool { self.as_ref().is_some_and(<H as Handlers<Item, Err>>::has_error) }

  fn next(self, value: Item) {
    if let Some(inner) = self {
      inner.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }
}

// ============================================================================
// Tests
// ============================================================================
