//! # rxsingle: a single-value reactive primitive
//!
//! A [`Single`] wraps one [`Emitter`] and delivers its one outcome, a value or
//! an error, to a subscribed consumer without blocking the caller.
//!
//! ```rust
//! use std::convert::Infallible;
//! use rxsingle::prelude::*;
//!
//! struct Number(i32);
//!
//! impl Emitter for Number {
//!   type Item = i32;
//!   type Err = Infallible;
//!
//!   fn emit(&self) -> Result<i32, Infallible> { Ok(self.0) }
//! }
//!
//! let single = Single::new(Number(1));
//! let mut sub = single.subscribe(NextFunc(|v: i32| println!("Value: {}", v))).unwrap();
//! assert!(sub.subscribe_at().is_some());
//!
//! let same = single.unsubscribe();
//! assert!(sub.is_same(&same));
//! assert!(sub.is_closed());
//! # sub.unsubscribe();
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Emitter`] | Produces one `Result<Item, Err>` on demand |
//! | [`SingleIterator`] | One-shot pull of the wrapped emitter |
//! | [`SingleStream`] | Subscribe / unsubscribe capability |
//! | [`Handlers`] / [`Observer`] | Consumers with a next and/or an error capability |
//! | [`Subscription`] | Shared lifecycle record with `SubscribeAt` / `UnsubscribeAt` |
//! | [`scheduler`] | Where dispatch tasks run |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): shared `futures` thread pool for dispatch
//! - **`tokio-scheduler`**: [`scheduler::TokioScheduler`] for tokio runtimes
//!
//! [`Emitter`]: emitter::Emitter
//! [`SingleIterator`]: emitter::SingleIterator
//! [`SingleStream`]: stream::SingleStream
//! [`Handlers`]: observer::Handlers
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription

pub mod emitter;
pub mod error;
pub mod observer;
pub mod prelude;
pub mod scheduler;
pub mod single;
pub mod stream;
pub mod subscription;

pub use prelude::*;
