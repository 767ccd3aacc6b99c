//! Reactive Primitives
//!
//! This module implements the push-based reactive core: observers, signals,
//! and properties. Everything else in the crate exists to support them.
//!
//! # Concepts
//!
//! ## Observers
//!
//! An [`Observer`] is a sink for values. Combinators on observers build new
//! sinks that filter, transform, or remember what they receive.
//!
//! ## Signals
//!
//! A [`Signal`] is a recipe for a subscription. Nothing happens until an
//! observer subscribes; each subscription is independent and returns a
//! [`Disposable`](crate::dispose::Disposable) that ends it. Signals are
//! hot-or-cold depending on their source: [`SignalPipe`] is the hot source
//! that application code pushes into.
//!
//! ## Properties
//!
//! A [`Property`] holds a current value and a signal of changes.
//! [`ReadOnlyProperty`] is the same thing without the setter; derived
//! properties (`map`, `switch_map`, `combine_latest*`) are read-only.
//!
//! # Implementation Notes
//!
//! There is no scheduler inside this module. Delivery is synchronous on the
//! thread that sends the value, and any thread may send. Locks are never
//! held while user callbacks run. For thread hops and delays see
//! [`dispatch`](crate::dispatch).

mod combine;
mod observer;
mod pipe;
mod property;
mod property_combine;
mod read_only;
mod signal;

#[cfg(test)]
mod testing;

pub use observer::Observer;
pub use pipe::SignalPipe;
pub use property::Property;
pub use read_only::ReadOnlyProperty;
pub use signal::{Signal, SignalEffects};
