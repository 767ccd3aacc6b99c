//! Ripple Core
//!
//! This crate provides a small, thread-safe functional-reactive core.
//! It implements:
//!
//! - Observers, signals, and signal combinators
//! - Properties (stateful observable values) and their derivations
//! - Cancellation tokens and pools that own subscriptions
//! - Scheduler-driven delivery for thread hops and delays
//!
//! Delivery is push-based and synchronous: a value sent into a
//! [`SignalPipe`](reactive::SignalPipe) or set on a
//! [`Property`](reactive::Property) reaches every current observer before
//! the call returns.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `sync`: Mutex-guarded cell and keyed bag shared by everything else
//! - `dispose`: `Disposable` tokens and `DisposePool`
//! - `reactive`: `Observer`, `Signal`, `SignalPipe`, `Property`, `ReadOnlyProperty`
//! - `dispatch`: `Scheduler` trait, `WorkItem`, and scheduling combinators
//! - `error`: `DispatchError`
//!
//! # Example
//!
//! ```rust
//! use ripple_core::dispose::DisposePool;
//! use ripple_core::reactive::{Property, ReadOnlyProperty};
//!
//! let pool = DisposePool::new();
//!
//! // Create two properties
//! let width = Property::new(2);
//! let height = Property::new(3);
//!
//! // Derive a value from both
//! let area = ReadOnlyProperty::combine_latest2(&width.read_only(), &height.read_only())
//!     .map(|(w, h)| w * h);
//!
//! // Observe it
//! area.values()
//!     .observe(|a| println!("Area: {a}"))
//!     .dispose_in(&pool);
//!
//! // Update a source
//! width.set(5);
//! // Prints "Area: 6", then "Area: 15"
//! assert_eq!(area.get(), 15);
//! ```

pub mod dispatch;
pub mod dispose;
pub mod error;
pub mod reactive;
pub mod sync;
