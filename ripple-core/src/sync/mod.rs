//! Synchronization Primitives
//!
//! Everything in the crate that is shared between threads is built on the
//! two types in this module:
//!
//! - [`Atomic`]: a mutex-guarded cell offering exclusive-access transforms.
//! - [`Bag`]: a keyed, unordered store with stable, never-reused keys.
//!
//! Neither type knows anything about signals. Combinators own their own
//! cells privately; there is no shared registry.

mod atomic;
mod bag;

pub use atomic::Atomic;
pub use bag::{Bag, BagKey};
