//! spranim-events-core
//!
//! Deterministic side-effect ordering for the editor core:
//! - [`PriorityQueue`]: min-heap of priority buckets, each an insertion-ordered key→value map.
//! - [`EventBus`]: string-typed publish/subscribe registry built on the queue. Lower
//!   priorities fire first; ties fire in registration order.
//!
//! Everything here is single-threaded. The bus is an `Rc` handle and is deliberately
//! neither `Send` nor `Sync`.

pub mod bus;
pub mod priority_queue;

pub use bus::{EventBus, Handler, OwnerId, DEFAULT_PRIORITY};
pub use priority_queue::{Priority, PriorityQueue};
