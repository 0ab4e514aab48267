//! Dispatch
//!
//! The tiered queue of pending cases, the pluggable selection strategies and
//! the dispatcher that pairs idle units with cases.

mod dispatcher;
mod event;
mod queue;
mod strategy;

pub use dispatcher::Dispatcher;
pub use event::DispatchEvent;
pub use queue::{DispatchQueue, QueueSlot};
pub use strategy::{
    DispatchStrategy, Fifo, HighestPriorityFirst, Nearest, RandomPick, SelectionContext,
    StrategyKind,
};
