//! Primitive batch (draw stream) types.
//!
//! Responsibilities:
//! - store render-space primitive commands in submission order
//! - guard accumulation with an explicit open/closed state machine
//! - count what was flushed so callers can observe batching behavior
//!
//! Commands are 2D shapes composited back-to-front in draw-call order; there
//! is no z-index and no reordering at flush time.

mod batch;
mod cmd;
mod stats;

pub use batch::{BatchError, BatchState, PrimitiveBatch};
pub use cmd::PrimitiveCmd;
pub use stats::BatchStats;
