use std::fmt;

use super::{BatchStats, PrimitiveCmd};

/// Whether the batch is currently accumulating commands.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum BatchState {
    #[default]
    Closed,
    Open,
}

/// Misuse of the batch state machine.
///
/// These indicate sequencing bugs in the caller, not recoverable conditions;
/// the batch contents are left untouched when one is returned.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// `begin` was called while a batch was already open.
    AlreadyOpen,
    /// `append` or `end` was called with no open batch.
    NotOpen,
    /// `flush_into` was called before the batch was closed with `end`.
    OpenAtFlush,
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::AlreadyOpen => write!(f, "batch is already open"),
            BatchError::NotOpen => write!(f, "no batch is open"),
            BatchError::OpenAtFlush => write!(f, "batch must be ended before it can be flushed"),
        }
    }
}

impl std::error::Error for BatchError {}

/// Accumulating buffer of render-space primitive commands.
///
/// Lifecycle: `begin` → `append`* → `end` → `flush_into`, repeated once per
/// frame. Commands drain in submission order — draw-call order is paint order
/// for 2D composition, so no sorting happens here.
///
/// Internal buffers are reused across cycles; a warmed batch does not allocate
/// per frame.
#[derive(Debug, Default)]
pub struct PrimitiveBatch {
    cmds: Vec<PrimitiveCmd>,
    state: BatchState,
    stats: BatchStats,
}

impl PrimitiveBatch {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> BatchState {
        self.state
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == BatchState::Open
    }

    /// Number of commands accumulated since the last flush.
    #[inline]
    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    #[inline]
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Opens the batch for accumulation.
    pub fn begin(&mut self) -> Result<(), BatchError> {
        if self.is_open() {
            return Err(BatchError::AlreadyOpen);
        }
        self.state = BatchState::Open;
        Ok(())
    }

    /// Records one command at the end of the stream.
    pub fn append(&mut self, cmd: PrimitiveCmd) -> Result<(), BatchError> {
        if !self.is_open() {
            return Err(BatchError::NotOpen);
        }
        self.cmds.push(cmd);
        Ok(())
    }

    /// Closes the batch. Accumulated commands are retained until `flush_into`.
    pub fn end(&mut self) -> Result<(), BatchError> {
        if !self.is_open() {
            return Err(BatchError::NotOpen);
        }
        self.state = BatchState::Closed;
        Ok(())
    }

    /// Drains the closed batch into `out` in submission order and updates
    /// flush statistics. `out` is cleared first.
    pub fn flush_into(&mut self, out: &mut Vec<PrimitiveCmd>) -> Result<(), BatchError> {
        if self.is_open() {
            return Err(BatchError::OpenAtFlush);
        }
        out.clear();
        out.append(&mut self.cmds);
        self.stats.record_flush(out.len());
        Ok(())
    }

    /// Discards commands accumulated so far without closing the batch.
    ///
    /// Used when a full-screen fill arrives mid-batch: the fill paints over
    /// everything recorded before it, so those commands can never be visible.
    pub fn discard_pending(&mut self) {
        self.cmds.clear();
    }
}
