//! # Execution state of a registry.
//!
//! ```text
//!            try_begin()            finish()
//!  Pending ─────────────► Executing ─────────► Done
//!     ▲                        │                 │
//!     └──────── reset() ───────┴─────────────────┘
//! ```
//!
//! Transitions out of `Pending` and `Executing` are compare-and-swap, so exactly one
//! caller wins `try_begin` and a `reset` that lands mid-walk is not overwritten by
//! the walk's `finish`.

use std::sync::atomic::{AtomicU8, Ordering};

/// Observable execution state of a [`CleanupRegistry`](crate::CleanupRegistry).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ExecState {
    /// Armed; the next `execute` performs the walk.
    Pending = 0,
    /// A walk is in flight.
    Executing = 1,
    /// A walk has finished; `execute` is a no-op until `reset`.
    Done = 2,
}

impl ExecState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => ExecState::Pending,
            1 => ExecState::Executing,
            _ => ExecState::Done,
        }
    }
}

/// Atomic cell holding an [`ExecState`].
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(ExecState::Pending as u8))
    }

    pub(crate) fn load(&self) -> ExecState {
        ExecState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// `Pending → Executing`; returns `false` if another caller already started.
    pub(crate) fn try_begin(&self) -> bool {
        self.0
            .compare_exchange(
                ExecState::Pending as u8,
                ExecState::Executing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// `Executing → Done`; a no-op if the registry was reset meanwhile.
    pub(crate) fn finish(&self) {
        let _ = self.0.compare_exchange(
            ExecState::Executing as u8,
            ExecState::Done as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    pub(crate) fn reset(&self) {
        self.0.store(ExecState::Pending as u8, Ordering::Release);
    }
}
