//! # Single-Writer Serialization
//!
//! Every operation in the stack is a single atomic state transition taking
//! `&mut self`. [`SerialExecutor`] is the one serialization point that lets
//! those operations be submitted from many threads: it owns the state
//! behind a mutex, applies one submission at a time, and stamps each with
//! a strictly increasing sequence number so the applied order can be
//! audited afterwards.
//!
//! ## Security Invariant
//!
//! The sequence number is assigned while the lock is held, so sequence
//! order equals application order. No submission can observe another one
//! half-applied.

use parking_lot::Mutex;

/// Output of one applied submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequenced<R> {
    /// Position in the serialized log, starting at 1.
    pub sequence: u64,
    /// Whatever the submitted operation returned.
    pub output: R,
}

struct Inner<S> {
    state: S,
    applied: u64,
}

/// Owns state `S` and applies submitted operations strictly one at a time.
pub struct SerialExecutor<S> {
    inner: Mutex<Inner<S>>,
}

impl<S> SerialExecutor<S> {
    /// Take ownership of `state`.
    pub fn new(state: S) -> Self {
        Self {
            inner: Mutex::new(Inner { state, applied: 0 }),
        }
    }

    /// Apply `op` to the state and return its output with its sequence
    /// number. `label` is recorded in the trace span.
    pub fn submit<R>(&self, label: &str, op: impl FnOnce(&mut S) -> R) -> Sequenced<R> {
        let mut inner = self.inner.lock();
        inner.applied += 1;
        let sequence = inner.applied;
        let span = tracing::debug_span!("serial_apply", op = label, sequence);
        let _entered = span.enter();
        let output = op(&mut inner.state);
        Sequenced { sequence, output }
    }

    /// Read the state without counting as a submission.
    pub fn read<R>(&self, view: impl FnOnce(&S) -> R) -> R {
        let inner = self.inner.lock();
        view(&inner.state)
    }

    /// Number of submissions applied so far.
    pub fn applied(&self) -> u64 {
        self.inner.lock().applied
    }

    /// Give back the state.
    pub fn into_inner(self) -> S {
        self.inner.into_inner().state
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for SerialExecutor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("SerialExecutor")
            .field("applied", &inner.applied)
            .field("state", &inner.state)
            .finish()
    }
}
