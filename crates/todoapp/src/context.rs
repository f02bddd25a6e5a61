//! # Cancellation Context
//!
//! Every storage operation takes a [`Context`]. A context may carry a
//! deadline, a shared cancellation flag, both, or neither
//! ([`Context::background`]).
//!
//! Stores call [`Context::check`] before touching the backend and again
//! between the read and the write half of a read-modify-write cycle, so a
//! write that has not started when the context fires is never started.
//! Blocking calls that are already in flight run to completion.
//!
//! Lock acquisition honours the deadline as well: a caller queued behind
//! another mutation gives up with [`TodoError::Cancelled`] instead of
//! waiting past its budget.

use crate::error::{Operation, Result, TodoError};
use parking_lot::{Mutex, MutexGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

// Poll interval while waiting for a lock with only a cancel flag.
const LOCK_POLL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancelled: Option<Arc<AtomicBool>>,
}

/// Fires the cancellation flag shared with the contexts it was created with.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl Context {
    /// A context that never expires.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context cancelled through the returned handle.
    pub fn cancellable() -> (Self, CancelHandle) {
        Self::default().with_cancel()
    }

    pub fn with_cancel(mut self) -> (Self, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        self.cancelled = Some(flag.clone());
        (self, CancelHandle(flag))
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Set a deadline. An earlier existing deadline wins.
    pub fn with_deadline(mut self, at: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < at => existing,
            _ => at,
        });
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_done(&self) -> bool {
        let cancelled = self
            .cancelled
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst));
        let expired = self.deadline.is_some_and(|at| Instant::now() >= at);
        cancelled || expired
    }

    pub fn check(&self, op: Operation) -> Result<()> {
        if self.is_done() {
            return Err(TodoError::Cancelled { op });
        }
        Ok(())
    }

    /// Acquire `mutex`, giving up once the context is done.
    pub(crate) fn lock<'a, T>(
        &self,
        mutex: &'a Mutex<T>,
        op: Operation,
    ) -> Result<MutexGuard<'a, T>> {
        self.check(op)?;
        match (self.deadline, &self.cancelled) {
            (None, None) => Ok(mutex.lock()),
            (Some(at), None) => mutex
                .try_lock_until(at)
                .ok_or(TodoError::Cancelled { op }),
            (deadline, Some(_)) => loop {
                let until = match deadline {
                    Some(at) => at.min(Instant::now() + LOCK_POLL),
                    None => Instant::now() + LOCK_POLL,
                };
                if let Some(guard) = mutex.try_lock_until(until) {
                    return Ok(guard);
                }
                self.check(op)?;
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::thread;

    #[test]
    fn test_background_never_expires() {
        let ctx = Context::background();
        assert!(!ctx.is_done());
        assert!(ctx.check(Operation::Get).is_ok());
    }

    #[test]
    fn test_cancel_handle_fires_all_clones() {
        let (ctx, handle) = Context::cancellable();
        let clone = ctx.clone();
        handle.cancel();
        assert!(ctx.is_done());
        assert_eq!(
            clone.check(Operation::Add).unwrap_err().kind(),
            ErrorKind::Cancelled
        );
    }

    #[test]
    fn test_elapsed_deadline_is_done() {
        let ctx = Context::background().with_deadline(Instant::now());
        assert!(ctx.is_done());
    }

    #[test]
    fn test_earlier_deadline_wins() {
        let soon = Instant::now() + Duration::from_secs(1);
        let later = soon + Duration::from_secs(60);
        let ctx = Context::background().with_deadline(soon).with_deadline(later);
        assert_eq!(ctx.deadline(), Some(soon));
    }

    #[test]
    fn test_lock_times_out_while_held() {
        let mutex = Mutex::new(());
        let _held = mutex.lock();
        let ctx = Context::background().with_timeout(Duration::from_millis(20));
        let err = ctx.lock(&mutex, Operation::Add).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_lock_observes_cancel_while_waiting() {
        let mutex = Arc::new(Mutex::new(()));
        let held = mutex.lock();
        let (ctx, handle) = Context::cancellable();

        let waiter = {
            let mutex = mutex.clone();
            thread::spawn(move || ctx.lock(&mutex, Operation::Remove).map(|_| ()))
        };
        thread::sleep(Duration::from_millis(30));
        handle.cancel();

        let result = waiter.join().unwrap();
        drop(held);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Cancelled);
    }
}
