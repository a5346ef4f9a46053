// glbridge/src/executor.rs
//
//! Runs driver interaction on a disposable thread.
//!
//! Making a context current replaces whatever context the calling thread had bound. The
//! bootstrap needs to make throwaway contexts current, so it runs on its own thread, and the
//! caller blocks until that thread has finished.

use crate::Error;

use std::thread;

/// Spawns one named thread per task and joins it before returning.
pub(crate) struct IsolatedThread {
    name: &'static str,
}

impl IsolatedThread {
    #[inline]
    pub(crate) fn new(name: &'static str) -> IsolatedThread {
        IsolatedThread { name }
    }

    /// Runs `task` to completion on a fresh thread. There is no timeout: a task that hangs hangs
    /// the caller.
    pub(crate) fn run<T, F>(&self, task: F) -> Result<T, Error>
                            where F: FnOnce() -> T + Send, T: Send {
        thread::scope(|scope| {
            let join_handle = thread::Builder::new()
                .name(self.name.to_owned())
                .spawn_scoped(scope, task)
                .map_err(|err| {
                    error!("glbridge: couldn't spawn {}: {}", self.name, err);
                    Error::WorkerThreadFailed
                })?;
            join_handle.join().map_err(|_| {
                error!("glbridge: {} panicked", self.name);
                Error::WorkerThreadFailed
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_runs_on_a_different_named_thread() {
        let caller = thread::current().id();
        let (worker, name) = IsolatedThread::new("glbridge-test-worker").run(|| {
            (thread::current().id(), thread::current().name().map(str::to_owned))
        }).unwrap();
        assert_ne!(worker, caller);
        assert_eq!(name.as_deref(), Some("glbridge-test-worker"));
    }

    #[test]
    fn task_can_borrow_from_the_caller() {
        let values = vec![1, 2, 3];
        let sum = IsolatedThread::new("glbridge-test-worker").run(|| values.iter().sum::<i32>());
        assert_eq!(sum.unwrap(), 6);
    }

    #[test]
    fn panicking_task_is_reported_as_an_error() {
        let result = IsolatedThread::new("glbridge-test-worker").run(|| -> u32 {
            panic!("driver exploded")
        });
        assert!(matches!(result, Err(Error::WorkerThreadFailed)));
    }
}
