//! Worker-thread and channel plumbing for the tracking pipeline.

use std::{
    io,
    panic::resume_unwind,
    thread::{self, JoinHandle},
};

pub use crossbeam::channel::SendError;

/// Creates a rendezvous channel for handing frames between pipeline stages.
///
/// The zero capacity means a send blocks until the receiving stage is ready
/// to take the value. Frame feeding therefore runs at the cadence of the
/// slower side instead of queueing up stale frames.
pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let (sender, recv) = crossbeam::channel::bounded(0);
    (Sender { inner: sender }, Receiver { inner: recv })
}

/// The sending half of a [`channel`].
pub struct Sender<T> {
    inner: crossbeam::channel::Sender<T>,
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Sender<T> {
    /// Sends a value across the channel, blocking until the receiving thread
    /// accepts it.
    ///
    /// An error means the receiving thread has exited and the caller should
    /// wind down.
    pub fn send(&self, value: T) -> Result<(), SendError<T>> {
        self.inner.send(value)
    }
}

/// The receiving half of a [`channel`].
///
/// Iterating over the receiver yields values until every connected
/// [`Sender`] has been dropped.
pub struct Receiver<T> {
    inner: crossbeam::channel::Receiver<T>,
}

impl<T> IntoIterator for Receiver<T> {
    type Item = T;
    type IntoIter = crossbeam::channel::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

/// A handle to a named worker thread.
///
/// When dropped, the handle joins the thread. If the thread has panicked,
/// the panic is forwarded to the thread dropping the handle.
pub struct Worker {
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Spawns a worker thread that runs `body` to completion.
    pub fn spawn<F>(name: &str, body: F) -> io::Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let name = name.to_owned();
        let handle = thread::Builder::new().name(name.clone()).spawn(move || {
            log::trace!("worker '{name}' starting");
            body();
            log::trace!("worker '{name}' exiting");
        })?;

        Ok(Self {
            handle: Some(handle),
        })
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Wait for the thread to exit and propagate its panic if it panicked.
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(()) => {}
                Err(payload) => {
                    if !thread::panicking() {
                        resume_unwind(payload);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;

    #[test]
    fn worker_propagates_panic_on_drop() {
        let worker = Worker::spawn("panicker", || {
            resume_unwind(Box::new("worker panic".to_string()));
        })
        .unwrap();
        catch_unwind(AssertUnwindSafe(|| drop(worker))).unwrap_err();
    }

    #[test]
    fn send_fails_once_receiver_is_gone() {
        let (sender, recv) = channel();
        drop(recv);
        assert!(sender.send(0).is_err());
    }

    #[test]
    fn receiver_iteration_ends_when_senders_drop() {
        let (sender, recv) = channel();
        let worker = Worker::spawn("counter", move || {
            for i in 0..3 {
                sender.send(i).unwrap();
            }
        })
        .unwrap();
        assert_eq!(recv.into_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        drop(worker);
    }
}
