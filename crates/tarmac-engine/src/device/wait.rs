//! Bounded waits for wgpu's callback-driven requests.
//!
//! Adapter and device requests are futures resolved by wgpu's own callbacks.
//! The control thread parks between polls instead of spinning, and gives up
//! once the deadline passes.

use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::task::{Context, Poll, Wake, Waker};
use std::thread::{self, Thread};
use std::time::{Duration, Instant};

struct ThreadWaker(Thread);

impl Wake for ThreadWaker {
    fn wake(self: Arc<Self>) {
        self.0.unpark();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.0.unpark();
    }
}

/// Drives `future` on the calling thread until it resolves or `timeout` elapses.
///
/// Returns `None` on timeout. The future is dropped in that case, which cancels
/// the request from the caller's point of view.
pub fn block_on_timeout<F: Future>(future: F, timeout: Duration) -> Option<F::Output> {
    let mut future = pin!(future);
    let waker = Waker::from(Arc::new(ThreadWaker(thread::current())));
    let mut cx = Context::from_waker(&waker);
    let deadline = Instant::now() + timeout;

    loop {
        if let Poll::Ready(out) = future.as_mut().poll(&mut cx) {
            return Some(out);
        }
        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        thread::park_timeout(deadline - now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_future_resolves() {
        let out = block_on_timeout(async { 7 }, Duration::from_millis(10));
        assert_eq!(out, Some(7));
    }

    #[test]
    fn pending_future_times_out() {
        let start = Instant::now();
        let out = block_on_timeout(std::future::pending::<()>(), Duration::from_millis(20));
        assert_eq!(out, None);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn future_woken_from_another_thread_resolves() {
        let (tx, rx) = std::sync::mpsc::channel::<u32>();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(5));
            let _ = tx.send(3);
        });

        let fut = std::future::poll_fn(|cx| match rx.try_recv() {
            Ok(v) => Poll::Ready(v),
            Err(_) => {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        });

        assert_eq!(block_on_timeout(fut, Duration::from_secs(5)), Some(3));
        let _ = handle.join();
    }
}
