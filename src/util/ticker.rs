use std::ops::ControlFlow;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// A repeating callback on a background thread.
///
/// The callback runs once per `interval` until it returns
/// [`ControlFlow::Break`] or the ticker is cancelled. Dropping the ticker
/// cancels it and joins the thread, so a ticker never outlives its owner.
pub struct Ticker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn start<F>(interval: Duration, mut callback: F) -> Ticker
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let (stop, stop_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if callback().is_break() {
                            break;
                        }
                    }
                    // Explicit stop or the ticker was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });
        Ticker {
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    /// Stop ticking and wait for the background thread to exit.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    /// Whether the callback has stopped on its own.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    #[test]
    fn stops_when_callback_breaks() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let ticker = Ticker::start(Duration::from_millis(5), move || {
            if c.fetch_add(1, Ordering::SeqCst) + 1 >= 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        let deadline = Instant::now() + Duration::from_secs(5);
        while !ticker.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(ticker.is_finished());
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn cancel_stops_further_ticks() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let ticker = Ticker::start(Duration::from_millis(5), move || {
            c.fetch_add(1, Ordering::SeqCst);
            ControlFlow::Continue(())
        });
        thread::sleep(Duration::from_millis(30));
        ticker.cancel();
        let after_cancel = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }

    #[test]
    fn drop_joins_thread() {
        let count = Arc::new(AtomicUsize::new(0));
        {
            let c = Arc::clone(&count);
            let _ticker = Ticker::start(Duration::from_millis(5), move || {
                c.fetch_add(1, Ordering::SeqCst);
                ControlFlow::Continue(())
            });
            thread::sleep(Duration::from_millis(20));
        }
        // The callback's clone of the Arc is gone once the thread has joined.
        assert_eq!(Arc::strong_count(&count), 1);
    }
}
