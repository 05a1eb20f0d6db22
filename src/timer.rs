use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{after, bounded, select, Sender};

/// Handle to a one-shot deferred message. Dropping the handle cancels the
/// delivery if it has not happened yet.
#[derive(Debug)]
pub struct Timer {
    cancel_flag: Arc<AtomicBool>,
    wake_tx: Option<Sender<()>>,
}

impl Timer {
    /// Sends `message` on `tx` once `delay` has elapsed.
    pub fn schedule<T>(delay: Duration, tx: Sender<T>, message: T) -> Self
    where
        T: Send + 'static,
    {
        let cancel_flag = Arc::new(AtomicBool::new(false));
        let (wake_tx, wake_rx) = bounded::<()>(0);
        let flag = cancel_flag.clone();
        thread::spawn(move || {
            select! {
                recv(wake_rx) -> _ => {}
                recv(after(delay)) -> _ => {
                    if !flag.load(Ordering::SeqCst) {
                        let _ = tx.send(message);
                    }
                }
            }
        });
        Self {
            cancel_flag,
            wake_tx: Some(wake_tx),
        }
    }

    pub fn cancel(&mut self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
        // Disconnecting wakes the sleeping thread so it exits early.
        self.wake_tx.take();
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel();
    }
}
