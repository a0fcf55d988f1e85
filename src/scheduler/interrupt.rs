//! Interrupt delivery.
//!
//! A watcher task turns Ctrl+C into messages on a bounded channel. The
//! scheduler races every probe and sleep against [`InterruptSignal::wait`], so
//! a blocked network wait is abandoned as soon as the operator interrupts.

use tokio::sync::mpsc;

/// Sending half: anything that wants to pause the scheduler.
#[derive(Debug, Clone)]
pub struct InterruptHandle {
    tx: mpsc::Sender<()>,
}

impl InterruptHandle {
    /// Request a pause. Repeated requests before the scheduler reacts coalesce.
    pub fn interrupt(&self) {
        // Full means one is already pending; closed means nobody listens
        let _ = self.tx.try_send(());
    }
}

/// Receiving half, owned by the session.
#[derive(Debug)]
pub struct InterruptSignal {
    rx: mpsc::Receiver<()>,
}

impl InterruptSignal {
    /// Create a connected handle/signal pair.
    pub fn channel() -> (InterruptHandle, InterruptSignal) {
        let (tx, rx) = mpsc::channel(1);
        (InterruptHandle { tx }, InterruptSignal { rx })
    }

    /// Spawn a task forwarding every Ctrl+C to a new signal.
    ///
    /// Must be called from within a tokio runtime.
    pub fn ctrl_c() -> Self {
        let (handle, signal) = Self::channel();
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "unable to listen for Ctrl+C");
                    break;
                }
                tracing::debug!("interrupt received");
                handle.interrupt();
            }
        });
        signal
    }

    /// Wait for the next interrupt.
    ///
    /// Never completes once every handle is gone.
    pub async fn wait(&mut self) {
        if self.rx.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }

    /// Drop interrupts that arrived before a restart.
    pub fn clear(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_interrupt_wakes_waiter() {
        let (handle, mut signal) = InterruptSignal::channel();
        handle.interrupt();
        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .expect("interrupt should be delivered");
    }

    #[tokio::test]
    async fn test_interrupts_coalesce_and_clear() {
        let (handle, mut signal) = InterruptSignal::channel();
        handle.interrupt();
        handle.interrupt();
        handle.interrupt();
        signal.clear();

        let waited = tokio::time::timeout(Duration::from_millis(50), signal.wait()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_closed_channel_never_fires() {
        let (handle, mut signal) = InterruptSignal::channel();
        drop(handle);
        let waited = tokio::time::timeout(Duration::from_millis(50), signal.wait()).await;
        assert!(waited.is_err());
    }
}
