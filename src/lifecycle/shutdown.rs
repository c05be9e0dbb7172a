//! Shutdown coordination for the proxy.

use tokio::sync::broadcast;

/// Fires a one-shot stop signal to every subscriber.
///
/// `main` triggers it from the signal task; integration tests trigger it when
/// their proxy handle is dropped.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

/// Receiving end handed to the server.
pub struct ShutdownSignal {
    rx: broadcast::Receiver<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn trigger(&self) {
        if self.tx.send(()).is_ok() {
            tracing::debug!("Shutdown triggered");
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolve once shutdown is triggered or the coordinator is gone.
    pub async fn recv(mut self) {
        let _ = self.rx.recv().await;
    }
}
