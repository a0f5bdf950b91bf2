//! Shutdown coordination.

use std::future::Future;

use tokio::sync::broadcast;

/// Broadcast handle for graceful shutdown. Clones share one channel.
#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Future resolving once [`Shutdown::trigger`] is called.
    ///
    /// Subscribes immediately, so a trigger between this call and the first
    /// poll is not lost.
    pub fn signalled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    pub fn trigger(&self) {
        tracing::info!(listeners = self.tx.receiver_count(), "Shutdown triggered");
        let _ = self.tx.send(());
    }

    /// Number of futures from [`Shutdown::signalled`] still pending.
    pub fn listeners(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_resolves_every_listener() {
        let shutdown = Shutdown::new();
        let a = shutdown.signalled();
        let b = shutdown.clone().signalled();
        assert_eq!(shutdown.listeners(), 2);

        shutdown.trigger();
        a.await;
        b.await;
        assert_eq!(shutdown.listeners(), 0);
    }
}
