//! Cache of host voices with a one-shot readiness notification.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::{SpeechService, Voice};

/// Voices reported by the host, shared between the host and the narrator.
///
/// Clones observe the same cache. The host calls [`VoiceCatalog::publish`]
/// once its speech engine has loaded; waiters are woken at that point.
#[derive(Clone)]
pub struct VoiceCatalog {
    tx: Arc<watch::Sender<Arc<[Voice]>>>,
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceCatalog {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::<[Voice]>::from(Vec::new()));
        Self { tx: Arc::new(tx) }
    }

    /// Replace the cached voices and wake anyone waiting for them.
    pub fn publish(&self, voices: Vec<Voice>) {
        tracing::debug!(count = voices.len(), "voice catalog updated");
        self.tx.send_replace(Arc::from(voices));
    }

    /// Current snapshot; empty until voices are published.
    pub fn voices(&self) -> Arc<[Voice]> {
        self.tx.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        !self.tx.borrow().is_empty()
    }

    /// Fill an empty catalog from the service if it already knows its voices.
    pub fn refresh_from<S: SpeechService + ?Sized>(&self, service: &S) {
        if self.is_ready() {
            return;
        }
        let voices = service.available_voices();
        if !voices.is_empty() {
            self.publish(voices);
        }
    }

    /// Wait until at least one voice is known, or give up after `timeout`.
    pub async fn ready(&self, timeout: Duration) -> Option<Arc<[Voice]>> {
        let mut rx = self.tx.subscribe();
        let wait = async {
            rx.wait_for(|voices| !voices.is_empty())
                .await
                .map(|voices| voices.clone())
        };
        match tokio::time::timeout(timeout, wait).await {
            Ok(Ok(voices)) => Some(voices),
            Ok(Err(_)) | Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let catalog = VoiceCatalog::new();
        assert!(!catalog.is_ready());
        assert!(catalog.voices().is_empty());
    }

    #[test]
    fn clones_share_voices() {
        let catalog = VoiceCatalog::new();
        let host = catalog.clone();
        host.publish(vec![Voice::new("Kyoko", "ja-JP")]);
        assert!(catalog.is_ready());
        assert_eq!(catalog.voices()[0].name, "Kyoko");
    }

    #[tokio::test]
    async fn ready_resolves_immediately_when_loaded() {
        let catalog = VoiceCatalog::new();
        catalog.publish(vec![Voice::new("Alex", "en-US")]);
        let voices = catalog.ready(Duration::from_millis(10)).await.unwrap();
        assert_eq!(voices.len(), 1);
    }

    #[tokio::test]
    async fn ready_wakes_on_publish() {
        let catalog = VoiceCatalog::new();
        let host = catalog.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            host.publish(vec![Voice::new("Alex", "en-US")]);
        });
        let voices = catalog.ready(Duration::from_secs(5)).await;
        assert!(voices.is_some());
    }

    #[tokio::test]
    async fn ready_times_out() {
        let catalog = VoiceCatalog::new();
        assert!(catalog.ready(Duration::from_millis(20)).await.is_none());
    }
}
