//! Latest-wins speech sequencing on top of a [`SpeechService`].

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::{select_voice, Language, SpeechConfig, SpeechService, Utterance, Voice, VoiceCatalog};

/// Issues utterances for the study session.
///
/// Every [`Narrator::announce`] cancels whatever is playing or still waiting
/// for voices before issuing its own request, so there is never a queue.
pub struct Narrator<S: SpeechService> {
    service: Arc<S>,
    catalog: VoiceCatalog,
    config: SpeechConfig,
    pending: Option<JoinHandle<()>>,
}

impl<S: SpeechService> Narrator<S> {
    pub fn new(service: Arc<S>, config: SpeechConfig) -> Self {
        Self::with_catalog(service, config, VoiceCatalog::new())
    }

    /// Use a catalog the host already publishes into.
    pub fn with_catalog(service: Arc<S>, config: SpeechConfig, catalog: VoiceCatalog) -> Self {
        Self {
            service,
            catalog,
            config,
            pending: None,
        }
    }

    pub fn catalog(&self) -> &VoiceCatalog {
        &self.catalog
    }

    /// Stop current playback and drop any utterance still waiting for voices.
    pub fn silence(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.service.cancel_all();
    }

    /// Cancel, then speak `text`. Blank text only cancels.
    pub fn announce(&mut self, text: &str) {
        self.silence();

        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let lang = Language::detect(text);

        self.catalog.refresh_from(self.service.as_ref());
        let voices = self.catalog.voices();
        if !voices.is_empty() {
            let voice = pick(lang, self.config.preferred(lang), &voices);
            self.speak(Utterance {
                text: text.to_string(),
                lang,
                voice,
            });
            return;
        }

        match Handle::try_current() {
            Ok(handle) => {
                tracing::debug!(lang = lang.tag(), "waiting for host voices");
                let service = Arc::clone(&self.service);
                let catalog = self.catalog.clone();
                let preferred = self.config.preferred(lang).to_vec();
                let wait = self.config.voice_wait();
                let text = text.to_string();
                self.pending = Some(handle.spawn(async move {
                    let voice = match catalog.ready(wait).await {
                        Some(voices) => pick(lang, &preferred, &voices),
                        None => {
                            tracing::warn!(
                                wait_ms = wait.as_millis() as u64,
                                "no voices reported, using host default"
                            );
                            None
                        }
                    };
                    let utterance = Utterance { text, lang, voice };
                    tracing::debug!(?utterance, "speaking");
                    service.speak(utterance);
                }));
            }
            Err(_) => {
                tracing::warn!("no async runtime to wait for voices, using host default");
                self.speak(Utterance {
                    text: text.to_string(),
                    lang,
                    voice: None,
                });
            }
        }
    }

    fn speak(&self, utterance: Utterance) {
        tracing::debug!(?utterance, "speaking");
        self.service.speak(utterance);
    }
}

impl<S: SpeechService> Drop for Narrator<S> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

fn pick(lang: Language, preferred: &[String], voices: &[Voice]) -> Option<String> {
    select_voice(lang, preferred, voices).map(|v| v.name.clone())
}
