//! Host text-to-speech backends.
//!
//! [`CommandSpeaker`] drives the platform speech command (`say` on macOS,
//! `espeak-ng` elsewhere) as a child process, killing the previous child on
//! every new request. [`LogSpeaker`] only logs, for `--mute`.

use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::thread;

use flipdeck_core::{Language, SpeechService, Utterance, Voice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Engine {
    Say,
    Espeak,
}

impl Engine {
    fn for_host() -> Self {
        if cfg!(target_os = "macos") {
            Engine::Say
        } else {
            Engine::Espeak
        }
    }

    fn program(self) -> &'static str {
        match self {
            Engine::Say => "say",
            Engine::Espeak => "espeak-ng",
        }
    }
}

/// Speech through an external command.
///
/// The `current` lock is held from killing the previous child until the new
/// one is stored, so concurrent `speak` calls never leave a child running.
pub struct CommandSpeaker {
    engine: Engine,
    program: String,
    current: Mutex<Option<Child>>,
    voices: Mutex<Vec<Voice>>,
}

impl CommandSpeaker {
    pub fn new() -> Self {
        let engine = Engine::for_host();
        Self::with_program(engine, engine.program())
    }

    fn with_program(engine: Engine, program: impl Into<String>) -> Self {
        Self {
            engine,
            program: program.into(),
            current: Mutex::new(None),
            voices: Mutex::new(Vec::new()),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Ask the speech command for its voices. Blocks until it answers.
    pub fn load_voices(&self) -> std::io::Result<Vec<Voice>> {
        let mut command = Command::new(&self.program);
        match self.engine {
            Engine::Say => command.args(["-v", "?"]),
            Engine::Espeak => command.arg("--voices"),
        };
        let output = command.stderr(Stdio::null()).output()?;
        let listing = String::from_utf8_lossy(&output.stdout);
        let voices = match self.engine {
            Engine::Say => parse_say_voices(&listing),
            Engine::Espeak => parse_espeak_voices(&listing),
        };

        tracing::debug!(count = voices.len(), program = self.program(), "loaded voices");
        if let Ok(mut known) = self.voices.lock() {
            known.clone_from(&voices);
        }
        Ok(voices)
    }

    /// The text itself goes to stdin so it is never read as an option.
    fn command_for(&self, utterance: &Utterance) -> Command {
        let mut command = Command::new(&self.program);
        match (self.engine, &utterance.voice) {
            (_, Some(voice)) => {
                command.args(["-v", voice.as_str()]);
            }
            (Engine::Espeak, None) => {
                command.args(["-v", espeak_voice(utterance.lang)]);
            }
            (Engine::Say, None) => {}
        }
        match self.engine {
            Engine::Say => command.args(["-f", "-"]),
            Engine::Espeak => command.arg("--stdin"),
        };
        command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }

    fn start(&self, utterance: &Utterance) -> std::io::Result<Child> {
        let mut child = self.command_for(utterance).spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(utterance.text.as_bytes()) {
                tracing::debug!(error = %e, "speech command closed stdin early");
            }
        }
        Ok(child)
    }
}

/// Kill a child and reap it off the calling thread.
fn stop(mut child: Child) {
    let _ = child.kill();
    if let Err(e) = thread::Builder::new()
        .name("speech-reaper".to_string())
        .spawn(move || {
            let _ = child.wait();
        })
    {
        tracing::debug!(error = %e, "could not spawn reaper thread");
    }
}

impl Default for CommandSpeaker {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechService for CommandSpeaker {
    fn cancel_all(&self) {
        let Ok(mut current) = self.current.lock() else {
            return;
        };
        if let Some(child) = current.take() {
            stop(child);
        }
    }

    fn speak(&self, utterance: Utterance) {
        let Ok(mut current) = self.current.lock() else {
            return;
        };
        if let Some(child) = current.take() {
            stop(child);
        }
        match self.start(&utterance) {
            Ok(child) => *current = Some(child),
            Err(e) => {
                tracing::warn!(program = self.program(), error = %e, "failed to start speech");
            }
        }
    }

    fn available_voices(&self) -> Vec<Voice> {
        self.voices
            .lock()
            .map(|voices| voices.clone())
            .unwrap_or_default()
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

fn espeak_voice(lang: Language) -> &'static str {
    match lang {
        Language::English => "en-us",
        Language::Japanese => "ja",
    }
}

/// Parse `say -v ?`, one voice per line: `Name   lang_REGION    # sample`.
fn parse_say_voices(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .filter_map(|line| {
            let entry = line.split('#').next()?.trim();
            let (name, lang) = entry.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(Voice::new(name, lang.replace('_', "-")))
        })
        .collect()
}

/// Parse `espeak-ng --voices`. The language column doubles as the voice name.
fn parse_espeak_voices(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .skip(1)
        .filter_map(|line| {
            let lang = line.split_whitespace().nth(1)?;
            Some(Voice::new(lang, lang))
        })
        .collect()
}

/// Speech that is only logged.
#[derive(Debug, Default)]
pub struct LogSpeaker;

impl SpeechService for LogSpeaker {
    fn cancel_all(&self) {
        tracing::trace!("cancel speech");
    }

    fn speak(&self, utterance: Utterance) {
        tracing::info!(
            text = %utterance.text,
            lang = utterance.lang.tag(),
            voice = ?utterance.voice,
            "speak"
        );
    }

    fn available_voices(&self) -> Vec<Voice> {
        vec![
            Voice::new("muted", Language::English.tag()).as_default(),
            Voice::new("muted", Language::Japanese.tag()).as_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn say_listing() {
        let listing = "\
Alex                en_US    # Most people recognize me by my voice.
Kyoko               ja_JP    # こんにちは、私の名前はKyokoです。
Bad News            en_US    # The light you see at the end of the tunnel.
";
        let voices = parse_say_voices(listing);
        assert_eq!(
            voices,
            vec![
                Voice::new("Alex", "en-US"),
                Voice::new("Kyoko", "ja-JP"),
                Voice::new("Bad News", "en-US"),
            ]
        );
    }

    #[test]
    fn say_listing_skips_garbage() {
        assert!(parse_say_voices("\n   # only a comment\nlonely\n").is_empty());
    }

    #[test]
    fn espeak_listing() {
        let listing = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  en-us           --/M      English_(America)  gmw/en-US            (en 3)
 5  ja              --/M      Japanese           jpx/ja
";
        let voices = parse_espeak_voices(listing);
        assert_eq!(
            voices,
            vec![Voice::new("en-us", "en-us"), Voice::new("ja", "ja")]
        );
    }

    fn args(command: &Command) -> Vec<String> {
        command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn espeak_fallback_voice_follows_language() {
        let speaker = CommandSpeaker::with_program(Engine::Espeak, "espeak-ng");
        let command = speaker.command_for(&Utterance {
            text: "こんにちは".to_string(),
            lang: Language::Japanese,
            voice: None,
        });
        assert_eq!(args(&command), vec!["-v", "ja", "--stdin"]);
    }

    #[test]
    fn leading_dash_text_is_never_an_argument() {
        for engine in [Engine::Espeak, Engine::Say] {
            let speaker = CommandSpeaker::with_program(engine, engine.program());
            for text in ["-ing", "--help"] {
                let command = speaker.command_for(&Utterance {
                    text: text.to_string(),
                    lang: Language::English,
                    voice: None,
                });
                assert!(!args(&command).iter().any(|a| a == text), "{engine:?} {text}");
            }
        }
    }

    #[test]
    fn preferred_voice_is_passed_through() {
        let speaker = CommandSpeaker::with_program(Engine::Say, "say");
        let command = speaker.command_for(&Utterance {
            text: "Hello".to_string(),
            lang: Language::English,
            voice: Some("Samantha".to_string()),
        });
        assert_eq!(args(&command), vec!["-v", "Samantha", "-f", "-"]);
    }

    /// Fake speech command that records its pid and keeps playing.
    #[cfg(unix)]
    fn fake_engine(dir: &std::path::Path) -> (String, std::path::PathBuf) {
        use std::os::unix::fs::PermissionsExt;

        std::fs::create_dir_all(dir).unwrap();
        let pids = dir.join("pids");
        let script = dir.join("fake-espeak");
        std::fs::write(
            &script,
            format!("#!/bin/sh\necho $$ >> {}\nexec sleep 30\n", pids.display()),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        (script.display().to_string(), pids)
    }

    #[cfg(unix)]
    fn still_running(pid: &str) -> bool {
        Command::new("kill")
            .args(["-0", pid])
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    #[cfg(unix)]
    #[test]
    fn concurrent_speak_leaves_nothing_playing_after_cancel() {
        use std::sync::{Arc, Barrier};
        use std::time::Duration;

        let dir = std::env::temp_dir().join(format!("flipdeck-speaker-{}", std::process::id()));
        let (program, pids) = fake_engine(&dir);
        let speaker = Arc::new(CommandSpeaker::with_program(Engine::Espeak, program));

        for round in 0..10 {
            let barrier = Arc::new(Barrier::new(2));
            let handles: Vec<_> = (0..2)
                .map(|i| {
                    let speaker = Arc::clone(&speaker);
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        barrier.wait();
                        speaker.speak(Utterance {
                            text: format!("round {round} voice {i}"),
                            lang: Language::English,
                            voice: None,
                        });
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            speaker.cancel_all();
        }

        // Let the scripts record their pids and the reaper threads finish.
        thread::sleep(Duration::from_millis(500));
        let recorded = std::fs::read_to_string(&pids).unwrap_or_default();
        let leaked: Vec<&str> = recorded
            .lines()
            .map(str::trim)
            .filter(|pid| still_running(pid))
            .collect();
        for pid in &leaked {
            let _ = Command::new("kill").arg(pid).status();
        }
        let _ = std::fs::remove_dir_all(&dir);

        assert!(leaked.is_empty(), "still playing after cancel_all: {leaked:?}");
    }

    #[test]
    fn muted_voices_cover_both_languages() {
        let voices = LogSpeaker.available_voices();
        assert!(voices.iter().any(|v| Language::English.matches(&v.lang)));
        assert!(voices.iter().any(|v| Language::Japanese.matches(&v.lang)));
    }
}
