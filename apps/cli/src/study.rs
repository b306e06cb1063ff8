//! Interactive study loop on the terminal.

use flipdeck_core::{study_deck, CardStore, Face, Narrator, SessionStatus, SpeechService, StudySession};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "[f/Enter] flip  [n] next  [p] previous  [r] refresh  [q] quit";

/// A keystroke line typed during study.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Flip,
    Next,
    Previous,
    Refresh,
    Quit,
}

pub fn parse_key(line: &str) -> Option<Key> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "f" | "flip" => Some(Key::Flip),
        "n" | "next" => Some(Key::Next),
        "p" | "prev" | "previous" => Some(Key::Previous),
        "r" | "refresh" => Some(Key::Refresh),
        "q" | "quit" | "exit" => Some(Key::Quit),
        _ => None,
    }
}

/// Screen text for the visible face and the session position.
pub fn render(status: SessionStatus, face: Option<Face<'_>>) -> String {
    let (position, len, flipped, pass) = match (status, face) {
        (
            SessionStatus::Studying {
                position,
                len,
                flipped,
                pass,
            },
            Some(_),
        ) => (position, len, flipped, pass),
        _ => return "No cards to study. Add some with `flipdeck add`.".to_string(),
    };

    let side = if flipped { "back" } else { "front" };
    let body = match face {
        Some(Face::Image { uri, text }) => format!("[image] {}\n  ({})", uri, text),
        Some(Face::Text(text)) => text.to_string(),
        None => String::new(),
    };
    format!(
        "\n  {}\n\n  card {}/{} ({})  pass {}\n  {}",
        body,
        position + 1,
        len,
        side,
        pass,
        HELP
    )
}

/// Study the store's cards until the user quits or input ends.
pub async fn run_study<C, S>(store: &C, narrator: Narrator<S>) -> anyhow::Result<()>
where
    C: CardStore,
    S: SpeechService,
{
    let cards = store.list().await?;
    let mut session = StudySession::new(narrator);
    session.initialize(study_deck(&cards));
    tracing::info!(cards = session.deck().len(), "study session started");
    show(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(key) = parse_key(&line) else {
            println!("  {}", HELP);
            continue;
        };
        match key {
            Key::Flip => session.flip(),
            Key::Next => session.advance(),
            Key::Previous => session.retreat(),
            Key::Refresh => match store.list().await {
                Ok(cards) => {
                    if !session.replace_snapshot(study_deck(&cards)) {
                        println!("  (no changes)");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "refresh failed, keeping current cards");
                    eprintln!("Refresh failed: {}", e);
                }
            },
            Key::Quit => break,
        }
        show(&session);
    }

    tracing::info!("study session ended");
    Ok(())
}

fn show<S: SpeechService>(session: &StudySession<S>) {
    println!("{}", render(session.status(), session.current_face()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn keys() {
        assert_eq!(parse_key(""), Some(Key::Flip));
        assert_eq!(parse_key(" F \n"), Some(Key::Flip));
        assert_eq!(parse_key("n"), Some(Key::Next));
        assert_eq!(parse_key("prev"), Some(Key::Previous));
        assert_eq!(parse_key("r"), Some(Key::Refresh));
        assert_eq!(parse_key("Q"), Some(Key::Quit));
        assert_eq!(parse_key("x"), None);
    }

    #[test]
    fn render_without_cards() {
        let text = render(SessionStatus::NoCards, None);
        assert!(text.starts_with("No cards to study"));
    }

    #[test]
    fn render_text_face() {
        let status = SessionStatus::Studying {
            position: 1,
            len: 3,
            flipped: true,
            pass: 2,
        };
        let text = render(status, Some(Face::Text("こんにちは")));
        assert!(text.contains("こんにちは"));
        assert!(text.contains("card 2/3 (back)  pass 2"));
    }

    #[test]
    fn render_image_face_keeps_text() {
        let status = SessionStatus::Studying {
            position: 0,
            len: 1,
            flipped: false,
            pass: 1,
        };
        let face = Face::Image {
            uri: "https://example.com/cat.png",
            text: "cat",
        };
        let text = render(status, Some(face));
        assert!(text.contains("[image] https://example.com/cat.png"));
        assert!(text.contains("(cat)"));
        assert!(text.contains("card 1/1 (front)"));
    }
}
