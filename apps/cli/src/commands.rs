//! Card management subcommands.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;
use flipdeck_core::{CardStore, CardUpdate, DeckEditor, NewCard, PasswordGate, EXPORT_FILE_NAME};

/// Environment variable checked before prompting for the editor password.
pub const PASSWORD_ENV: &str = "FLIPDECK_PASSWORD";

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Study the deck (checked cards only, when any are checked)
    Study {
        /// Do not speak cards aloud
        #[arg(long)]
        mute: bool,
    },

    /// List every card
    List,

    /// Add a card
    Add {
        front: String,
        back: String,
        /// Image URI shown instead of the front text
        #[arg(long, value_name = "URI")]
        image: Option<String>,
    },

    /// Edit a card
    Edit {
        id: String,
        #[arg(long)]
        front: Option<String>,
        #[arg(long)]
        back: Option<String>,
        #[arg(long, value_name = "URI", conflicts_with = "clear_image")]
        image: Option<String>,
        /// Remove the card image
        #[arg(long)]
        clear_image: bool,
    },

    /// Mark a card for study
    Check {
        id: String,
        /// Unmark instead
        #[arg(long)]
        off: bool,
    },

    /// Delete cards
    Delete {
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        ids: Vec<String>,
        /// Delete every card
        #[arg(long)]
        all: bool,
    },

    /// Import front/back rows from a CSV file
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Export every card to a CSV file
    Export {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

/// Print the store's cards, one per line.
pub async fn list<S: CardStore>(store: &S) -> anyhow::Result<()> {
    let cards = store.list().await?;
    if cards.is_empty() {
        println!("No cards yet.");
        return Ok(());
    }
    for card in &cards {
        let mark = if card.checked { "x" } else { " " };
        let image = card
            .image
            .as_deref()
            .map(|uri| format!("  [image {}]", uri))
            .unwrap_or_default();
        println!("[{}] {}  {} / {}{}", mark, card.id, card.front, card.back, image);
    }
    println!("{} card(s)", cards.len());
    Ok(())
}

/// Pass the password gate and load the deck.
pub async fn open_editor<S: CardStore>(store: S, gate: &PasswordGate) -> anyhow::Result<DeckEditor<S>> {
    let key = if gate.is_open() {
        gate.unlock(None)?
    } else {
        let password = match std::env::var(PASSWORD_ENV) {
            Ok(password) => password,
            Err(_) => prompt_password()?,
        };
        gate.unlock(Some(password.as_str()))?
    };

    let mut editor = DeckEditor::new(store, key);
    editor.load().await?;
    Ok(editor)
}

fn prompt_password() -> anyhow::Result<String> {
    let mut stderr = std::io::stderr();
    write!(stderr, "Editor password: ")?;
    stderr.flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Run an editing subcommand against an unlocked editor.
pub async fn run_edit<S: CardStore>(editor: &mut DeckEditor<S>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Add { front, back, image } => {
            let card = match image {
                Some(uri) => NewCard::new(front, back).with_image(uri),
                None => NewCard::new(front, back),
            };
            let created = editor.add(card).await?;
            println!("Added {}", created.id);
        }
        Command::Edit {
            id,
            front,
            back,
            image,
            clear_image,
        } => {
            let update = edit_update(front, back, image, clear_image);
            if update.is_empty() {
                anyhow::bail!("nothing to change, pass --front, --back, --image or --clear-image");
            }
            let card = editor.edit(&id, update).await?;
            println!("Updated {}: {} / {}", card.id, card.front, card.back);
        }
        Command::Check { id, off } => {
            let card = editor.set_checked(&id, !off).await?;
            let state = if card.checked { "checked" } else { "unchecked" };
            println!("{} is {}", card.id, state);
        }
        Command::Delete { ids, all } => {
            if all {
                editor.select_all();
            } else {
                for id in &ids {
                    if editor.get(id).is_none() {
                        tracing::warn!(id = %id, "unknown card, skipping");
                        eprintln!("No card {}", id);
                    } else if !editor.is_selected(id) {
                        editor.toggle_selection(id);
                    }
                }
            }
            let deleted = editor.delete_selected().await?;
            println!("Deleted {} card(s)", deleted);
        }
        Command::Import { file } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .map_err(|e| anyhow::anyhow!("cannot read {}: {}", file.display(), e))?;
            let report = editor.import_csv(&content).await?;
            println!(
                "Imported {} card(s), skipped {} incomplete row(s), {} failed",
                report.imported, report.skipped, report.failed
            );
        }
        Command::Export { file } => {
            let path = file.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
            export(editor, &path).await?;
        }
        Command::Study { .. } | Command::List => {
            anyhow::bail!("not an editing command");
        }
    }
    Ok(())
}

async fn export<S: CardStore>(editor: &DeckEditor<S>, path: &Path) -> anyhow::Result<()> {
    let content = editor.export_csv()?;
    tokio::fs::write(path, content)
        .await
        .map_err(|e| anyhow::anyhow!("cannot write {}: {}", path.display(), e))?;
    println!("Exported {} card(s) to {}", editor.cards().len(), path.display());
    Ok(())
}

fn edit_update(
    front: Option<String>,
    back: Option<String>,
    image: Option<String>,
    clear_image: bool,
) -> CardUpdate {
    let image = if clear_image { Some(None) } else { image.map(Some) };
    CardUpdate {
        front,
        back,
        image,
        checked: None,
    }
}
