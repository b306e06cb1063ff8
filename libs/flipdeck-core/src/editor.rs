//! Deck editor: local view of the card store with selection and CSV exchange.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::csv_codec;
use crate::error::Result;
use crate::gate::EditorKey;
use crate::store::CardStore;
use crate::types::{study_deck, Card, CardUpdate, NewCard};

/// Outcome of a CSV import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    /// Rows without a front or a back.
    pub skipped: usize,
    /// Rows the store refused.
    pub failed: usize,
}

/// Editor over a [`CardStore`]. Local state only changes after the store
/// accepted a mutation.
pub struct DeckEditor<S: CardStore> {
    store: S,
    cards: Vec<Card>,
    selected: BTreeSet<String>,
    _key: EditorKey,
}

impl<S: CardStore> DeckEditor<S> {
    pub fn new(store: S, key: EditorKey) -> Self {
        Self {
            store,
            cards: Vec::new(),
            selected: BTreeSet::new(),
            _key: key,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Replace local state with the store's current contents.
    pub async fn load(&mut self) -> Result<&[Card]> {
        let cards = self.store.list().await.map_err(|e| {
            tracing::error!(error = %e, "failed to load cards");
            e
        })?;
        self.selected.retain(|id| cards.iter().any(|c| &c.id == id));
        self.cards = cards;
        Ok(&self.cards)
    }

    pub async fn add(&mut self, card: NewCard) -> Result<&Card> {
        card.validate()?;
        let created = self.store.create(card).await.map_err(|e| {
            tracing::error!(error = %e, "failed to add card");
            e
        })?;
        tracing::info!(id = %created.id, "card added");
        self.cards.push(created);
        Ok(&self.cards[self.cards.len() - 1])
    }

    pub async fn edit(&mut self, id: &str, update: CardUpdate) -> Result<&Card> {
        update.validate()?;
        let updated = self.store.update(id, update).await.map_err(|e| {
            tracing::error!(error = %e, id, "failed to update card");
            e
        })?;
        let index = match self.cards.iter().position(|c| c.id == updated.id) {
            Some(index) => {
                self.cards[index] = updated;
                index
            }
            None => {
                self.cards.push(updated);
                self.cards.len() - 1
            }
        };
        Ok(&self.cards[index])
    }

    pub async fn set_checked(&mut self, id: &str, checked: bool) -> Result<&Card> {
        self.edit(id, CardUpdate::checked(checked)).await
    }

    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.store.delete(id).await.map_err(|e| {
            tracing::error!(error = %e, id, "failed to delete card");
            e
        })?;
        self.forget(id);
        tracing::info!(id, "card deleted");
        Ok(())
    }

    /// Toggle selection of a known card. Returns whether it is now selected.
    pub fn toggle_selection(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        if self.selected.remove(id) {
            false
        } else {
            self.selected.insert(id.to_string());
            true
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.cards.iter().map(|c| c.id.clone()).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Delete every selected card.
    ///
    /// Stops at the first store failure; cards deleted before it are gone
    /// locally too, the rest stay selected.
    pub async fn delete_selected(&mut self) -> Result<usize> {
        let ids: Vec<String> = self.selected.iter().cloned().collect();
        let mut deleted = 0;
        for id in ids {
            self.delete(&id).await?;
            deleted += 1;
        }
        Ok(deleted)
    }

    /// Create a card for every complete CSV row. Store failures are logged
    /// and counted, the remaining rows are still imported.
    pub async fn import_csv(&mut self, content: &str) -> Result<ImportReport> {
        let parsed = csv_codec::parse_cards_str(content)?;
        let mut report = ImportReport {
            skipped: parsed.skipped,
            ..ImportReport::default()
        };
        for card in parsed.cards {
            match self.store.create(card).await {
                Ok(created) => {
                    self.cards.push(created);
                    report.imported += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to add card from csv");
                    report.failed += 1;
                }
            }
        }
        tracing::info!(
            imported = report.imported,
            skipped = report.skipped,
            failed = report.failed,
            "csv import finished"
        );
        Ok(report)
    }

    pub fn export_csv(&self) -> Result<String> {
        csv_codec::export_cards(&self.cards)
    }

    /// Snapshot for a study session.
    pub fn study_deck(&self) -> Vec<Card> {
        study_deck(&self.cards)
    }

    fn forget(&mut self, id: &str) {
        self.cards.retain(|c| c.id != id);
        self.selected.remove(id);
    }
}
