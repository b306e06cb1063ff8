//! Card store abstraction.

use std::future::Future;

use crate::error::Result;
use crate::types::{Card, CardUpdate, NewCard};

/// Remote collection of cards keyed by opaque ids.
///
/// Mutations return the stored record so callers can update local state
/// without reloading the whole collection.
pub trait CardStore: Send + Sync {
    fn list(&self) -> impl Future<Output = Result<Vec<Card>>> + Send;

    fn create(&self, card: NewCard) -> impl Future<Output = Result<Card>> + Send;

    fn update(&self, id: &str, update: CardUpdate) -> impl Future<Output = Result<Card>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// In-memory store with failure injection for editor tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use super::*;
    use crate::error::Error;

    #[derive(Default)]
    pub struct MemoryStore {
        cards: Mutex<Vec<Card>>,
        next_id: Mutex<u64>,
        failing: Mutex<HashSet<String>>,
        fail_fronts: Mutex<HashSet<String>>,
    }

    impl MemoryStore {
        pub fn with_cards(cards: Vec<Card>) -> Self {
            let store = Self::default();
            *store.next_id.lock().unwrap() = cards.len() as u64;
            *store.cards.lock().unwrap() = cards;
            store
        }

        /// Make every mutation of `id` fail.
        pub fn fail_on(&self, id: &str) {
            self.failing.lock().unwrap().insert(id.to_string());
        }

        /// Make creating a card with this front fail.
        pub fn fail_create(&self, front: &str) {
            self.fail_fronts.lock().unwrap().insert(front.to_string());
        }

        pub fn stored(&self) -> Vec<Card> {
            self.cards.lock().unwrap().clone()
        }

        fn check(&self, id: &str) -> Result<()> {
            if self.failing.lock().unwrap().contains(id) {
                return Err(Error::Store(format!("injected failure for {}", id)));
            }
            Ok(())
        }
    }

    impl CardStore for MemoryStore {
        async fn list(&self) -> Result<Vec<Card>> {
            Ok(self.stored())
        }

        async fn create(&self, card: NewCard) -> Result<Card> {
            if self.fail_fronts.lock().unwrap().contains(&card.front) {
                return Err(Error::Store("injected create failure".to_string()));
            }
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let created = Card {
                id: format!("card-{}", next_id),
                front: card.front,
                back: card.back,
                image: card.image,
                checked: false,
            };
            self.cards.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: &str, update: CardUpdate) -> Result<Card> {
            self.check(id)?;
            let mut cards = self.cards.lock().unwrap();
            let card = cards
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| Error::NotFound(id.to_string()))?;
            card.apply(&update);
            Ok(card.clone())
        }

        async fn delete(&self, id: &str) -> Result<()> {
            self.check(id)?;
            let mut cards = self.cards.lock().unwrap();
            let before = cards.len();
            cards.retain(|c| c.id != id);
            if cards.len() == before {
                return Err(Error::NotFound(id.to_string()));
            }
            Ok(())
        }
    }
}
