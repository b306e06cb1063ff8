//! Study session engine.
//!
//! Presents a snapshot of cards in a shuffled, endlessly cycling order. Going
//! forward past the last card starts a new pass with a fresh shuffle; going
//! back stops at the first card of the current pass. Every state change
//! narrates the visible face.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::speech::{Narrator, SpeechService};
use crate::types::{Card, Face, Side};

/// Externally visible state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NoCards,
    Studying {
        position: usize,
        len: usize,
        flipped: bool,
        pass: u64,
    },
}

#[derive(Debug, Clone)]
struct Pass {
    deck: Vec<Card>,
    position: usize,
    flipped: bool,
}

/// Shuffled study order with flip state and speech side effects.
pub struct StudySession<S: SpeechService, R: Rng = StdRng> {
    snapshot: Vec<Card>,
    pass: Option<Pass>,
    pass_count: u64,
    narrator: Narrator<S>,
    rng: R,
}

impl<S: SpeechService> StudySession<S, StdRng> {
    pub fn new(narrator: Narrator<S>) -> Self {
        Self::with_rng(narrator, StdRng::from_entropy())
    }
}

impl<S: SpeechService, R: Rng> StudySession<S, R> {
    /// Session with a caller-supplied RNG, starting with no cards.
    pub fn with_rng(narrator: Narrator<S>, rng: R) -> Self {
        Self {
            snapshot: Vec::new(),
            pass: None,
            pass_count: 0,
            narrator,
            rng,
        }
    }

    /// Start over from `snapshot`: fresh shuffle, first card, front side.
    pub fn initialize(&mut self, snapshot: Vec<Card>) {
        self.snapshot = snapshot;
        if self.snapshot.is_empty() {
            self.clear();
            return;
        }
        self.start_pass();
        self.narrate();
    }

    /// Host refresh trigger. Returns whether the session was restarted.
    ///
    /// An unchanged snapshot keeps the current pass untouched.
    pub fn replace_snapshot(&mut self, snapshot: Vec<Card>) -> bool {
        if snapshot == self.snapshot && (self.pass.is_some() || snapshot.is_empty()) {
            return false;
        }
        self.initialize(snapshot);
        true
    }

    pub fn flip(&mut self) {
        let Some(pass) = self.pass.as_mut() else {
            return;
        };
        pass.flipped = !pass.flipped;
        tracing::debug!(flipped = pass.flipped, "card flipped");
        self.narrate();
    }

    pub fn advance(&mut self) {
        let Some(pass) = self.pass.as_mut() else {
            return;
        };
        if pass.position + 1 < pass.deck.len() {
            pass.position += 1;
            pass.flipped = false;
        } else {
            self.start_pass();
        }
        self.narrate();
    }

    pub fn retreat(&mut self) {
        let Some(pass) = self.pass.as_mut() else {
            return;
        };
        if pass.position == 0 {
            return;
        }
        pass.position -= 1;
        pass.flipped = false;
        self.narrate();
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.pass.as_ref().map(|p| &p.deck[p.position])
    }

    /// Content of the visible side, if there is a current card.
    pub fn current_face(&self) -> Option<Face<'_>> {
        let pass = self.pass.as_ref()?;
        Some(pass.deck[pass.position].face(Side::from_flipped(pass.flipped)))
    }

    pub fn status(&self) -> SessionStatus {
        match &self.pass {
            None => SessionStatus::NoCards,
            Some(pass) => SessionStatus::Studying {
                position: pass.position,
                len: pass.deck.len(),
                flipped: pass.flipped,
                pass: self.pass_count,
            },
        }
    }

    pub fn has_cards(&self) -> bool {
        self.pass.is_some()
    }

    pub fn position(&self) -> Option<usize> {
        self.pass.as_ref().map(|p| p.position)
    }

    pub fn is_flipped(&self) -> bool {
        self.pass.as_ref().is_some_and(|p| p.flipped)
    }

    /// Presentation order of the current pass.
    pub fn deck(&self) -> &[Card] {
        self.pass.as_ref().map(|p| p.deck.as_slice()).unwrap_or(&[])
    }

    fn start_pass(&mut self) {
        let mut deck = self.snapshot.clone();
        deck.shuffle(&mut self.rng);
        self.pass_count += 1;
        tracing::debug!(cards = deck.len(), pass = self.pass_count, "new pass shuffled");
        self.pass = Some(Pass {
            deck,
            position: 0,
            flipped: false,
        });
    }

    fn clear(&mut self) {
        if self.pass.take().is_some() {
            tracing::debug!("deck emptied, session cleared");
        }
        self.narrator.silence();
    }

    fn narrate(&mut self) {
        if let Some(pass) = &self.pass {
            let card = &pass.deck[pass.position];
            self.narrator.announce(card.text(Side::from_flipped(pass.flipped)));
        }
    }
}
