//! Wellbeing tips shown one at a time in shuffled order

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const TIPS: [&str; 10] = [
    "Try to go to bed at the same time every night, even at weekends.",
    "A short walk after lunch counts towards your daily activity.",
    "Keep screens out of the bedroom for the last half hour of the day.",
    "Caffeine can stay in your system for hours; keep coffee to the morning.",
    "Write down one thing that went well today.",
    "Drink a glass of water when you first wake up.",
    "Take the stairs when you can.",
    "Alcohol may help you fall asleep but it makes sleep lighter later in the night.",
    "Spend a few minutes outside in daylight each morning.",
    "Logging your mood at different times of day helps you spot patterns.",
];

/// The remaining tips, front first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TipDeck {
    remaining: Vec<String>,
}

impl TipDeck {
    /// A full deck in random order
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::default();
        deck.refill(rng);
        deck
    }

    pub fn from_remaining(remaining: Vec<String>) -> Self {
        Self { remaining }
    }

    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }

    /// Pop the next tip, reshuffling a fresh deck once this one runs out
    pub fn next_tip<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        if self.remaining.is_empty() {
            self.refill(rng);
        }
        self.remaining.remove(0)
    }

    fn refill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.remaining = TIPS.iter().map(|t| t.to_string()).collect();
        self.remaining.shuffle(rng);
    }
}
