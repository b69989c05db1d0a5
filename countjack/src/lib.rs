pub mod simulation;
pub mod strategy;

use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};
use strum_macros::EnumIter;
use thiserror::Error;

pub use simulation::hand::{Hand, HandOutcome};
pub use simulation::shoe::{CountWeights, CountingShoe};
pub use simulation::spread::BetSpread;
pub use simulation::{RoundResolution, Simulator};
pub use strategy::StrategyTable;

/// The table rules a simulation runs under. Defaults reproduce the common
/// counting benchmark: 8 decks, 75% penetration, dealer hits soft 17,
/// naturals pay 3:2, Hi-Lo count.
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub number_of_decks: u8,
    /// Fraction of the shoe dealt before the next hand forces a reshuffle.
    pub penetration: f64,
    pub dealer_hits_soft17: bool,
    pub payout_blackjack: f64,
    pub counting: CountingSystem,
}

impl Default for Rule {
    fn default() -> Self {
        Rule {
            number_of_decks: 8,
            penetration: 0.75,
            dealer_hits_soft17: true,
            payout_blackjack: 1.5,
            counting: CountingSystem::HiLo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize_enum_str, Deserialize_enum_str)]
pub enum CountingSystem {
    HiLo,
    Ko,
}

impl CountingSystem {
    pub fn weights(self) -> CountWeights {
        match self {
            CountingSystem::HiLo => CountWeights::hi_lo(),
            CountingSystem::Ko => CountWeights::ko(),
        }
    }
}

/// A card rank as blackjack sees it. `Ace` counts as 1 (the hand model
/// promotes it to 11 where that does not bust); `Ten` stands for 10, J, Q
/// and K alike. Suits carry no information here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
}

impl Rank {
    pub fn value(self) -> u8 {
        match self {
            Rank::Ace => 1,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
        }
    }

    /// Chart column position, ace first.
    pub fn index(self) -> usize {
        (self.value() - 1) as usize
    }

    /// How many cards of this rank a single 52-card deck holds.
    pub fn copies_per_deck(self) -> usize {
        if self == Rank::Ten {
            16
        } else {
            4
        }
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Rank::Ace => 'A',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized card symbol `{0}`")]
pub struct ParseRankError(pub String);

impl std::str::FromStr for Rank {
    type Err = ParseRankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "a" => Ok(Rank::Ace),
            "2" => Ok(Rank::Two),
            "3" => Ok(Rank::Three),
            "4" => Ok(Rank::Four),
            "5" => Ok(Rank::Five),
            "6" => Ok(Rank::Six),
            "7" => Ok(Rank::Seven),
            "8" => Ok(Rank::Eight),
            "9" => Ok(Rank::Nine),
            "T" | "t" | "10" => Ok(Rank::Ten),
            _ => Err(ParseRankError(s.to_string())),
        }
    }
}

/// A playing decision taken from the strategy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Stand,
    Hit,
    Double,
    Split,
}

/// How a hand is keyed into the strategy table. Pairs take precedence over
/// soft totals, soft totals over hard ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandKey {
    Hard(u8),
    Soft(u8),
    Pair(Rank),
}

impl std::fmt::Display for HandKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandKey::Hard(total) => write!(f, "hard {}", total),
            HandKey::Soft(total) => write!(f, "soft {}", total),
            HandKey::Pair(rank) => write!(f, "pair of {}s", rank),
        }
    }
}

/// Everything that can go wrong inside the core. All of these are
/// configuration or call-ordering mistakes: none is recoverable mid-hand,
/// since a partially played hand cannot be retried without corrupting the
/// count state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// The supply cursor would pass the end of the shoe. Indicates a deck
    /// count / penetration combination that leaves too few cards per hand.
    #[error("shoe exhausted: deck count and penetration leave too few cards to finish a hand")]
    ShoeExhausted,
    /// No decision entry for a key the resolver needed. An incomplete table
    /// cannot safely resolve a hand, so this is never defaulted over.
    #[error("no strategy entry for {hand} against dealer {dealer}")]
    StrategyMiss { dealer: Rank, hand: HandKey },
    #[error("bet spread must contain at least one true-count entry")]
    InvalidSpread,
    #[error("{method} is only allowed in {phase} phase")]
    WrongPhase {
        method: &'static str,
        phase: &'static str,
    },
}
