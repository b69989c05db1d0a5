use crate::{Action, Hand, HandKey, Rank, SimError};

const HARD_MIN: u8 = 4;
const HARD_MAX: u8 = 21;
const SOFT_MIN: u8 = 12;
const SOFT_MAX: u8 = 21;

/// A decision lookup across the three disjoint regimes: hard totals, soft
/// totals and equal-rank pairs. Immutable once handed to a simulator.
///
/// Charts are fixed-size arrays with the dealer upcard as the column (ace
/// first) and the player signature as the row. Empty cells are legal while
/// building; hitting one during play is a `StrategyMiss`, never a silent
/// default, because a guessed decision would corrupt the simulated edge.
#[derive(Debug, Clone)]
pub struct StrategyTable {
    hard: [[Option<Action>; 10]; 18],
    soft: [[Option<Action>; 10]; 10],
    pairs: [[Option<Action>; 10]; 10],
}

impl StrategyTable {
    /// An entirely empty table. Populate it with `set` before playing.
    pub fn new() -> StrategyTable {
        StrategyTable {
            hard: [[None; 10]; 18],
            soft: [[None; 10]; 10],
            pairs: [[None; 10]; 10],
        }
    }

    /// Stores one decision. Panics if a hard total is outside 4..=21 or a
    /// soft total outside 12..=21; no playable hand has one.
    pub fn set(&mut self, upcard: Rank, key: HandKey, action: Action) {
        let col = upcard.index();
        match key {
            HandKey::Hard(total) => {
                self.hard[Self::hard_row(total).expect("hard total out of range")][col] =
                    Some(action);
            }
            HandKey::Soft(total) => {
                self.soft[Self::soft_row(total).expect("soft total out of range")][col] =
                    Some(action);
            }
            HandKey::Pair(rank) => {
                self.pairs[rank.index()][col] = Some(action);
            }
        }
    }

    /// Looks up the decision for a hand against a dealer upcard.
    pub fn decide(&self, upcard: Rank, hand: &Hand) -> Result<Action, SimError> {
        let key = hand.key();
        let col = upcard.index();
        let entry = match key {
            HandKey::Hard(total) => Self::hard_row(total).and_then(|row| self.hard[row][col]),
            HandKey::Soft(total) => Self::soft_row(total).and_then(|row| self.soft[row][col]),
            HandKey::Pair(rank) => self.pairs[rank.index()][col],
        };
        entry.ok_or(SimError::StrategyMiss {
            dealer: upcard,
            hand: key,
        })
    }

    fn hard_row(total: u8) -> Option<usize> {
        if (HARD_MIN..=HARD_MAX).contains(&total) {
            Some((total - HARD_MIN) as usize)
        } else {
            None
        }
    }

    fn soft_row(total: u8) -> Option<usize> {
        if (SOFT_MIN..=SOFT_MAX).contains(&total) {
            Some((total - SOFT_MIN) as usize)
        } else {
            None
        }
    }

    /// The classic basic-strategy fill. Doubling entries rely on the
    /// resolver degrading an illegal double to a hit, so no fallback column
    /// is needed.
    pub fn basic() -> StrategyTable {
        const H: Option<Action> = Some(Action::Hit);
        const S: Option<Action> = Some(Action::Stand);
        const D: Option<Action> = Some(Action::Double);
        const P: Option<Action> = Some(Action::Split);

        let mut table = StrategyTable::new();

        // Columns: A 2 3 4 5 6 7 8 9 T
        table.hard = [
            [H; 10],                        // 4
            [H; 10],                        // 5
            [H; 10],                        // 6
            [H; 10],                        // 7
            [H; 10],                        // 8
            [H, H, D, D, D, D, H, H, H, H], // 9
            [H, D, D, D, D, D, D, D, D, H], // 10
            [D; 10],                        // 11
            [H, H, H, S, S, S, H, H, H, H], // 12
            [H, S, S, S, S, S, H, H, H, H], // 13
            [H, S, S, S, S, S, H, H, H, H], // 14
            [H, S, S, S, S, S, H, H, H, H], // 15
            [H, S, S, S, S, S, H, H, H, H], // 16
            [S; 10],                        // 17
            [S; 10],                        // 18
            [S; 10],                        // 19
            [S; 10],                        // 20
            [S; 10],                        // 21
        ];
        table.soft = [
            [H; 10],                        // 12
            [H, H, H, H, D, D, H, H, H, H], // 13
            [H, H, H, H, D, D, H, H, H, H], // 14
            [H, H, H, D, D, D, H, H, H, H], // 15
            [H, H, H, D, D, D, H, H, H, H], // 16
            [H, H, D, D, D, D, H, H, H, H], // 17
            [H, D, D, D, D, D, S, S, H, H], // 18
            [S, S, S, S, S, D, S, S, S, S], // 19
            [S; 10],                        // 20
            [S; 10],                        // 21
        ];
        table.pairs = [
            [P; 10],                        // A,A
            [H, P, P, P, P, P, P, H, H, H], // 2,2
            [H, P, P, P, P, P, P, H, H, H], // 3,3
            [H, H, H, H, P, P, H, H, H, H], // 4,4
            [H, D, D, D, D, D, D, D, D, H], // 5,5
            [H, P, P, P, P, P, H, H, H, H], // 6,6
            [H, P, P, P, P, P, P, H, H, H], // 7,7
            [P; 10],                        // 8,8
            [S, P, P, P, P, P, S, P, P, S], // 9,9
            [S; 10],                        // T,T
        ];

        table
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        StrategyTable::basic()
    }
}
