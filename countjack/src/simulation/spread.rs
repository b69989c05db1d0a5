use std::collections::BTreeMap;

use crate::SimError;

/// A monotone-filled lookup from true count to wager size.
///
/// Built once from a sparse mapping: gaps between defined counts carry the
/// next lower wager forward, counts above the spread's maximum take the
/// maximum's wager and counts below the minimum take the minimum's, so the
/// lookup is total over every integer.
#[derive(Debug, Clone)]
pub struct BetSpread {
    min_count: i32,
    max_count: i32,
    low_bet: f64,
    high_bet: f64,
    bets: Vec<f64>,
}

impl BetSpread {
    pub fn build(spread: &BTreeMap<i32, f64>) -> Result<BetSpread, SimError> {
        let (&min_count, &low_bet) = spread.first_key_value().ok_or(SimError::InvalidSpread)?;
        let (&max_count, &high_bet) = spread.last_key_value().ok_or(SimError::InvalidSpread)?;

        let mut bets = Vec::with_capacity((max_count - min_count + 1) as usize);
        let mut prev_bet = low_bet;
        for tc in min_count..=max_count {
            if let Some(&bet) = spread.get(&tc) {
                prev_bet = bet;
            }
            bets.push(prev_bet);
        }

        Ok(BetSpread {
            min_count,
            max_count,
            low_bet,
            high_bet,
            bets,
        })
    }

    /// Retrieves the wager for the given true count.
    pub fn get_bet(&self, true_count: i32) -> f64 {
        if true_count > self.max_count {
            self.high_bet
        } else if true_count < self.min_count {
            self.low_bet
        } else {
            self.bets[(true_count - self.min_count) as usize]
        }
    }
}
