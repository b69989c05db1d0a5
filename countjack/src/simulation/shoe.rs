use crate::{Rank, SimError};

use strum::IntoEnumIterator;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Signed count weight per rank, fixed at shoe construction. The shoe owns
/// its copy, so no caller can mutate the weights mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountWeights {
    weights: [i32; 10],
}

impl CountWeights {
    /// The standard balanced Hi-Lo count: 2-6 are +1, 7-9 neutral, tens and
    /// aces -1.
    pub fn hi_lo() -> CountWeights {
        CountWeights {
            weights: [-1, 1, 1, 1, 1, 1, 0, 0, 0, -1],
        }
    }

    /// Knock-Out: Hi-Lo with the 7 promoted to +1, leaving the count
    /// unbalanced.
    pub fn ko() -> CountWeights {
        CountWeights {
            weights: [-1, 1, 1, 1, 1, 1, 1, 0, 0, -1],
        }
    }

    /// Weights indexed ace-first, the same order as `Rank::index`.
    pub fn custom(weights: [i32; 10]) -> CountWeights {
        CountWeights { weights }
    }

    pub fn weight(&self, rank: Rank) -> i32 {
        self.weights[rank.index()]
    }
}

impl Default for CountWeights {
    fn default() -> Self {
        CountWeights::hi_lo()
    }
}

/// A depleting shoe that keeps a running count of the cards it has shown.
///
/// Drawing face up counts the card immediately. Drawing face down consumes
/// the card without counting it; the count moves only when `reveal` is
/// called. This split is what keeps mid-hand true-count reads honest: a
/// counting player cannot react to the dealer's hole card before it is
/// exposed.
#[derive(Debug, Clone)]
pub struct CountingShoe {
    cards: Vec<Rank>,
    cursor: usize,
    cut_card_index: usize,
    weights: CountWeights,
    running_count: i32,
    rng: StdRng,
}

impl CountingShoe {
    /// Creates a shuffled shoe seeded from entropy.
    pub fn new(number_of_decks: u8, penetration: f64, weights: CountWeights) -> CountingShoe {
        Self::with_rng(
            number_of_decks,
            penetration,
            weights,
            StdRng::from_entropy(),
        )
    }

    /// Creates a shuffled shoe whose entire card order is reproducible from
    /// the seed.
    pub fn with_seed(
        number_of_decks: u8,
        penetration: f64,
        weights: CountWeights,
        seed: u64,
    ) -> CountingShoe {
        Self::with_rng(
            number_of_decks,
            penetration,
            weights,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(
        number_of_decks: u8,
        penetration: f64,
        weights: CountWeights,
        rng: StdRng,
    ) -> CountingShoe {
        let mut cards = Vec::with_capacity(number_of_decks as usize * 52);
        for rank in Rank::iter() {
            for _ in 0..rank.copies_per_deck() * number_of_decks as usize {
                cards.push(rank);
            }
        }
        let cut_card_index = (cards.len() as f64 * penetration) as usize;
        let mut shoe = CountingShoe {
            cards,
            cursor: 0,
            cut_card_index,
            weights,
            running_count: 0,
            rng,
        };
        shoe.shuffle();
        shoe
    }

    /// Called once at the beginning of every hand, before any draw. If the
    /// cut card has been passed, reshuffles the whole supply and resets the
    /// cursor and running count. Returns true if it shuffled.
    pub fn start_hand(&mut self) -> bool {
        if self.cursor > self.cut_card_index {
            self.shuffle();
            return true;
        }
        false
    }

    /// Draws the next card face up and counts it.
    pub fn draw(&mut self) -> Result<Rank, SimError> {
        let card = self.draw_face_down()?;
        self.running_count += self.weights.weight(card);
        Ok(card)
    }

    /// Draws the next card face down. The count is untouched until the card
    /// is passed to `reveal`.
    pub fn draw_face_down(&mut self) -> Result<Rank, SimError> {
        if self.cursor >= self.cards.len() {
            return Err(SimError::ShoeExhausted);
        }
        let card = self.cards[self.cursor];
        self.cursor += 1;
        Ok(card)
    }

    /// Applies the count weight of a card that was drawn face down. Call
    /// exactly once per face-down draw, after the hand is fully resolved.
    pub fn reveal(&mut self, card: Rank) {
        self.running_count += self.weights.weight(card);
    }

    pub fn running_count(&self) -> i32 {
        self.running_count
    }

    /// Running count normalized by the decks still in the shoe, truncated
    /// toward zero. With nothing left to normalize by, the raw running
    /// count is returned; a run configured sanely never gets there.
    pub fn true_count(&self) -> i32 {
        let remaining = self.cards_remaining() as i32;
        if remaining == 0 {
            return self.running_count;
        }
        self.running_count * 52 / remaining
    }

    pub fn cards_remaining(&self) -> usize {
        self.cards.len() - self.cursor
    }

    /// Returns the dealt cards to the shoe and shuffles. This method makes
    /// sure the given first few cards will be at the frontmost positions of
    /// the shoe. Panics if the requirement cannot be met.
    pub fn shuffle_with_firsts(&mut self, firsts: &[Rank]) {
        let number_of_decks = self.cards.len() / 52;
        let mut pool: [usize; 10] = [0; 10];
        for rank in Rank::iter() {
            pool[rank.index()] = rank.copies_per_deck() * number_of_decks;
        }
        for rank in firsts {
            if pool[rank.index()] == 0 {
                panic!("The given first cards are invalid");
            }
            pool[rank.index()] -= 1;
        }

        self.cards.clear();
        self.cards.extend_from_slice(firsts);
        for rank in Rank::iter() {
            for _ in 0..pool[rank.index()] {
                self.cards.push(rank);
            }
        }
        self.cards[firsts.len()..].shuffle(&mut self.rng);
        self.cursor = 0;
        self.running_count = 0;
    }

    fn shuffle(&mut self) {
        self.cards.shuffle(&mut self.rng);
        self.cursor = 0;
        self.running_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_deck_has_balanced_hi_lo_count() {
        let mut shoe = CountingShoe::with_seed(1, 0.5, CountWeights::hi_lo(), 7);
        for _ in 0..52 {
            shoe.draw().unwrap();
        }
        assert_eq!(shoe.running_count(), 0);
        assert_eq!(shoe.cards_remaining(), 0);
    }

    #[test]
    fn drawing_past_the_supply_fails() {
        let mut shoe = CountingShoe::with_seed(1, 0.5, CountWeights::hi_lo(), 7);
        for _ in 0..52 {
            shoe.draw().unwrap();
        }
        assert_eq!(shoe.draw(), Err(SimError::ShoeExhausted));
        assert_eq!(shoe.draw_face_down(), Err(SimError::ShoeExhausted));
    }

    #[test]
    fn face_down_draw_defers_the_count_until_reveal() {
        let mut shoe = CountingShoe::with_seed(2, 0.5, CountWeights::hi_lo(), 11);
        let hole = shoe.draw_face_down().unwrap();
        assert_eq!(shoe.running_count(), 0);

        let mut expected = 0;
        for _ in 0..5 {
            let card = shoe.draw().unwrap();
            expected += CountWeights::hi_lo().weight(card);
        }
        assert_eq!(shoe.running_count(), expected);

        shoe.reveal(hole);
        assert_eq!(
            shoe.running_count(),
            expected + CountWeights::hi_lo().weight(hole)
        );
    }

    #[test]
    fn start_hand_shuffles_only_past_the_cut_card() {
        let mut shoe = CountingShoe::with_seed(1, 0.5, CountWeights::hi_lo(), 3);
        for _ in 0..26 {
            shoe.draw().unwrap();
        }
        // Cursor sits exactly on the cut index: not yet past it.
        assert!(!shoe.start_hand());
        shoe.draw().unwrap();
        assert!(shoe.start_hand());
        assert_eq!(shoe.cursor, 0);
        assert_eq!(shoe.running_count(), 0);
        assert_eq!(shoe.cards_remaining(), 52);
    }

    #[test]
    fn true_count_truncates_toward_zero() {
        let mut shoe = CountingShoe::with_seed(1, 0.5, CountWeights::hi_lo(), 5);
        shoe.shuffle_with_firsts(&[Rank::Two, Rank::Two, Rank::Two, Rank::Two]);
        for _ in 0..4 {
            shoe.draw().unwrap();
        }
        // +4 over 48 remaining cards: 4 * 52 / 48 = 4.33...
        assert_eq!(shoe.running_count(), 4);
        assert_eq!(shoe.true_count(), 4);

        shoe.shuffle_with_firsts(&[Rank::Ten, Rank::Ten, Rank::Ten]);
        for _ in 0..3 {
            shoe.draw().unwrap();
        }
        // -3 over 49 remaining cards: -3.18... truncates to -3, not -4.
        assert_eq!(shoe.true_count(), -3);
    }

    #[test]
    fn shuffle_with_firsts_places_the_prefix() {
        let mut shoe = CountingShoe::with_seed(2, 0.5, CountWeights::hi_lo(), 9);
        let firsts = [Rank::Ace, Rank::Four, Rank::Four, Rank::Ten];
        shoe.shuffle_with_firsts(&firsts);
        for rank in firsts {
            assert_eq!(shoe.draw_face_down().unwrap(), rank);
        }
        assert_eq!(shoe.cards_remaining(), 2 * 52 - 4);
    }

    #[test]
    #[should_panic]
    fn invalid_firsts_should_panic() {
        let mut shoe = CountingShoe::with_seed(1, 0.5, CountWeights::hi_lo(), 9);
        shoe.shuffle_with_firsts(&[Rank::Six; 5]);
    }

    #[test]
    fn ko_counts_the_seven() {
        let weights = CountWeights::ko();
        assert_eq!(weights.weight(Rank::Seven), 1);
        assert_eq!(weights.weight(Rank::Eight), 0);
        assert_eq!(weights.weight(Rank::Ace), -1);
    }
}
