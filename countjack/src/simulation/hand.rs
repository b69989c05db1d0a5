use crate::{HandKey, Rank};

/// An ordered sequence of card ranks. Order matters only so a pair can be
/// pulled apart again when it splits; valuation ignores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Rank>,
}

impl Hand {
    pub fn new() -> Hand {
        Hand {
            cards: Vec::with_capacity(3),
        }
    }

    pub fn with_cards(cards: Vec<Rank>) -> Hand {
        Hand { cards }
    }

    pub fn push(&mut self, card: Rank) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Rank] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Plain sum with every ace at 1.
    pub fn hard_total(&self) -> u8 {
        self.cards.iter().map(|c| c.value()).sum()
    }

    /// A hand is soft while an ace can still count as 11 without busting.
    pub fn is_soft(&self) -> bool {
        self.cards.contains(&Rank::Ace) && self.hard_total() <= 11
    }

    /// The best total: the hard total, promoted by 10 when the hand is soft.
    pub fn best_total(&self) -> u8 {
        let total = self.hard_total();
        if self.is_soft() {
            total + 10
        } else {
            total
        }
    }

    pub fn is_pair(&self) -> bool {
        self.cards.len() == 2 && self.cards[0] == self.cards[1]
    }

    /// An initial two-card 21. Only the caller knows whether the hand is
    /// actually initial; a split hand reaching 21 never gets here.
    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2 && self.best_total() == 21
    }

    pub fn key(&self) -> HandKey {
        if self.is_pair() {
            HandKey::Pair(self.cards[0])
        } else if self.is_soft() {
            HandKey::Soft(self.best_total())
        } else {
            HandKey::Hard(self.best_total())
        }
    }

    /// Pulls a two-card pair apart. Panics if the hand is not a pair.
    pub fn split(self) -> (Rank, Rank) {
        if !self.is_pair() {
            panic!("Only a two-card pair can be split");
        }
        (self.cards[0], self.cards[1])
    }
}

impl Default for Hand {
    fn default() -> Self {
        Hand::new()
    }
}

/// One resolved player sub-hand: its final total and the multiple of the
/// base wager riding on it (1 normally, 2 when doubled).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandOutcome {
    pub total: u8,
    pub weight: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(ranks: &[Rank]) -> Hand {
        Hand::with_cards(ranks.to_vec())
    }

    #[test]
    fn ace_ten_is_blackjack() {
        let h = hand(&[Rank::Ace, Rank::Ten]);
        assert_eq!(h.best_total(), 21);
        assert!(h.is_blackjack());
        assert!(h.is_soft());
    }

    #[test]
    fn three_card_twenty_one_is_not_blackjack() {
        let h = hand(&[Rank::Ace, Rank::Ace, Rank::Nine]);
        assert_eq!(h.hard_total(), 11);
        assert_eq!(h.best_total(), 21);
        assert!(!h.is_blackjack());
    }

    #[test]
    fn busted_hand_keeps_its_hard_total() {
        let h = hand(&[Rank::Ten, Rank::Ten, Rank::Five]);
        assert_eq!(h.best_total(), 25);
        assert!(!h.is_soft());
    }

    #[test]
    fn soft_hand_hardens_after_a_big_hit() {
        let mut h = hand(&[Rank::Ace, Rank::Six]);
        assert!(h.is_soft());
        assert_eq!(h.best_total(), 17);
        h.push(Rank::Ten);
        assert!(!h.is_soft());
        assert_eq!(h.best_total(), 17);
    }

    #[test]
    fn pair_key_wins_over_soft_key() {
        assert_eq!(
            hand(&[Rank::Ace, Rank::Ace]).key(),
            HandKey::Pair(Rank::Ace)
        );
        assert_eq!(hand(&[Rank::Ace, Rank::Seven]).key(), HandKey::Soft(18));
        assert_eq!(hand(&[Rank::Nine, Rank::Seven]).key(), HandKey::Hard(16));
    }

    #[test]
    fn split_returns_both_halves() {
        let (a, b) = hand(&[Rank::Eight, Rank::Eight]).split();
        assert_eq!(a, Rank::Eight);
        assert_eq!(b, Rank::Eight);
    }
}
