pub mod hand;
pub mod shoe;
pub mod spread;

use std::collections::BTreeMap;

use countjack_macros::allowed_phase;

use crate::strategy::StrategyTable;
use crate::{Action, Rank, Rule, SimError};

use self::hand::{Hand, HandOutcome};
use self::shoe::CountingShoe;
use self::spread::BetSpread;

/// Where a simulator is inside one hand. Every step method below may only
/// run in its own phase; `play_hand` walks the phases in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundPhase {
    Begin,
    Bet,
    Deal,
    Play,
    Settle,
}

/// What `play` decided about the round, handed on to `settle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundResolution {
    /// Player and dealer both hold naturals: push.
    BothNaturals,
    /// Only the dealer holds a natural: the full wager is lost.
    DealerNatural,
    /// Only the player holds a natural: paid at the blackjack premium.
    PlayerNatural,
    /// The hand went through the resolution engine.
    Played {
        outcomes: Vec<HandOutcome>,
        dealer_total: u8,
    },
}

/// Plays hands of blackjack against a counting shoe and accumulates the
/// net cash movement and total amount wagered.
///
/// One simulator is one player seat with one shoe; workers running in
/// parallel each own their own instance.
pub struct Simulator {
    rule: Rule,
    shoe: CountingShoe,
    spread: BetSpread,
    strategy: StrategyTable,
    phase: RoundPhase,

    bankroll: f64,
    total_wagered: f64,

    // Round state, rebuilt by deal() every hand.
    wager: f64,
    player_hand: Hand,
    dealer_hand: Hand,
}

impl Simulator {
    /// Builds a simulator with an entropy-seeded shoe. The spread mapping is
    /// validated here, so an empty spread fails before any hand is played.
    pub fn new(
        rule: &Rule,
        spread: &BTreeMap<i32, f64>,
        strategy: StrategyTable,
        bankroll: f64,
    ) -> Result<Simulator, SimError> {
        let shoe = CountingShoe::new(
            rule.number_of_decks,
            rule.penetration,
            rule.counting.weights(),
        );
        Self::with_shoe(rule, spread, strategy, bankroll, shoe)
    }

    /// Like `new`, but the whole run is reproducible from the seed.
    pub fn with_seed(
        rule: &Rule,
        spread: &BTreeMap<i32, f64>,
        strategy: StrategyTable,
        bankroll: f64,
        seed: u64,
    ) -> Result<Simulator, SimError> {
        let shoe = CountingShoe::with_seed(
            rule.number_of_decks,
            rule.penetration,
            rule.counting.weights(),
            seed,
        );
        Self::with_shoe(rule, spread, strategy, bankroll, shoe)
    }

    fn with_shoe(
        rule: &Rule,
        spread: &BTreeMap<i32, f64>,
        strategy: StrategyTable,
        bankroll: f64,
        shoe: CountingShoe,
    ) -> Result<Simulator, SimError> {
        Ok(Simulator {
            rule: *rule,
            shoe,
            spread: BetSpread::build(spread)?,
            strategy,
            phase: RoundPhase::Begin,
            bankroll,
            total_wagered: 0.0,
            wager: 0.0,
            player_hand: Hand::new(),
            dealer_hand: Hand::new(),
        })
    }

    /// Plays one complete hand and returns the net result in cash units.
    pub fn play_hand(&mut self) -> Result<f64, SimError> {
        self.begin_hand()?;
        self.place_bet()?;
        self.deal()?;
        let resolution = self.play()?;
        self.settle(resolution)
    }

    /// Opens a hand: reshuffles if the previous hand passed the cut card.
    /// Returns true if the shoe was shuffled.
    #[allowed_phase(Begin)]
    pub fn begin_hand(&mut self) -> Result<bool, SimError> {
        let shuffled = self.shoe.start_hand();
        self.phase = RoundPhase::Bet;
        Ok(shuffled)
    }

    /// Sizes the wager from the current true count. This reads the count
    /// before any card of the round is dealt, exactly what a live counter
    /// gets to see.
    #[allowed_phase(Bet)]
    pub fn place_bet(&mut self) -> Result<f64, SimError> {
        self.wager = self.spread.get_bet(self.shoe.true_count());
        self.phase = RoundPhase::Deal;
        Ok(self.wager)
    }

    /// Deals player, dealer upcard, player, dealer hole card. The hole card
    /// is drawn face down and stays out of the count until settlement.
    #[allowed_phase(Deal)]
    pub fn deal(&mut self) -> Result<(), SimError> {
        self.player_hand = Hand::new();
        self.dealer_hand = Hand::new();
        self.player_hand.push(self.shoe.draw()?);
        self.dealer_hand.push(self.shoe.draw()?);
        self.player_hand.push(self.shoe.draw()?);
        self.dealer_hand.push(self.shoe.draw_face_down()?);
        self.phase = RoundPhase::Play;
        Ok(())
    }

    /// Resolves the round: naturals settle immediately, everything else
    /// goes through the recursive player resolution and then dealer play.
    #[allowed_phase(Play)]
    pub fn play(&mut self) -> Result<RoundResolution, SimError> {
        let player_natural = self.player_hand.is_blackjack();
        let dealer_natural = self.dealer_hand.is_blackjack();

        let resolution = if dealer_natural && player_natural {
            RoundResolution::BothNaturals
        } else if dealer_natural {
            RoundResolution::DealerNatural
        } else if player_natural {
            RoundResolution::PlayerNatural
        } else {
            let upcard = self.dealer_hand.cards()[0];
            let hand = std::mem::take(&mut self.player_hand);
            let outcomes = self.resolve_player(upcard, hand)?;
            let dealer_total = self.resolve_dealer()?;
            RoundResolution::Played {
                outcomes,
                dealer_total,
            }
        };

        self.phase = RoundPhase::Settle;
        Ok(resolution)
    }

    /// Reveals the dealer's hole card to the count, settles every sub-hand
    /// against the dealer total and returns the net cash delta.
    #[allowed_phase(Settle)]
    pub fn settle(&mut self, resolution: RoundResolution) -> Result<f64, SimError> {
        let hole = self.dealer_hand.cards()[1];
        self.shoe.reveal(hole);

        let wager = self.wager;
        let delta = match resolution {
            RoundResolution::BothNaturals => {
                self.total_wagered += wager;
                0.0
            }
            RoundResolution::DealerNatural => {
                self.total_wagered += wager;
                self.bankroll -= wager;
                -wager
            }
            RoundResolution::PlayerNatural => {
                let win = self.rule.payout_blackjack * wager;
                self.total_wagered += wager;
                self.bankroll += win;
                win
            }
            RoundResolution::Played {
                outcomes,
                dealer_total,
            } => {
                // A busted dealer loses to any standing hand; no real hand
                // totals 0, so 0 is a safe stand-in.
                let dealer_total = if dealer_total > 21 { 0 } else { dealer_total };
                let mut delta = 0.0;
                for outcome in outcomes {
                    let stake = wager * outcome.weight as f64;
                    self.total_wagered += stake;
                    if outcome.total > 21 || outcome.total < dealer_total {
                        self.bankroll -= stake;
                        delta -= stake;
                    } else if outcome.total > dealer_total {
                        self.bankroll += stake;
                        delta += stake;
                    }
                }
                delta
            }
        };

        self.phase = RoundPhase::Begin;
        Ok(delta)
    }

    pub fn bankroll(&self) -> f64 {
        self.bankroll
    }

    pub fn total_wagered(&self) -> f64 {
        self.total_wagered
    }

    pub fn shoe(&self) -> &CountingShoe {
        &self.shoe
    }

    /// Plays out one player hand, splitting into independent sub-hands as
    /// the strategy table demands, and returns one outcome record per
    /// resolved sub-hand.
    fn resolve_player(
        &mut self,
        upcard: Rank,
        mut hand: Hand,
    ) -> Result<Vec<HandOutcome>, SimError> {
        let total = hand.best_total();
        if total >= 21 {
            return Ok(vec![HandOutcome { total, weight: 1 }]);
        }

        match self.strategy.decide(upcard, &hand)? {
            Action::Split => {
                // Both children take their second card before either is
                // played on, matching the table procedure.
                let (left, right) = hand.split();
                let first = Hand::with_cards(vec![left, self.shoe.draw()?]);
                let second = Hand::with_cards(vec![right, self.shoe.draw()?]);
                let mut outcomes = self.resolve_player(upcard, first)?;
                outcomes.extend(self.resolve_player(upcard, second)?);
                Ok(outcomes)
            }
            Action::Stand => Ok(vec![HandOutcome { total, weight: 1 }]),
            Action::Double if hand.len() == 2 => {
                hand.push(self.shoe.draw()?);
                Ok(vec![HandOutcome {
                    total: hand.best_total(),
                    weight: 2,
                }])
            }
            // Double is not offered once a hand holds three cards; it
            // degrades to a plain hit.
            Action::Hit | Action::Double => {
                hand.push(self.shoe.draw()?);
                self.resolve_player(upcard, hand)
            }
        }
    }

    /// Dealer draws to 17, hitting a soft 17 unless the rule says otherwise.
    /// The returned total may exceed 21.
    fn resolve_dealer(&mut self) -> Result<u8, SimError> {
        loop {
            let total = self.dealer_hand.best_total();
            let must_stand = total > 17
                || total == 17 && (!self.dealer_hand.is_soft() || !self.rule.dealer_hits_soft17);
            if must_stand {
                return Ok(total);
            }
            let card = self.shoe.draw()?;
            self.dealer_hand.push(card);
        }
    }
}
