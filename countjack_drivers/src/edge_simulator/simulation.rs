use std::collections::BTreeMap;
use std::thread;

use countjack::{Rule, SimError, Simulator, StrategyTable};
use countjack_drivers::ConfigEdgeSimulator;

/// Totals reduced over every worker, plus the per-hand net deltas in worker
/// order for anyone who wants to plot a bankroll trajectory.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub hands_played: u64,
    pub net: f64,
    pub total_wagered: f64,
    pub deltas: Vec<f64>,
}

impl RunReport {
    /// Net result per unit wagered. Negative means the house kept money.
    pub fn house_edge(&self) -> f64 {
        if self.total_wagered == 0.0 {
            0.0
        } else {
            self.net / self.total_wagered
        }
    }
}

struct WorkerReport {
    net: f64,
    wagered: f64,
    deltas: Vec<f64>,
}

/// Runs the configured number of workers, each with its own shoe and
/// simulator, and sums their results. Workers share nothing; a seeded run
/// gives worker i the seed `base + i` so the whole run replays exactly.
///
/// Any core error aborts the entire run: a failed hand cannot be retried
/// without corrupting that worker's count state.
pub fn run_simulation(
    rule: &Rule,
    config: &ConfigEdgeSimulator,
    strategy: &StrategyTable,
) -> Result<RunReport, SimError> {
    let number_of_threads = config.number_of_threads.max(1);

    let mut handles = Vec::with_capacity(number_of_threads);
    for worker in 0..number_of_threads {
        let rule = *rule;
        let spread = config.bet_spread.clone();
        let strategy = strategy.clone();
        let hands = config.hands_per_thread;
        let bankroll = config.starting_bankroll;
        let seed = config.seed.map(|seed| seed + worker as u64);
        handles.push(thread::spawn(move || {
            run_worker(&rule, &spread, strategy, bankroll, hands, seed)
        }));
    }

    let mut report = RunReport {
        hands_played: 0,
        net: 0.0,
        total_wagered: 0.0,
        deltas: Vec::new(),
    };
    for handle in handles {
        let worker = handle.join().unwrap()?;
        report.hands_played += worker.deltas.len() as u64;
        report.net += worker.net;
        report.total_wagered += worker.wagered;
        report.deltas.extend(worker.deltas);
    }
    Ok(report)
}

fn run_worker(
    rule: &Rule,
    spread: &BTreeMap<i32, f64>,
    strategy: StrategyTable,
    bankroll: f64,
    hands: u64,
    seed: Option<u64>,
) -> Result<WorkerReport, SimError> {
    let mut simulator = match seed {
        Some(seed) => Simulator::with_seed(rule, spread, strategy, bankroll, seed)?,
        None => Simulator::new(rule, spread, strategy, bankroll)?,
    };

    let mut deltas = Vec::with_capacity(hands as usize);
    for _ in 0..hands {
        deltas.push(simulator.play_hand()?);
    }

    Ok(WorkerReport {
        net: simulator.bankroll() - bankroll,
        wagered: simulator.total_wagered(),
        deltas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_typical_config() -> ConfigEdgeSimulator {
        ConfigEdgeSimulator {
            number_of_threads: 1,
            hands_per_thread: 200,
            starting_bankroll: 0.0,
            seed: Some(7),
            bet_spread: BTreeMap::from([(0, 1.0), (3, 5.0)]),
            strategy_file: None,
        }
    }

    #[test]
    fn report_totals_are_consistent() {
        let config = get_typical_config();
        let report = run_simulation(&Rule::default(), &config, &StrategyTable::basic()).unwrap();
        assert_eq!(report.hands_played, 200);
        assert_eq!(report.deltas.len(), 200);
        assert!(report.total_wagered >= 200.0);
        let sum: f64 = report.deltas.iter().sum();
        assert!((sum - report.net).abs() < 1e-9);
    }

    #[test]
    fn seeded_runs_replay_exactly() {
        let config = get_typical_config();
        let first = run_simulation(&Rule::default(), &config, &StrategyTable::basic()).unwrap();
        let second = run_simulation(&Rule::default(), &config, &StrategyTable::basic()).unwrap();
        assert_eq!(first.deltas, second.deltas);
        assert_eq!(first.net, second.net);
        assert_eq!(first.total_wagered, second.total_wagered);
    }

    #[test]
    fn workers_split_the_load() {
        let mut config = get_typical_config();
        config.number_of_threads = 4;
        config.hands_per_thread = 50;
        let report = run_simulation(&Rule::default(), &config, &StrategyTable::basic()).unwrap();
        assert_eq!(report.hands_played, 200);
        assert_eq!(report.deltas.len(), 200);
    }
}
