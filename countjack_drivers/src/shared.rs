use countjack::{Action, HandKey, Rank, Rule, StrategyTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rule: ConfigRule,
    pub edge_simulator: ConfigEdgeSimulator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRule {
    pub number_of_decks: u8,
    pub penetration: f64,
    pub dealer_hits_soft17: bool,
    pub payout_blackjack: f64,
    pub counting_system: String,
}

impl TryInto<Rule> for ConfigRule {
    type Error = serde::de::value::Error;

    fn try_into(self) -> Result<Rule, Self::Error> {
        let rule = Rule {
            number_of_decks: self.number_of_decks,
            penetration: self.penetration,
            dealer_hits_soft17: self.dealer_hits_soft17,
            payout_blackjack: self.payout_blackjack,
            counting: self.counting_system.parse()?,
        };

        Ok(rule)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEdgeSimulator {
    pub number_of_threads: usize,
    pub hands_per_thread: u64,
    pub starting_bankroll: f64,
    /// Base seed; worker i plays from seed + i. Omit for entropy seeding.
    pub seed: Option<u64>,
    pub bet_spread: BTreeMap<i32, f64>,
    pub strategy_file: Option<String>,
}

/// Reads the content of a given config file and parses it to a Config.
///
/// Panics if any error occurs.
pub fn parse_config_from_file(filename: &str) -> Config {
    let file_content = fs::read_to_string(filename).unwrap();
    serde_yaml::from_str(&file_content).unwrap()
}

#[derive(Debug, Error)]
pub enum StrategyFileError {
    #[error("cannot read strategy file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("section {0} is missing its dealer upcard header")]
    MissingHeader(&'static str),
    #[error("unrecognized card symbol `{0}`")]
    BadCard(String),
    #[error("row label `{0}` is not a playable hand")]
    BadLabel(String),
    #[error("invalid option `{0}` found in strategy file")]
    InvalidOption(String),
    #[error("surrender is not supported; replace `R` entries before loading")]
    Surrender,
    #[error("row `{0}` has more entries than the dealer header")]
    RowTooWide(String),
}

#[derive(Clone, Copy)]
enum Regime {
    Hard,
    Soft,
    Pairs,
}

pub fn load_strategy_table(path: &str) -> Result<StrategyTable, StrategyFileError> {
    let text = fs::read_to_string(path).map_err(|source| StrategyFileError::Io {
        path: path.to_string(),
        source,
    })?;
    parse_strategy_table(&text)
}

/// Parses the comma-separated strategy chart format: the `---HARD`,
/// `---SOFT` and `---PAIRS` markers each introduce a dealer upcard header
/// row followed by one row per player signature (totals for hard and soft,
/// doubled symbols such as `88`/`AA`/`TT` for pairs). Sections may appear
/// in any order; a missing section simply stays empty and will surface as a
/// strategy miss if play ever needs it.
pub fn parse_strategy_table(text: &str) -> Result<StrategyTable, StrategyFileError> {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut table = StrategyTable::new();
    read_section(&lines, "---HARD", Regime::Hard, &mut table)?;
    read_section(&lines, "---SOFT", Regime::Soft, &mut table)?;
    read_section(&lines, "---PAIRS", Regime::Pairs, &mut table)?;
    Ok(table)
}

fn read_section(
    lines: &[&str],
    marker: &'static str,
    regime: Regime,
    table: &mut StrategyTable,
) -> Result<(), StrategyFileError> {
    let start = match lines.iter().position(|line| *line == marker) {
        Some(start) => start,
        None => return Ok(()),
    };
    let header = lines
        .get(start + 1)
        .filter(|line| !line.starts_with("---"))
        .ok_or(StrategyFileError::MissingHeader(marker))?;
    let upcards = header
        .split(',')
        .skip(1)
        .map(|cell| {
            let cell = cell.trim();
            cell.parse::<Rank>()
                .map_err(|_| StrategyFileError::BadCard(cell.to_string()))
        })
        .collect::<Result<Vec<Rank>, StrategyFileError>>()?;

    for line in &lines[start + 2..] {
        if line.starts_with("---") {
            break;
        }
        let mut cells = line.split(',').map(str::trim);
        let label = cells.next().unwrap_or_default();
        let key = parse_label(regime, label)?;
        for (i, cell) in cells.enumerate() {
            let upcard = *upcards
                .get(i)
                .ok_or_else(|| StrategyFileError::RowTooWide(label.to_string()))?;
            table.set(upcard, key, parse_action(cell)?);
        }
    }
    Ok(())
}

fn parse_label(regime: Regime, label: &str) -> Result<HandKey, StrategyFileError> {
    let bad = || StrategyFileError::BadLabel(label.to_string());
    match regime {
        Regime::Hard => {
            let total: u8 = label.parse().map_err(|_| bad())?;
            if !(4..=21).contains(&total) {
                return Err(bad());
            }
            Ok(HandKey::Hard(total))
        }
        Regime::Soft => {
            let total: u8 = label.parse().map_err(|_| bad())?;
            if !(12..=21).contains(&total) {
                return Err(bad());
            }
            Ok(HandKey::Soft(total))
        }
        Regime::Pairs => {
            let (first, second) = label.split_at(label.len() / 2);
            if first != second {
                return Err(bad());
            }
            let rank = first.parse::<Rank>().map_err(|_| bad())?;
            Ok(HandKey::Pair(rank))
        }
    }
}

fn parse_action(cell: &str) -> Result<Action, StrategyFileError> {
    match cell {
        "S" => Ok(Action::Stand),
        "H" => Ok(Action::Hit),
        "D" => Ok(Action::Double),
        "P" => Ok(Action::Split),
        "R" => Err(StrategyFileError::Surrender),
        _ => Err(StrategyFileError::InvalidOption(cell.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countjack::{CountingSystem, Hand};

    fn get_typical_config_rule() -> ConfigRule {
        ConfigRule {
            number_of_decks: 8,
            penetration: 0.75,
            dealer_hits_soft17: true,
            payout_blackjack: 1.5,
            counting_system: String::from("HiLo"),
        }
    }

    #[test]
    fn can_convert_rule() {
        let config_rule = get_typical_config_rule();
        let converted_rule: Rule = config_rule.try_into().unwrap();
        assert_eq!(converted_rule.number_of_decks, 8);
        assert_eq!(converted_rule.penetration, 0.75);
        assert_eq!(converted_rule.counting, CountingSystem::HiLo);
    }

    #[test]
    fn should_return_error_when_converting_rule() {
        let mut config_rule = get_typical_config_rule();
        config_rule.counting_system = String::from("Not a counting system");
        let convert_result: Result<Rule, serde::de::value::Error> = config_rule.try_into();
        assert!(convert_result.is_err());
    }

    #[test]
    fn can_parse_config_yaml() {
        let yaml = r#"
rule:
  number_of_decks: 6
  penetration: 0.8
  dealer_hits_soft17: false
  payout_blackjack: 1.5
  counting_system: Ko
edge_simulator:
  number_of_threads: 4
  hands_per_thread: 250000
  starting_bankroll: 0.0
  seed: 17
  bet_spread:
    0: 1.0
    3: 10.0
    6: 25.0
  strategy_file: null
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.edge_simulator.number_of_threads, 4);
        assert_eq!(config.edge_simulator.seed, Some(17));
        assert_eq!(config.edge_simulator.bet_spread.get(&3), Some(&10.0));
        let rule: Rule = config.rule.try_into().unwrap();
        assert_eq!(rule.counting, CountingSystem::Ko);
    }

    const SAMPLE_STRATEGY: &str = "\
---HARD
,2,3,4,5,6,7,8,9,T,A
16,S,S,S,S,S,H,H,H,H,H
---SOFT
,2,3,4,5,6,7,8,9,T,A
18,S,D,D,D,D,S,S,H,H,H
---PAIRS
,2,3,4,5,6,7,8,9,T,A
88,P,P,P,P,P,P,P,P,P,P
AA,P,P,P,P,P,P,P,P,P,P
";

    #[test]
    fn parses_all_three_sections() {
        let table = parse_strategy_table(SAMPLE_STRATEGY).unwrap();
        let hard_16 = Hand::with_cards(vec![Rank::Ten, Rank::Six]);
        assert_eq!(table.decide(Rank::Two, &hard_16), Ok(Action::Stand));
        assert_eq!(table.decide(Rank::Seven, &hard_16), Ok(Action::Hit));

        let soft_18 = Hand::with_cards(vec![Rank::Ace, Rank::Seven]);
        assert_eq!(table.decide(Rank::Three, &soft_18), Ok(Action::Double));
        assert_eq!(table.decide(Rank::Ace, &soft_18), Ok(Action::Hit));

        let eights = Hand::with_cards(vec![Rank::Eight, Rank::Eight]);
        assert_eq!(table.decide(Rank::Ten, &eights), Ok(Action::Split));

        // Rows the file never mentioned stay empty.
        let hard_12 = Hand::with_cards(vec![Rank::Ten, Rank::Two]);
        assert!(table.decide(Rank::Two, &hard_12).is_err());
    }

    #[test]
    fn missing_sections_are_allowed() {
        let table = parse_strategy_table(
            "---HARD\n,2,3,4,5,6,7,8,9,T,A\n16,S,S,S,S,S,H,H,H,H,H\n",
        )
        .unwrap();
        let eights = Hand::with_cards(vec![Rank::Eight, Rank::Eight]);
        assert!(table.decide(Rank::Ten, &eights).is_err());
    }

    #[test]
    fn rejects_unknown_option_symbols() {
        let result = parse_strategy_table("---HARD\n,2\n16,X\n");
        assert!(matches!(
            result,
            Err(StrategyFileError::InvalidOption(symbol)) if symbol == "X"
        ));
    }

    #[test]
    fn rejects_surrender_entries() {
        let result = parse_strategy_table("---HARD\n,2\n16,R\n");
        assert!(matches!(result, Err(StrategyFileError::Surrender)));
    }

    #[test]
    fn rejects_bad_row_labels() {
        let result = parse_strategy_table("---HARD\n,2\n35,S\n");
        assert!(matches!(result, Err(StrategyFileError::BadLabel(_))));
        let result = parse_strategy_table("---PAIRS\n,2\n89,S\n");
        assert!(matches!(result, Err(StrategyFileError::BadLabel(_))));
    }

    #[test]
    fn rejects_rows_wider_than_the_header() {
        let result = parse_strategy_table("---HARD\n,2\n16,S,S\n");
        assert!(matches!(result, Err(StrategyFileError::RowTooWide(_))));
    }
}
