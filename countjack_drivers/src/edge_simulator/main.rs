mod simulation;

use clap::Parser;
use countjack::{Rule, StrategyTable};
use countjack_drivers::{load_strategy_table, parse_config_from_file};

const DEFAULT_CONFIG_PATH: &str = "~/.countjack.yml";

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,
}

fn main() {
    let mut args = CommandLineArgs::parse();
    if args.config == DEFAULT_CONFIG_PATH {
        let home_dir = home::home_dir().expect("Cannot find home directory");
        let config_file_path = home_dir.join(".countjack.yml");
        if !config_file_path.exists() {
            panic!("Config file not exists");
        }
        if config_file_path.is_dir() {
            panic!("This should be a path rather than a directory");
        }
        args.config = String::from(config_file_path.to_str().unwrap());
    }
    let args = args;

    let config = parse_config_from_file(&args.config);
    let rule: Rule = config
        .rule
        .clone()
        .try_into()
        .expect("Invalid rule section in config");
    let strategy = match &config.edge_simulator.strategy_file {
        Some(path) => load_strategy_table(path).expect("Cannot load strategy table"),
        None => StrategyTable::basic(),
    };

    let report = simulation::run_simulation(&rule, &config.edge_simulator, &strategy)
        .expect("Simulation aborted");

    println!("hands played:  {}", report.hands_played);
    println!("total wagered: {:.2}", report.total_wagered);
    println!("net result:    {:.2}", report.net);
    println!("edge per unit: {:.4}%", report.house_edge() * 100.0);
}
