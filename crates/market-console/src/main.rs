use std::error::Error;
use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use core_sim::{JsonFileStore, MarketEngine, RecoveryPolicy};
use market_console::ConsoleSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Recovery {
    /// Start corrupt records over from defaults.
    Defaults,
    /// Refuse to start when a record cannot be loaded.
    Fail,
}

impl From<Recovery> for RecoveryPolicy {
    fn from(value: Recovery) -> Self {
        match value {
            Recovery::Defaults => RecoveryPolicy::Defaults,
            Recovery::Fail => RecoveryPolicy::Fail,
        }
    }
}

/// Play the stock market simulator in the terminal.
#[derive(Debug, Parser)]
#[command(name = "market-console", version)]
struct Args {
    /// Directory holding portfolio.json and stocks.json.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// How to treat a state file that cannot be parsed.
    #[arg(long, value_enum, default_value_t = Recovery::Defaults)]
    recovery: Recovery,

    /// Seed for a reproducible price walk.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let store = JsonFileStore::in_dir(&args.data_dir);
    let policy = RecoveryPolicy::from(args.recovery);
    let mut engine = match args.seed {
        Some(seed) => MarketEngine::open_seeded(store, policy, seed)?,
        None => MarketEngine::open(store, policy)?,
    };

    let stdin = io::stdin();
    ConsoleSession::new(&mut engine, stdin.lock(), io::stdout()).run()?;
    Ok(())
}
