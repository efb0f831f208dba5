mod config;
mod wiring;

use std::error::Error;
use std::fs;
use std::path::Path;

use api::AppState;
use core_sim::{JsonFileStore, MarketEngine, RecoveryPolicy};
use log::info;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = config::Config::from_env()?;
    let engine = open_engine(&config.data_dir, config.recovery)?;
    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(
        "serving market simulator on {} (data dir {}, recovery {})",
        config.listen_addr,
        config.data_dir.display(),
        config.recovery.as_str()
    );

    axum::serve(listener, wiring::build_app(AppState::new(engine))).await?;
    Ok(())
}

fn open_engine(data_dir: &Path, recovery: RecoveryPolicy) -> Result<MarketEngine, Box<dyn Error>> {
    fs::create_dir_all(data_dir)?;
    Ok(MarketEngine::open(JsonFileStore::in_dir(data_dir), recovery)?)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    use core_sim::{RecoveryPolicy, PORTFOLIO_FILE};

    use super::open_engine;

    fn unique_root(label: &str) -> std::path::PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("market-server-{label}-{unique}"))
    }

    #[test]
    fn open_engine_creates_data_dir_and_seeds_defaults() {
        let root = unique_root("startup");
        let data_dir = root.join("nested").join("data");

        let engine = open_engine(&data_dir, RecoveryPolicy::Fail)
            .expect("startup should create the data directory");

        assert!(data_dir.is_dir());
        assert_eq!(engine.portfolio().cash, 10_000.0);
        fs::remove_dir_all(&root).expect("temp data directory should be removable");
    }

    #[test]
    fn open_engine_refuses_corrupt_state_under_fail_policy() {
        let root = unique_root("corrupt");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join(PORTFOLIO_FILE), "{").unwrap();

        assert!(open_engine(&root, RecoveryPolicy::Fail).is_err());
        assert!(open_engine(&root, RecoveryPolicy::Defaults).is_ok());

        fs::remove_dir_all(&root).unwrap();
    }
}
