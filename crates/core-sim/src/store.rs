use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::{error::StoreError, Portfolio, StockCatalog};

pub const PORTFOLIO_FILE: &str = "portfolio.json";
pub const STOCKS_FILE: &str = "stocks.json";

/// Backing storage for the two engine records. Each record is loaded and saved
/// independently; there is no cross-record transaction.
pub trait StateStore: Send {
    fn load_portfolio(&self) -> Result<Option<Portfolio>, StoreError>;
    fn save_portfolio(&self, portfolio: &Portfolio) -> Result<(), StoreError>;
    fn load_catalog(&self) -> Result<Option<StockCatalog>, StoreError>;
    fn save_catalog(&self, catalog: &StockCatalog) -> Result<(), StoreError>;
    /// Removes both records. Missing records are not an error.
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    portfolio_path: PathBuf,
    catalog_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(portfolio_path: impl Into<PathBuf>, catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            portfolio_path: portfolio_path.into(),
            catalog_path: catalog_path.into(),
        }
    }

    /// `portfolio.json` and `stocks.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(PORTFOLIO_FILE), dir.join(STOCKS_FILE))
    }

    pub fn portfolio_path(&self) -> &Path {
        &self.portfolio_path
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }
}

impl StateStore for JsonFileStore {
    fn load_portfolio(&self) -> Result<Option<Portfolio>, StoreError> {
        read_record::<Portfolio>(&self.portfolio_path)?
            .map(|portfolio| {
                portfolio
                    .normalized()
                    .map_err(|reason| StoreError::invalid(&self.portfolio_path, reason))
            })
            .transpose()
    }

    fn save_portfolio(&self, portfolio: &Portfolio) -> Result<(), StoreError> {
        write_record(&self.portfolio_path, portfolio)
    }

    fn load_catalog(&self) -> Result<Option<StockCatalog>, StoreError> {
        read_record::<StockCatalog>(&self.catalog_path)?
            .map(|catalog| {
                catalog
                    .normalized()
                    .map_err(|reason| StoreError::invalid(&self.catalog_path, reason))
            })
            .transpose()
    }

    fn save_catalog(&self, catalog: &StockCatalog) -> Result<(), StoreError> {
        write_record(&self.catalog_path, catalog)
    }

    fn clear(&self) -> Result<(), StoreError> {
        remove_if_present(&self.portfolio_path)?;
        remove_if_present(&self.catalog_path)
    }
}

fn read_record<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(StoreError::io(path, err)),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            path: path.to_path_buf(),
            source,
        })
}

fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<(), StoreError> {
    if let Some(parent) = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
    {
        fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
    }

    let bytes = to_pretty_json(record).map_err(|err| StoreError::io(path, err))?;
    fs::write(path, bytes).map_err(|err| StoreError::io(path, err))
}

fn to_pretty_json<T: Serialize>(record: &T) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, formatter);
    record.serialize(&mut serializer).map_err(io::Error::from)?;
    Ok(bytes)
}

fn remove_if_present(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(StoreError::io(path, err)),
    }
}

/// Keeps records in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    portfolio: Mutex<Option<Portfolio>>,
    catalog: Mutex<Option<StockCatalog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(portfolio: Option<Portfolio>, catalog: Option<StockCatalog>) -> Self {
        Self {
            portfolio: Mutex::new(portfolio),
            catalog: Mutex::new(catalog),
        }
    }

    pub fn portfolio(&self) -> Option<Portfolio> {
        self.portfolio
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn catalog(&self) -> Option<StockCatalog> {
        self.catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StateStore for MemoryStore {
    fn load_portfolio(&self) -> Result<Option<Portfolio>, StoreError> {
        Ok(self.portfolio())
    }

    fn save_portfolio(&self, portfolio: &Portfolio) -> Result<(), StoreError> {
        *self
            .portfolio
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(portfolio.clone());
        Ok(())
    }

    fn load_catalog(&self) -> Result<Option<StockCatalog>, StoreError> {
        Ok(self.catalog())
    }

    fn save_catalog(&self, catalog: &StockCatalog) -> Result<(), StoreError> {
        *self.catalog.lock().unwrap_or_else(PoisonError::into_inner) = Some(catalog.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self
            .portfolio
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
        *self.catalog.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

impl<S: StateStore + Sync> StateStore for std::sync::Arc<S> {
    fn load_portfolio(&self) -> Result<Option<Portfolio>, StoreError> {
        (**self).load_portfolio()
    }

    fn save_portfolio(&self, portfolio: &Portfolio) -> Result<(), StoreError> {
        (**self).save_portfolio(portfolio)
    }

    fn load_catalog(&self) -> Result<Option<StockCatalog>, StoreError> {
        (**self).load_catalog()
    }

    fn save_catalog(&self, catalog: &StockCatalog) -> Result<(), StoreError> {
        (**self).save_catalog(catalog)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        fs,
        path::PathBuf,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::{JsonFileStore, StateStore};
    use crate::{Portfolio, Stock, StockCatalog};

    pub(crate) fn temp_dir(label: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("core-sim-{label}-{unique}"))
    }

    #[test]
    fn missing_files_load_as_none() {
        let store = JsonFileStore::in_dir(temp_dir("missing"));

        assert!(store.load_portfolio().unwrap().is_none());
        assert!(store.load_catalog().unwrap().is_none());
    }

    #[test]
    fn records_round_trip_through_files() {
        let root = temp_dir("round-trip");
        let store = JsonFileStore::in_dir(root.join("nested"));
        let mut portfolio = Portfolio::with_cash(1_234.56);
        portfolio.holdings.insert("GOOG".to_string(), 2);
        let catalog = StockCatalog::from_stocks([
            ("GOOG", Stock::new(2_512.37, 0.01)),
            ("AAPL", Stock::new(0.01, 0.02)),
        ]);

        store.save_portfolio(&portfolio).unwrap();
        store.save_catalog(&catalog).unwrap();

        assert_eq!(store.load_portfolio().unwrap(), Some(portfolio));
        assert_eq!(store.load_catalog().unwrap(), Some(catalog));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn saved_records_use_four_space_indent() {
        let root = temp_dir("indent");
        let store = JsonFileStore::in_dir(&root);

        store.save_portfolio(&Portfolio::default()).unwrap();

        let text = fs::read_to_string(store.portfolio_path()).unwrap();
        assert!(text.contains("\n    \"cash\": 10000.0"));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn garbage_file_is_reported_as_corrupt() {
        let root = temp_dir("corrupt");
        let store = JsonFileStore::in_dir(&root);
        fs::create_dir_all(&root).unwrap();
        fs::write(store.catalog_path(), "{\"AAPL\": {\"price\": 15").unwrap();

        let err = store.load_catalog().unwrap_err();

        assert!(err.is_corrupt());
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn negative_cash_is_reported_as_invalid() {
        let root = temp_dir("invalid");
        let store = JsonFileStore::in_dir(&root);
        fs::create_dir_all(&root).unwrap();
        fs::write(store.portfolio_path(), "{\"cash\": -5.0, \"holdings\": {}}").unwrap();

        let err = store.load_portfolio().unwrap_err();

        assert!(err.is_corrupt());
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn clear_removes_files_and_tolerates_missing_ones() {
        let root = temp_dir("clear");
        let store = JsonFileStore::in_dir(&root);
        store.save_portfolio(&Portfolio::default()).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();

        assert!(!store.portfolio_path().exists());
        assert!(!store.catalog_path().exists());
        fs::remove_dir_all(&root).unwrap();
    }
}
