use std::{
    env, fmt,
    net::{AddrParseError, SocketAddr},
    path::PathBuf,
};

use core_sim::RecoveryPolicy;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_RECOVERY: RecoveryPolicy = RecoveryPolicy::Defaults;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub recovery: RecoveryPolicy,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidListenAddr(AddrParseError),
    InvalidDataDir,
    InvalidRecovery,
    NonUnicodeListenAddr,
    NonUnicodeDataDir,
    NonUnicodeRecovery,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidListenAddr(err) => {
                write!(f, "MARKET_SERVER_ADDR is not a valid socket address: {err}")
            }
            Self::InvalidDataDir => {
                write!(f, "MARKET_DATA_DIR must not be empty or whitespace")
            }
            Self::InvalidRecovery => {
                write!(f, "MARKET_STATE_RECOVERY must be one of: defaults, fail")
            }
            Self::NonUnicodeListenAddr => {
                write!(f, "MARKET_SERVER_ADDR contains non-unicode data")
            }
            Self::NonUnicodeDataDir => {
                write!(f, "MARKET_DATA_DIR contains non-unicode data")
            }
            Self::NonUnicodeRecovery => {
                write!(f, "MARKET_STATE_RECOVERY contains non-unicode data")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidListenAddr(err) => Some(err),
            Self::InvalidDataDir => None,
            Self::InvalidRecovery => None,
            Self::NonUnicodeListenAddr => None,
            Self::NonUnicodeDataDir => None,
            Self::NonUnicodeRecovery => None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let listen_addr = match env::var("MARKET_SERVER_ADDR") {
            Ok(value) => value.parse().map_err(ConfigError::InvalidListenAddr)?,
            Err(env::VarError::NotPresent) => DEFAULT_LISTEN_ADDR
                .parse()
                .map_err(ConfigError::InvalidListenAddr)?,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeListenAddr);
            }
        };

        let data_dir = match env::var("MARKET_DATA_DIR") {
            Ok(value) => {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidDataDir);
                }
                PathBuf::from(value)
            }
            Err(env::VarError::NotPresent) => PathBuf::from(DEFAULT_DATA_DIR),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeDataDir);
            }
        };

        let recovery = match env::var("MARKET_STATE_RECOVERY") {
            Ok(value) => {
                RecoveryPolicy::parse(value.as_str()).ok_or(ConfigError::InvalidRecovery)?
            }
            Err(env::VarError::NotPresent) => DEFAULT_RECOVERY,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigError::NonUnicodeRecovery);
            }
        };

        Ok(Self {
            listen_addr,
            data_dir,
            recovery,
        })
    }
}
