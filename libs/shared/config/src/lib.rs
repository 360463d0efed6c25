use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

const DEFAULT_DATABASE_PATH: &str = "clinic.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_SERVER_PORT: u16 = 3000;

/// How the scheduling overlap check treats intervals that share a boundary instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// `[a_from, a_to]` and `[b_from, b_to]` conflict iff `a_from <= b_to && b_from <= a_to`.
    /// An appointment ending at 09:30 blocks one starting at 09:30.
    #[default]
    Closed,
    /// `a_from < b_to && b_from < a_to`. Back-to-back appointments are allowed.
    HalfOpen,
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryPolicy::Closed => write!(f, "closed"),
            BoundaryPolicy::HalfOpen => write!(f, "half_open"),
        }
    }
}

impl FromStr for BoundaryPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "closed" => Ok(BoundaryPolicy::Closed),
            "half_open" | "half-open" => Ok(BoundaryPolicy::HalfOpen),
            other => Err(format!("unknown boundary policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub database_busy_timeout: Duration,
    pub boundary_policy: BoundaryPolicy,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            database_busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            boundary_policy: BoundaryPolicy::default(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| {
                    warn!("DATABASE_PATH not set, using {}", DEFAULT_DATABASE_PATH);
                    PathBuf::from(DEFAULT_DATABASE_PATH)
                }),
            database_busy_timeout: Duration::from_millis(parse_or_default(
                "DATABASE_BUSY_TIMEOUT_MS",
                DEFAULT_BUSY_TIMEOUT_MS,
            )),
            boundary_policy: parse_or_default("SCHEDULING_BOUNDARY_POLICY", BoundaryPolicy::Closed),
            server_port: parse_or_default("SERVER_PORT", DEFAULT_SERVER_PORT),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - database path is empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.database_path.as_os_str().is_empty()
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => {
            warn!("{} not set, using default {}", key, default);
            default
        }
    }
}
