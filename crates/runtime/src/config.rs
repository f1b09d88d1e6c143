use std::env;
use std::path::PathBuf;

/// Session settings read from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Directory holding `config.toml` and `levels/`.
    pub data_dir: PathBuf,
    /// Level name, resolved to `levels/<name>.json` under `data_dir`.
    pub level: String,
    /// Explicit game config file; overrides `data_dir/config.toml`.
    pub config_path: Option<PathBuf>,
    /// Number of ticks to simulate.
    pub ticks: u64,
}

impl RuntimeConfig {
    pub const DEFAULT_DATA_DIR: &'static str = "data";
    pub const DEFAULT_LEVEL: &'static str = "demo";
    pub const DEFAULT_TICKS: u64 = 20;

    /// Reads `DRIFT_DATA_DIR`, `DRIFT_LEVEL`, `DRIFT_CONFIG` and
    /// `DRIFT_TICKS`. Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("DRIFT_DATA_DIR") {
            config.data_dir = dir;
        }
        if let Ok(level) = env::var("DRIFT_LEVEL") {
            config.level = level;
        }
        config.config_path = read_env::<PathBuf>("DRIFT_CONFIG");
        if let Some(ticks) = read_env::<u64>("DRIFT_TICKS") {
            config.ticks = ticks;
        } else if env::var("DRIFT_TICKS").is_ok() {
            tracing::warn!("DRIFT_TICKS is not a number, using {}", Self::DEFAULT_TICKS);
        }

        config
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(Self::DEFAULT_DATA_DIR),
            level: Self::DEFAULT_LEVEL.to_owned(),
            config_path: None,
            ticks: Self::DEFAULT_TICKS,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
