use std::fs;
use std::io;
use std::env;

use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_NUM_FLOORS: usize = 10;
pub const DEFAULT_NUM_ELEVATORS: usize = 3;
pub const DEFAULT_CAPACITY: usize = 3;
pub const DEFAULT_IDLE_TICKS: u32 = 5;
pub const DEFAULT_DWELL_TICKS: u32 = 3;

const FILE_PATH: &str = "config.json";
const FALLBACK_FILE_PATH: &str = "_config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read configuration file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed configuration file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{name} must be at least one tick")]
    InvalidTiming { name: &'static str },
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default)]
struct ConfigFile {
    #[serde(default)]
    building: BuildingConfig,
}

/// Shape of the building and the timing of every elevator in it.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BuildingConfig {
    pub num_floors: usize,
    pub num_elevators: usize,
    pub capacity: usize,
    /// Ticks an idle elevator waits at a terminal floor before patrolling.
    pub idle_ticks: u32,
    /// Ticks the doors stay open at a stop.
    pub dwell_ticks: u32,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        BuildingConfig {
            num_floors: DEFAULT_NUM_FLOORS,
            num_elevators: DEFAULT_NUM_ELEVATORS,
            capacity: DEFAULT_CAPACITY,
            idle_ticks: DEFAULT_IDLE_TICKS,
            dwell_ticks: DEFAULT_DWELL_TICKS,
        }
    }
}

impl BuildingConfig {
    /// Reads `config.json` (or `_config.json`, or the defaults) and applies
    /// command line overrides.
    pub fn get() -> Result<Self, ConfigError> {
        let mut config = read_config_file()?;
        config.apply_args(env::args().skip(1));
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config_file: ConfigFile = serde_json::from_str(contents)?;
        Ok(config_file.building)
    }

    /// Applies `--floors`, `--elevators`, `--capacity`, `--idle` and `--dwell`
    /// pairs. Unknown flags and numbers that fail to parse are skipped.
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        for arg_pair in args.chunks(2) {
            let (flag, value) = match arg_pair {
                [flag, value] => (flag.as_str(), value.as_str()),
                [flag] => {
                    warn!(flag = %flag, "missing value for argument, skipping...");
                    continue;
                },
                _ => continue,
            };
            match flag {
                "--floors" => self.num_floors = parse_or(flag, value, self.num_floors),
                "--elevators" => self.num_elevators = parse_or(flag, value, self.num_elevators),
                "--capacity" => self.capacity = parse_or(flag, value, self.capacity),
                "--idle" => self.idle_ticks = parse_or(flag, value, self.idle_ticks),
                "--dwell" => self.dwell_ticks = parse_or(flag, value, self.dwell_ticks),
                _ => warn!(flag = %flag, "illegal argument, skipping..."),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.idle_ticks == 0 {
            return Err(ConfigError::InvalidTiming { name: "idle_ticks" });
        }
        if self.dwell_ticks == 0 {
            return Err(ConfigError::InvalidTiming { name: "dwell_ticks" });
        }
        Ok(())
    }
}

fn parse_or<T: std::str::FromStr>(flag: &str, value: &str, current: T) -> T {
    match value.parse::<T>() {
        Ok(num) => num,
        Err(_) => {
            warn!(flag = %flag, value = %value, "value is not a number, skipping...");
            current
        },
    }
}

fn read_config_file() -> Result<BuildingConfig, ConfigError> {
    let config_contents = match fs::read_to_string(FILE_PATH) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            match fs::read_to_string(FALLBACK_FILE_PATH) {
                Ok(content) => content,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    info!("No configuration file provided, using default settings...");
                    return Ok(BuildingConfig::default());
                },
                Err(err) => return Err(err.into()),
            }
        },
        Err(err) => return Err(err.into()),
    };
    BuildingConfig::from_json(&config_contents)
}
