//! The interface of the clock the widget drives. Nothing here moves time:
//! an implementation patches the host's notion of "now" and reports back.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How simulated time behaves after a travel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Advances from the travelled-to instant.
    #[default]
    Flowing,
    /// Holds the travelled-to instant.
    Frozen,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Flowing, Mode::Frozen];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Flowing => "flowing",
            Mode::Frozen => "frozen",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown mode {0:?}, expected \"flowing\" or \"frozen\"")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "flowing" => Ok(Mode::Flowing),
            "frozen" => Ok(Mode::Frozen),
            other => Err(UnknownMode(other.to_string())),
        }
    }
}

/// Time-control collaborator. Timestamps are ms since the epoch.
pub trait TimeControl {
    fn travel(&self, timestamp: i64, mode: Mode);
    fn return_to_present(&self);
    fn is_active(&self) -> bool;
    /// `None` while not travelling.
    fn mode(&self) -> Option<Mode>;
    /// Current time as the host sees it, simulated or not.
    fn now(&self) -> i64;
    /// Persists the travel state under `key`.
    fn save(&self, key: &str);
    /// Resumes travel state persisted under `key`, if any.
    fn restore(&self, key: &str);
}
