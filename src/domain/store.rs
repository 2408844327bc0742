//! Logical store names

use crate::domain::errors::AilError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of logical stores
pub const STORE_COUNT: usize = 6;

/// One of the fixed Redis/Kvrocks stores; the name doubles as the
/// configuration section holding its connection settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StoreName {
    #[serde(rename = "Redis_Queues")]
    Queues,
    #[serde(rename = "Redis_Cache")]
    Cache,
    #[serde(rename = "Redis_Log")]
    Log,
    #[serde(rename = "Redis_Log_submit")]
    LogSubmit,
    #[serde(rename = "Kvrocks_DB")]
    Db,
    #[serde(rename = "Kvrocks_Tags")]
    Tags,
}

impl StoreName {
    /// Every store, in startup order
    pub const ALL: [StoreName; STORE_COUNT] = [
        StoreName::Queues,
        StoreName::Cache,
        StoreName::Log,
        StoreName::LogSubmit,
        StoreName::Db,
        StoreName::Tags,
    ];

    /// Configuration section name
    pub fn section(&self) -> &'static str {
        match self {
            StoreName::Queues => "Redis_Queues",
            StoreName::Cache => "Redis_Cache",
            StoreName::Log => "Redis_Log",
            StoreName::LogSubmit => "Redis_Log_submit",
            StoreName::Db => "Kvrocks_DB",
            StoreName::Tags => "Kvrocks_Tags",
        }
    }

    /// Position in [`StoreName::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for StoreName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

impl FromStr for StoreName {
    type Err = AilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StoreName::ALL
            .into_iter()
            .find(|name| name.section().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AilError::SectionNotFound(s.to_string()))
    }
}
