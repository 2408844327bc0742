//! Deployment environment labels
//!
//! The platform is deployed into one of a closed set of environments. The
//! label decides which `environments/<label>.cfg` file the resolver loads.

use crate::domain::errors::AilError;
use crate::domain::result::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment variables consulted for the label, in priority order
pub const ENVIRONMENT_VARIABLES: [&str; 2] = ["DEPLOYMENT_ENV", "AIL_ENV"];

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EnvironmentLabel {
    /// Local development with Docker containers
    #[default]
    DevLocal,
    /// Cloud-based testing and staging
    TestCloud,
    /// Production cloud deployment
    ProdCloud,
}

impl EnvironmentLabel {
    /// All supported labels
    pub const ALL: [EnvironmentLabel; 3] = [
        EnvironmentLabel::DevLocal,
        EnvironmentLabel::TestCloud,
        EnvironmentLabel::ProdCloud,
    ];

    /// Label as used in file names (`dev-local`, `test-cloud`, `prod-cloud`)
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentLabel::DevLocal => "dev-local",
            EnvironmentLabel::TestCloud => "test-cloud",
            EnvironmentLabel::ProdCloud => "prod-cloud",
        }
    }

    /// Comma separated list of supported labels, for error messages
    pub fn supported() -> String {
        Self::ALL
            .iter()
            .map(|label| label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Maps a raw environment variable value to a label.
    ///
    /// Accepts the canonical labels plus the deployment aliases used by the
    /// container scripts. Matching is case-insensitive.
    pub fn from_alias(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "dev-local" | "development" | "docker" => Some(EnvironmentLabel::DevLocal),
            "test-cloud" | "staging" | "testing" => Some(EnvironmentLabel::TestCloud),
            "prod-cloud" | "production" | "azure" | "cloud" => Some(EnvironmentLabel::ProdCloud),
            _ => None,
        }
    }

    /// Resolves the label once at process start.
    ///
    /// Priority: explicit override, then `DEPLOYMENT_ENV`, then `AIL_ENV`,
    /// then the default (`dev-local`). An explicit override must be one of
    /// the canonical labels; unrecognised environment variable values are
    /// skipped.
    pub fn resolve(explicit: Option<&str>) -> Result<Self> {
        Self::resolve_with(explicit, |name| std::env::var(name).ok())
    }

    /// Same as [`EnvironmentLabel::resolve`] with an injectable variable lookup
    pub fn resolve_with<F>(explicit: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = explicit {
            return name.parse();
        }

        for variable in ENVIRONMENT_VARIABLES {
            if let Some(label) = lookup(variable).as_deref().and_then(Self::from_alias) {
                tracing::debug!(variable, environment = %label, "Environment selected from variable");
                return Ok(label);
            }
        }

        Ok(Self::default())
    }

    /// Development environments
    pub fn is_development(&self) -> bool {
        *self == EnvironmentLabel::DevLocal
    }

    /// Testing/staging environments
    pub fn is_testing(&self) -> bool {
        *self == EnvironmentLabel::TestCloud
    }

    /// Production environments
    pub fn is_production(&self) -> bool {
        *self == EnvironmentLabel::ProdCloud
    }
}

impl FromStr for EnvironmentLabel {
    type Err = AilError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == lowered)
            .ok_or_else(|| AilError::UnsupportedEnvironment {
                name: s.to_string(),
                supported: Self::supported(),
            })
    }
}

impl fmt::Display for EnvironmentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
