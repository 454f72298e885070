//! Configuration type definitions.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ImportError;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// NetBox dump to import.
    #[serde(default)]
    pub source: SourceConfig,

    /// Where resolved records and the run summary go.
    #[serde(default)]
    pub output: OutputConfig,

    /// Import behavior.
    #[serde(default)]
    pub import: ImportConfig,
}

/// NetBox dump configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path of the `dumpdata` JSON file.
    #[serde(default)]
    pub path: PathBuf,

    /// NetBox version the dump was taken from.
    #[serde(default = "default_netbox_version", deserialize_with = "version_string")]
    pub netbox_version: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            netbox_version: default_netbox_version(),
        }
    }
}

fn default_netbox_version() -> String {
    "3.4".to_string()
}

/// Accept `netbox_version: 3.4` as well as `netbox_version: "3.4"`.
fn version_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON-lines file receiving the resolved records.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Optional JSON run summary.
    #[serde(default)]
    pub summary_path: Option<PathBuf>,
}

/// Import behavior configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Report per-model progress as JSON lines on stderr.
    #[serde(default)]
    pub progress: bool,

    /// Resolve everything but write no records.
    #[serde(default)]
    pub dry_run: bool,
}

/// NetBox versions with a known dump layout.
pub const SUPPORTED_NETBOX_VERSIONS: &[&str] =
    &["2.10.3", "2.10.4", "2.10.5", "2.10.6", "2.10.7", "2.10.8", "3.4"];

/// A supported NetBox release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NetboxVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: Option<u16>,
}

impl NetboxVersion {
    /// Whether dumps from this release can be imported.
    pub fn is_supported(&self) -> bool {
        match (self.major, self.minor, self.patch) {
            (2, 10, Some(patch)) => (3..=8).contains(&patch),
            (3, 4, None) => true,
            _ => false,
        }
    }
}

impl FromStr for NetboxVersion {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ImportError::Config(format!("invalid NetBox version '{}'", s));
        let mut parts = s.trim().trim_start_matches('v').split('.');
        let mut number = |required: bool| -> Result<Option<u16>, ImportError> {
            match parts.next() {
                Some(part) => part.parse().map(Some).map_err(|_| invalid()),
                None if required => Err(invalid()),
                None => Ok(None),
            }
        };

        let major = number(true)?.ok_or_else(invalid)?;
        let minor = number(true)?.ok_or_else(invalid)?;
        let patch = number(false)?;
        if number(false)?.is_some() {
            return Err(invalid());
        }
        Ok(Self { major, minor, patch })
    }
}

impl fmt::Display for NetboxVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}
