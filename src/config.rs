//! Connector configuration from environment variables
//!
//! Expected environment variables (all optional):
//! - MAPLE_SOURCE: `archive` (default) or `fixture`
//! - MAPLE_FIXTURE_DIR: directory with the archive layout for the fixture source
//! - MAPLE_WORK_DIR: parent directory for extracted archives
//! - MAPLE_KEEP_WORKDIR: keep extracted archives (`true`/`1`)
//! - MAPLE_TIMEOUT_SECS: per-phase time budget in seconds (default 600)

use eyre::{Context, Result, bail};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Where Maple data is read from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MapleSource {
    /// Archive uploaded to the platform and referenced by the event
    #[default]
    Archive,
    /// Static data, either bundled or from a directory
    Fixture { dir: Option<PathBuf> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    pub source: MapleSource,
    pub work_dir: Option<PathBuf>,
    pub keep_workdir: bool,
    pub timeout: Duration,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            source: MapleSource::default(),
            work_dir: None,
            keep_workdir: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ConnectorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let source = match var("MAPLE_SOURCE").as_deref() {
            None | Some("archive") => MapleSource::Archive,
            Some("fixture") => MapleSource::Fixture {
                dir: var("MAPLE_FIXTURE_DIR").map(PathBuf::from),
            },
            Some(other) => bail!(
                "Invalid MAPLE_SOURCE: {} (expected 'archive' or 'fixture')",
                other
            ),
        };

        let keep_workdir = match var("MAPLE_KEEP_WORKDIR") {
            Some(value) => parse_flag(&value)
                .with_context(|| format!("Invalid MAPLE_KEEP_WORKDIR: {}", value))?,
            None => false,
        };

        let timeout = match var("MAPLE_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(
                u64::from_str(&value)
                    .with_context(|| format!("Invalid MAPLE_TIMEOUT_SECS: {}", value))?,
            ),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            source,
            work_dir: var("MAPLE_WORK_DIR").map(PathBuf::from),
            keep_workdir,
            timeout,
        })
    }
}

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => bail!("expected true or false"),
    }
}
