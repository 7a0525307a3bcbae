//! TOML configuration file
//!
//! Lets CI pipelines keep their statistical settings and gating rules next
//! to the code instead of on the command line:
//!
//! ```toml
//! checks = ["time/op=+10%", "speed=-10%"]
//!
//! [stat]
//! significance_level = 0.01
//! center = "median"
//!
//! [run]
//! pattern = "Encode"
//! count = 10
//! command = ["go", "test", "-run", "^$", "-bench", "{pattern}"]
//! ```
//!
//! Every section and key is optional. Command line flags take precedence.

use crate::checker::Checker;
use crate::stat::StatConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Defaults for run mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Benchmark selection pattern
    pub pattern: String,
    /// Runs per revision
    pub count: usize,
    /// Benchmark command, program first; empty means `go test`
    pub command: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pattern: ".".to_string(),
            count: 5,
            command: Vec::new(),
        }
    }
}

/// Contents of a `benchcheck.toml` file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchcheckConfig {
    /// Checker rules, e.g. `time/op=+10%`
    pub checks: Vec<String>,
    pub stat: StatConfig,
    pub run: RunConfig,
}

impl BenchcheckConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Load configuration from a TOML string
    ///
    /// The statistical settings are validated and every check rule is
    /// parsed, so a bad file fails here rather than mid-run.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.stat.validate()?;
        config.checkers()?;
        Ok(config)
    }

    /// Parsed checker rules
    pub fn checkers(&self) -> Result<Vec<Checker>> {
        self.checks
            .iter()
            .map(|rule| Checker::parse(rule).map_err(anyhow::Error::from))
            .collect()
    }
}
