//! JSON configuration file

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use arkvanity_core::{get_network, JobSpec, NetworkParams, NetworkSpec};
use serde::Deserialize;

const DEFAULT_WIF: u8 = 170;

/// Search settings loaded with `--config`. Values given here replace the
/// corresponding command-line flags.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub entropy: Option<usize>,
    pub count: Option<u64>,
    pub threads: Option<usize>,
    pub output: Option<String>,
    pub networks: Vec<FileNetwork>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileNetwork {
    /// Preset name, or a free-form label when `address_version` is given
    pub name: String,
    pub address_version: Option<u8>,
    pub wif: Option<u8>,
    pub jobs: Vec<FileJob>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileJob {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub prefix_and_suffix: bool,
    #[serde(default)]
    pub case_insensitive: bool,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn network_specs(&self) -> Result<Vec<NetworkSpec>> {
        self.networks.iter().map(FileNetwork::to_spec).collect()
    }
}

impl FileNetwork {
    fn to_spec(&self) -> Result<NetworkSpec> {
        let mut params = match (get_network(&self.name), self.address_version) {
            (_, Some(version)) => NetworkParams::new(&self.name, version, DEFAULT_WIF),
            (Some(preset), None) => preset,
            (None, None) => {
                return Err(anyhow!(
                    "Network '{}' is not a preset and has no address_version",
                    self.name
                ))
            }
        };
        if let Some(wif) = self.wif {
            params.wif = wif;
        }

        let jobs = self
            .jobs
            .iter()
            .map(|job| {
                JobSpec::new(
                    job.prefix.as_str(),
                    job.suffix.as_str(),
                    job.prefix_and_suffix,
                    job.case_insensitive,
                )
            })
            .collect();

        Ok(NetworkSpec::new(params, jobs))
    }
}
