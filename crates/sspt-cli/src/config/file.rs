use crate::error::{CliError, Result};
use serde::Deserialize;
use sspt::engine::config::{PermutationScheme, SingularPolicy, SolverBackend};
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileSolverConfig {
    pub backend: Option<SolverBackend>,
    pub tolerance: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileScoringConfig {
    #[serde(rename = "on-singular")]
    pub on_singular: Option<SingularPolicy>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileOutputConfig {
    #[serde(rename = "missing-value")]
    pub missing_value: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FilePermuteConfig {
    pub scheme: Option<PermutationScheme>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub solver: Option<FileSolverConfig>,
    pub scoring: Option<FileScoringConfig>,
    pub output: Option<FileOutputConfig>,
    pub permute: Option<FilePermuteConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
