use sspt::engine::config::{PermuteConfig, ScoringConfig};
use std::path::PathBuf;

pub struct ScoreAppConfig {
    pub fold_changes_path: PathBuf,
    pub pathways_dir: PathBuf,
    pub output_path: PathBuf,
    pub missing_value: String,
    pub core_config: ScoringConfig,
}

pub struct PermuteAppConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub core_config: PermuteConfig,
}
