//! Command configuration assembled from defaults, an optional TOML file,
//! `--set KEY=VALUE` overrides and dedicated flags, in increasing precedence.

mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_permute_config, build_score_config};
