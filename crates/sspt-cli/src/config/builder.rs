use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{PermuteAppConfig, ScoreAppConfig};
use crate::cli::{PermuteArgs, ScoreArgs};
use crate::error::{CliError, Result};
use sspt::engine::config::{PermuteConfig, ScoringConfigBuilder, SingularPolicy};
use std::path::Path;
use std::str::FromStr;

pub fn build_score_config(args: &ScoreArgs) -> Result<ScoreAppConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file_config(args.config.as_deref())?;
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let solver_file = file_config.solver.take().unwrap_or_default();
    let scoring_file = file_config.scoring.take().unwrap_or_default();
    let output_file = file_config.output.take().unwrap_or_default();

    let backend = args
        .solver
        .or(solver_file.backend)
        .unwrap_or(defaults.backend);
    let on_singular = if args.strict {
        SingularPolicy::Abort
    } else {
        scoring_file.on_singular.unwrap_or(defaults.on_singular)
    };

    let mut builder = ScoringConfigBuilder::new()
        .backend(backend)
        .on_singular(on_singular);
    if let Some(tolerance) = args.tolerance.or(solver_file.tolerance) {
        builder = builder.tolerance(tolerance);
    }
    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(ScoreAppConfig {
        fold_changes_path: args.fold_changes.clone(),
        pathways_dir: args.pathways.clone(),
        output_path: args.output.clone(),
        missing_value: output_file
            .missing_value
            .unwrap_or(defaults.missing_value),
        core_config,
    })
}

pub fn build_permute_config(args: &PermuteArgs) -> Result<PermuteAppConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = load_file_config(args.config.as_deref())?;
    let permute_file = file_config.permute.take().unwrap_or_default();

    Ok(PermuteAppConfig {
        input_path: args.input.clone(),
        output_path: args.output.clone(),
        core_config: PermuteConfig {
            scheme: args
                .scheme
                .or(permute_file.scheme)
                .unwrap_or(defaults.scheme),
            seed: args.seed.or(permute_file.seed),
        },
    })
}

fn load_file_config(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => FileConfig::from_file(path),
        None => Ok(FileConfig::default()),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();
        let value_str = value_str.trim();

        match key {
            "solver.backend" => {
                config.solver.get_or_insert_with(Default::default).backend =
                    Some(parse_value(key, value_str, "solver backend")?);
            }
            "solver.tolerance" => {
                config.solver.get_or_insert_with(Default::default).tolerance =
                    Some(parse_value(key, value_str, "float")?);
            }
            "scoring.on-singular" => {
                config.scoring.get_or_insert_with(Default::default).on_singular =
                    Some(parse_value(key, value_str, "policy")?);
            }
            "output.missing-value" => {
                config
                    .output
                    .get_or_insert_with(Default::default)
                    .missing_value = Some(value_str.to_string());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
