use crate::cli::ScoreArgs;
use crate::config::build_score_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use sspt::{
    core::io::{
        traits::TabularFile,
        tsv::{read_pathway_dir, write_scores},
    },
    core::models::expression::FoldChangeMatrix,
    engine::progress::ProgressReporter,
    workflows,
};
use std::fs::File;
use std::io::BufWriter;
use tracing::{info, warn};

pub fn run(args: ScoreArgs) -> Result<()> {
    let config = build_score_config(&args)?;

    info!("Loading fold-change matrix from {:?}", &config.fold_changes_path);
    let fold_changes = FoldChangeMatrix::read_from_path(&config.fold_changes_path).map_err(|e| {
        CliError::FileParsing {
            path: config.fold_changes_path.clone(),
            source: e.into(),
        }
    })?;

    info!("Loading pathway matrices from {:?}", &config.pathways_dir);
    let pathways = read_pathway_dir(&config.pathways_dir).map_err(|e| CliError::FileParsing {
        path: config.pathways_dir.clone(),
        source: e.into(),
    })?;
    if pathways.is_empty() {
        warn!("No pathway files found in {:?}.", &config.pathways_dir);
    }

    println!(
        "Scoring {} pathway(s) across {} sample(s) with the {} solver...",
        pathways.len(),
        fold_changes.n_samples(),
        config.core_config.solver.backend
    );

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let result = workflows::score::run(&pathways, &fold_changes, &config.core_config, &reporter);
    progress_handler.clear();
    let result = result?;

    for failure in &result.failures {
        match &failure.sample {
            Some(sample) => warn!(
                pathway = %failure.pathway,
                sample = %sample,
                error = %failure.error,
                "Score set to missing for one sample."
            ),
            None => warn!(
                pathway = %failure.pathway,
                error = %failure.error,
                "Score set to missing for all samples."
            ),
        }
    }

    info!("Writing score table to {:?}", &config.output_path);
    let mut writer = BufWriter::new(File::create(&config.output_path)?);
    write_scores(&result.table, &mut writer, &config.missing_value).map_err(|e| {
        CliError::FileWriting {
            path: config.output_path.clone(),
            source: e.into(),
        }
    })?;

    if result.is_complete() {
        println!(
            "✓ Scores for {} pathway(s) written to: {}",
            result.table.pathways().len(),
            config.output_path.display()
        );
    } else {
        println!(
            "Scores written to: {} ({} unsolvable system(s) reported as '{}').",
            config.output_path.display(),
            result.failures.len(),
            config.missing_value
        );
    }
    Ok(())
}
