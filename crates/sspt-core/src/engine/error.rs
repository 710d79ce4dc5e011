use super::config::ConfigError;
use crate::core::models::ModelError;
use crate::core::solver::SolveError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid input data: {0}")]
    Model(#[from] ModelError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "Pathway '{pathway}' references {} gene(s) absent from the fold-change matrix: {}",
        .genes.len(),
        .genes.join(", ")
    )]
    MissingGene { pathway: String, genes: Vec<String> },

    #[error("Pathway '{pathway}' has no genes")]
    EmptyPathway { pathway: String },

    #[error("Linear system of pathway '{pathway}'{} could not be solved: {source}", sample_suffix(.sample))]
    SingularSystem {
        pathway: String,
        sample: Option<String>,
        source: SolveError,
    },
}

fn sample_suffix(sample: &Option<String>) -> String {
    match sample {
        Some(sample) => format!(" (sample '{sample}')"),
        None => String::new(),
    }
}
