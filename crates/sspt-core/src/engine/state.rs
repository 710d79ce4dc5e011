use super::error::EngineError;
use crate::core::solver::SolveError;

/// A pathway, or one of its cells, whose linear system could not be solved.
#[derive(Debug, Clone, PartialEq)]
pub struct PathwayFailure {
    pub pathway: String,
    /// `None` when the factorization itself failed, so every sample is affected.
    pub sample: Option<String>,
    pub error: SolveError,
}

impl PathwayFailure {
    pub fn affects_all_samples(&self) -> bool {
        self.sample.is_none()
    }
}

impl From<PathwayFailure> for EngineError {
    fn from(failure: PathwayFailure) -> Self {
        EngineError::SingularSystem {
            pathway: failure.pathway,
            sample: failure.sample,
            source: failure.error,
        }
    }
}

/// Scores of one pathway across all samples, in sample order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PathwayOutcome {
    pub scores: Vec<f64>,
    pub failures: Vec<PathwayFailure>,
}

impl PathwayOutcome {
    pub fn failed(pathway: &str, n_samples: usize, error: SolveError) -> Self {
        Self {
            scores: vec![f64::NAN; n_samples],
            failures: vec![PathwayFailure {
                pathway: pathway.to_string(),
                sample: None,
                error,
            }],
        }
    }
}
