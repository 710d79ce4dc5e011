use super::alignment::AlignedPathway;
use crate::core::solver::lu::LuSolver;
use crate::core::solver::qr::ColPivQrSolver;
use crate::core::solver::{self, Factorization, LinearSolver};
use crate::engine::config::SolverBackend;
use crate::engine::context::ScoringContext;
use crate::engine::progress::Progress;
use crate::engine::state::{PathwayFailure, PathwayOutcome};
use nalgebra::DMatrix;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Scores every aligned pathway against every sample with the configured solver.
///
/// Outcomes are returned in the order of `aligned`. A pathway whose system cannot be
/// factorized yields NaN for all of its samples; a single non-finite solve yields NaN
/// for that sample only. Neither affects other pathways.
pub fn run(context: &ScoringContext<'_>, aligned: &[AlignedPathway<'_>]) -> Vec<PathwayOutcome> {
    let settings = context.config.solver;
    match settings.backend {
        SolverBackend::ColPivQr => {
            score_all(context, aligned, &ColPivQrSolver::with_tolerance(settings.tolerance))
        }
        SolverBackend::Lu => {
            score_all(context, aligned, &LuSolver::with_tolerance(settings.tolerance))
        }
    }
}

#[instrument(skip_all, name = "perturbation_task", fields(solver = solver.name()))]
fn score_all<S>(
    context: &ScoringContext<'_>,
    aligned: &[AlignedPathway<'_>],
    solver: &S,
) -> Vec<PathwayOutcome>
where
    S: LinearSolver,
{
    let _phase = context.reporter.phase("Scoring pathways");
    info!(
        pathways = aligned.len(),
        samples = context.n_samples(),
        "Solving pathway perturbation systems."
    );

    context.reporter.report(Progress::TaskStart {
        total_steps: aligned.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = aligned.iter();

    #[cfg(feature = "parallel")]
    let iterator = aligned.par_iter();

    let outcomes: Vec<PathwayOutcome> = iterator
        .map(|pathway| {
            let outcome = score_pathway(context, pathway, solver);
            context.reporter.report(Progress::TaskIncrement);
            outcome
        })
        .collect();

    context.reporter.report(Progress::TaskFinish);
    outcomes
}

fn score_pathway<S>(
    context: &ScoringContext<'_>,
    pathway: &AlignedPathway<'_>,
    solver: &S,
) -> PathwayOutcome
where
    S: LinearSolver,
{
    let samples = context.fold_changes.samples();

    let factorization = match solver.factorize(pathway.matrix.interactions()) {
        Ok(factorization) => factorization,
        Err(error) => {
            warn!(pathway = pathway.name, %error, "Pathway system could not be factorized.");
            return PathwayOutcome::failed(pathway.name, samples.len(), error);
        }
    };

    let subset: DMatrix<f64> = context
        .fold_changes
        .values()
        .select_rows(pathway.rows.iter());

    let mut scores = Vec::with_capacity(samples.len());
    let mut failures = Vec::new();
    for (column, sample) in subset.column_iter().zip(samples) {
        let fold_changes = column.into_owned();
        match solver::perturbation(&factorization, &fold_changes) {
            Ok(perturbation) => scores.push(perturbation.total_accumulation()),
            Err(error) => {
                warn!(pathway = pathway.name, sample = %sample, %error, "Sample solve failed.");
                scores.push(f64::NAN);
                failures.push(PathwayFailure {
                    pathway: pathway.name.to_string(),
                    sample: Some(sample.clone()),
                    error,
                });
            }
        }
    }

    debug!(
        pathway = pathway.name,
        order = factorization.order(),
        failed_samples = failures.len(),
        "Pathway scored."
    );
    PathwayOutcome { scores, failures }
}
