use crate::core::models::expression::FoldChangeMatrix;
use crate::core::models::pathway::PathwayCollection;
use crate::core::models::scores::ScoreTable;
use crate::engine::config::{ScoringConfig, SingularPolicy};
use crate::engine::context::ScoringContext;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::PathwayFailure;
use crate::engine::tasks;
use tracing::{info, instrument, warn};

/// Scores of one invocation together with the pathways that could not be solved.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringResult {
    pub table: ScoreTable,
    /// Failures in pathway order; each affected cell of `table` holds `NaN`.
    pub failures: Vec<PathwayFailure>,
}

impl ScoringResult {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Scores every pathway of `pathways` for every sample of `fold_changes`.
///
/// All pathways are aligned to the fold-change rows before any system is solved, so a
/// missing gene or an empty pathway fails the invocation without partial results.
/// Singular systems are handled according to [`ScoringConfig::on_singular`].
///
/// # Errors
///
/// - [`EngineError::Config`] if `config` holds an invalid tolerance.
/// - [`EngineError::EmptyPathway`] / [`EngineError::MissingGene`] from alignment.
/// - [`EngineError::SingularSystem`] for the first failed pathway, only under
///   [`SingularPolicy::Abort`].
#[instrument(skip_all, name = "scoring_workflow")]
pub fn run(
    pathways: &PathwayCollection,
    fold_changes: &FoldChangeMatrix,
    config: &ScoringConfig,
    reporter: &ProgressReporter,
) -> Result<ScoringResult, EngineError> {
    config.validate()?;
    info!(
        pathways = pathways.len(),
        genes = fold_changes.n_genes(),
        samples = fold_changes.n_samples(),
        backend = %config.solver.backend,
        "Starting pathway perturbation scoring."
    );

    let context = ScoringContext::new(pathways, fold_changes, config, reporter);
    let aligned = tasks::alignment::run(&context)?;

    let outcomes = tasks::perturbation::run(&context, &aligned);

    let mut rows = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for outcome in outcomes {
        rows.push(outcome.scores);
        failures.extend(outcome.failures);
    }

    if config.on_singular == SingularPolicy::Abort {
        if let Some(first) = failures.first() {
            return Err(first.clone().into());
        }
    }

    for failure in &failures {
        reporter.report(Progress::PathwayFailed {
            pathway: failure.pathway.clone(),
            reason: EngineError::from(failure.clone()).to_string(),
        });
    }

    let table = ScoreTable::from_rows(
        pathways.names().map(str::to_string).collect(),
        fold_changes.samples().to_vec(),
        &rows,
    )?;

    if failures.is_empty() {
        info!("Scoring complete for all pathways.");
    } else {
        warn!(
            failed = failures.len(),
            "Scoring complete; some systems could not be solved."
        );
    }
    Ok(ScoringResult { table, failures })
}

/// Scores `pathways` against `fold_changes` with the default configuration.
///
/// Pathways with a singular system are reported as `NaN` rows.
pub fn score_pathways(
    pathways: &PathwayCollection,
    fold_changes: &FoldChangeMatrix,
) -> Result<ScoreTable, EngineError> {
    let reporter = ProgressReporter::new();
    run(pathways, fold_changes, &ScoringConfig::default(), &reporter).map(|result| result.table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::pathway::PathwayMatrix;
    use crate::core::solver::SolveError;
    use crate::engine::config::{ScoringConfigBuilder, SolverBackend};
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use std::sync::{Arc, Mutex};

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn golden_pathway() -> PathwayMatrix {
        PathwayMatrix::from_row_slice(labels(&["a", "b"]), &[-1.0, 0.5, 0.3, -1.0]).unwrap()
    }

    fn chain_pathway() -> PathwayMatrix {
        PathwayMatrix::from_row_slice(
            labels(&["c", "a", "d"]),
            &[-1.0, 0.2, 0.0, 0.0, -1.0, 0.4, 0.1, 0.0, -1.0],
        )
        .unwrap()
    }

    fn fold_changes() -> FoldChangeMatrix {
        FoldChangeMatrix::from_row_slice(
            labels(&["a", "b", "c", "d"]),
            labels(&["s1", "s2", "s3"]),
            &[
                1.0, 0.5, -2.0, //
                -1.0, 0.0, 1.5, //
                0.3, -0.7, 0.0, //
                2.0, 1.0, -1.0,
            ],
        )
        .unwrap()
    }

    fn collection(entries: Vec<(&str, PathwayMatrix)>) -> PathwayCollection {
        PathwayCollection::from_entries(entries).unwrap()
    }

    #[test]
    fn golden_value_matches_closed_form() {
        let pathways = collection(vec![("golden", golden_pathway())]);
        let table = score_pathways(&pathways, &fold_changes()).unwrap();
        assert_relative_eq!(table.get("golden", "s1").unwrap(), -4.0 / 17.0, epsilon = 1e-12);
    }

    #[test]
    fn table_mirrors_collection_and_sample_order() {
        let pathways = collection(vec![("zeta", chain_pathway()), ("alpha", golden_pathway())]);
        let table = score_pathways(&pathways, &fold_changes()).unwrap();
        assert_eq!(table.pathways(), &["zeta".to_string(), "alpha".to_string()]);
        assert_eq!(table.samples(), fold_changes().samples());
        assert_eq!(table.scores().shape(), (2, 3));
    }

    #[test]
    fn permuting_fold_change_rows_leaves_scores_unchanged() {
        let pathways = collection(vec![("chain", chain_pathway()), ("golden", golden_pathway())]);
        let original = fold_changes();
        let order = [3usize, 1, 0, 2];
        let (genes, samples, values) = original.clone().into_parts();
        let permuted = FoldChangeMatrix::new(
            order.iter().map(|&i| genes[i].clone()).collect(),
            samples,
            values.select_rows(order.iter()),
        )
        .unwrap();

        let a = score_pathways(&pathways, &original).unwrap();
        let b = score_pathways(&pathways, &permuted).unwrap();
        for (x, y) in a.scores().iter().zip(b.scores().iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn negative_identity_scores_zero() {
        let genes = labels(&["d", "b", "a"]);
        let identity = PathwayMatrix::new(genes, -DMatrix::<f64>::identity(3, 3)).unwrap();
        let pathways = collection(vec![("identity", identity)]);
        let table = score_pathways(&pathways, &fold_changes()).unwrap();
        for score in table.scores().iter() {
            assert_relative_eq!(*score, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn backends_agree() {
        let pathways = collection(vec![("chain", chain_pathway()), ("golden", golden_pathway())]);
        let fc = fold_changes();
        let reporter = ProgressReporter::new();
        let qr = run(&pathways, &fc, &ScoringConfig::default(), &reporter).unwrap();
        let lu_config = ScoringConfigBuilder::new()
            .backend(SolverBackend::Lu)
            .build()
            .unwrap();
        let lu = run(&pathways, &fc, &lu_config, &reporter).unwrap();
        for (x, y) in qr.table.scores().iter().zip(lu.table.scores().iter()) {
            assert_relative_eq!(*x, *y, max_relative = 1e-9);
        }
    }

    #[test]
    fn missing_gene_fails_without_partial_result() {
        let broken =
            PathwayMatrix::from_row_slice(labels(&["a", "zz"]), &[-1.0, 0.0, 0.0, -1.0]).unwrap();
        let pathways = collection(vec![("golden", golden_pathway()), ("broken", broken)]);
        let err = score_pathways(&pathways, &fold_changes()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::MissingGene { ref pathway, ref genes }
                if pathway == "broken" && genes == &["zz".to_string()]
        ));
    }

    #[test]
    fn empty_pathway_is_rejected() {
        let empty = PathwayMatrix::from_row_slice(Vec::new(), &[]).unwrap();
        let pathways = collection(vec![("golden", golden_pathway()), ("empty", empty)]);
        let err = score_pathways(&pathways, &fold_changes()).unwrap_err();
        assert!(matches!(err, EngineError::EmptyPathway { ref pathway } if pathway == "empty"));
    }

    #[test]
    fn singular_pathway_is_isolated() {
        let dead = PathwayMatrix::from_row_slice(labels(&["b", "c"]), &[0.0; 4]).unwrap();
        let pathways = collection(vec![
            ("golden", golden_pathway()),
            ("dead", dead),
            ("chain", chain_pathway()),
        ]);
        let fc = fold_changes();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));

        let result = run(&pathways, &fc, &ScoringConfig::default(), &reporter).unwrap();
        assert!(!result.is_complete());
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].pathway, "dead");
        assert!(result.failures[0].affects_all_samples());
        assert!(
            result
                .table
                .pathway_scores("dead")
                .unwrap()
                .all(|(_, s)| s.is_nan())
        );
        assert_eq!(result.table.failed_pathways().collect::<Vec<_>>(), vec!["dead"]);

        let healthy = collection(vec![("golden", golden_pathway()), ("chain", chain_pathway())]);
        let alone = score_pathways(&healthy, &fc).unwrap();
        for sample in fc.samples() {
            for pathway in ["golden", "chain"] {
                assert_relative_eq!(
                    result.table.get(pathway, sample).unwrap(),
                    alone.get(pathway, sample).unwrap(),
                    epsilon = 1e-12
                );
            }
        }

        let failed_events = events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, Progress::PathwayFailed { pathway, .. } if pathway == "dead"))
            .count();
        assert_eq!(failed_events, 1);
    }

    #[test]
    fn abort_policy_returns_first_failure() {
        let dead = PathwayMatrix::from_row_slice(labels(&["b"]), &[0.0]).unwrap();
        let pathways = collection(vec![("golden", golden_pathway()), ("dead", dead)]);
        let config = ScoringConfigBuilder::new()
            .on_singular(SingularPolicy::Abort)
            .build()
            .unwrap();
        let err = run(&pathways, &fold_changes(), &config, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::SingularSystem { ref pathway, sample: None, .. } if pathway == "dead"
        ));
    }

    #[test]
    fn zero_samples_yield_empty_rows() {
        let fc =
            FoldChangeMatrix::new(labels(&["a", "b"]), Vec::new(), DMatrix::zeros(2, 0)).unwrap();
        let pathways = collection(vec![("golden", golden_pathway())]);
        let table = score_pathways(&pathways, &fc).unwrap();
        assert_eq!(table.scores().shape(), (1, 0));
        assert_eq!(table.pathways(), &["golden".to_string()]);
    }

    #[test]
    fn invalid_tolerance_is_rejected() {
        let mut config = ScoringConfig::default();
        config.solver.tolerance = Some(-1.0);
        let pathways = collection(vec![("golden", golden_pathway())]);
        let err = run(&pathways, &fold_changes(), &config, &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn overflowing_sample_is_isolated_to_its_cell() {
        let tiny = PathwayMatrix::from_row_slice(labels(&["t"]), &[1e-10]).unwrap();
        let pathways = collection(vec![("golden", golden_pathway()), ("tiny", tiny)]);
        let fc = FoldChangeMatrix::from_row_slice(
            labels(&["a", "b", "t"]),
            labels(&["s1", "s2"]),
            &[
                1.0, 0.5, //
                -1.0, 0.0, //
                1e300, 1e-5,
            ],
        )
        .unwrap();

        let result = run(&pathways, &fc, &ScoringConfig::default(), &ProgressReporter::new()).unwrap();

        assert_eq!(
            result.failures,
            vec![PathwayFailure {
                pathway: "tiny".to_string(),
                sample: Some("s1".to_string()),
                error: SolveError::NonFinite(0),
            }]
        );
        assert!(!result.failures[0].affects_all_samples());
        assert!(result.table.get("tiny", "s1").unwrap().is_nan());
        assert_relative_eq!(
            result.table.get("tiny", "s2").unwrap(),
            -100000.00001,
            max_relative = 1e-12
        );
        assert_eq!(result.table.failed_pathways().collect::<Vec<_>>(), vec!["tiny"]);

        let alone = score_pathways(&collection(vec![("golden", golden_pathway())]), &fc).unwrap();
        for sample in ["s1", "s2"] {
            assert_relative_eq!(
                result.table.get("golden", sample).unwrap(),
                alone.get("golden", sample).unwrap(),
                epsilon = 1e-12
            );
        }
        assert_relative_eq!(result.table.get("golden", "s1").unwrap(), -4.0 / 17.0, epsilon = 1e-12);
    }
}
