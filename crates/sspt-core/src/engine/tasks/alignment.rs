use crate::core::alignment::AlignmentError;
use crate::core::models::pathway::PathwayMatrix;
use crate::engine::context::ScoringContext;
use crate::engine::error::EngineError;
use tracing::{debug, info, instrument};

/// A pathway together with the fold-change rows of its genes, in matrix order.
#[derive(Debug)]
pub struct AlignedPathway<'a> {
    pub name: &'a str,
    pub matrix: &'a PathwayMatrix,
    pub rows: Vec<usize>,
}

/// Resolves the fold-change rows of every pathway before any system is solved.
///
/// Alignment depends only on the pathway, so it runs once per pathway and every
/// sample reuses the result. Any inconsistency between pathway definitions and the
/// fold-change matrix stops the whole invocation.
#[instrument(skip_all, name = "alignment_task")]
pub fn run<'a>(context: &ScoringContext<'a>) -> Result<Vec<AlignedPathway<'a>>, EngineError> {
    let _phase = context.reporter.phase("Aligning genes");
    let index = context.gene_index();
    info!(
        pathways = context.pathways.len(),
        expressed_genes = index.len(),
        "Aligning pathway genes to the fold-change matrix."
    );

    let mut aligned = Vec::with_capacity(context.pathways.len());
    for (name, matrix) in context.pathways.iter() {
        if matrix.is_empty() {
            return Err(EngineError::EmptyPathway {
                pathway: name.to_string(),
            });
        }
        let rows = index.align(matrix.genes()).map_err(|e| match e {
            AlignmentError::MissingGenes(genes) => EngineError::MissingGene {
                pathway: name.to_string(),
                genes,
            },
        })?;
        debug!(pathway = name, genes = rows.len(), "Pathway aligned.");
        aligned.push(AlignedPathway { name, matrix, rows });
    }
    Ok(aligned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::expression::FoldChangeMatrix;
    use crate::core::models::pathway::PathwayCollection;
    use crate::engine::config::ScoringConfig;
    use crate::engine::progress::ProgressReporter;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn fold_changes() -> FoldChangeMatrix {
        FoldChangeMatrix::from_row_slice(
            labels(&["g1", "g2", "g3"]),
            labels(&["s1"]),
            &[0.1, 0.2, 0.3],
        )
        .unwrap()
    }

    fn pathway(genes: &[&str]) -> PathwayMatrix {
        let k = genes.len();
        PathwayMatrix::from_row_slice(labels(genes), &vec![0.0; k * k]).unwrap()
    }

    #[test]
    fn aligns_each_pathway_in_collection_order() {
        let pathways = PathwayCollection::from_entries(vec![
            ("late", pathway(&["g3", "g1"])),
            ("early", pathway(&["g2"])),
        ])
        .unwrap();
        let fc = fold_changes();
        let config = ScoringConfig::default();
        let reporter = ProgressReporter::new();
        let context = ScoringContext::new(&pathways, &fc, &config, &reporter);

        let aligned = run(&context).unwrap();
        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned[0].name, "late");
        assert_eq!(aligned[0].rows, vec![2, 0]);
        assert_eq!(aligned[1].name, "early");
        assert_eq!(aligned[1].rows, vec![1]);
    }

    #[test]
    fn missing_gene_stops_alignment() {
        let pathways = PathwayCollection::from_entries(vec![
            ("ok", pathway(&["g1"])),
            ("broken", pathway(&["g2", "gX"])),
        ])
        .unwrap();
        let fc = fold_changes();
        let config = ScoringConfig::default();
        let reporter = ProgressReporter::new();
        let context = ScoringContext::new(&pathways, &fc, &config, &reporter);

        let err = run(&context).unwrap_err();
        match err {
            EngineError::MissingGene { pathway, genes } => {
                assert_eq!(pathway, "broken");
                assert_eq!(genes, vec!["gX".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_pathway_is_rejected() {
        let pathways = PathwayCollection::from_entries(vec![("void", pathway(&[]))]).unwrap();
        let fc = fold_changes();
        let config = ScoringConfig::default();
        let reporter = ProgressReporter::new();
        let context = ScoringContext::new(&pathways, &fc, &config, &reporter);

        assert!(matches!(
            run(&context),
            Err(EngineError::EmptyPathway { ref pathway }) if pathway == "void"
        ));
    }
}
