use super::config::ScoringConfig;
use super::progress::ProgressReporter;
use crate::core::alignment::GeneIndex;
use crate::core::models::expression::FoldChangeMatrix;
use crate::core::models::pathway::PathwayCollection;

/// Read-only inputs shared by every task of one scoring invocation.
#[derive(Clone, Copy)]
pub struct ScoringContext<'a> {
    pub pathways: &'a PathwayCollection,
    pub fold_changes: &'a FoldChangeMatrix,
    pub config: &'a ScoringConfig,
    pub reporter: &'a ProgressReporter<'a>,
}

impl<'a> ScoringContext<'a> {
    pub fn new(
        pathways: &'a PathwayCollection,
        fold_changes: &'a FoldChangeMatrix,
        config: &'a ScoringConfig,
        reporter: &'a ProgressReporter<'a>,
    ) -> Self {
        Self {
            pathways,
            fold_changes,
            config,
            reporter,
        }
    }

    /// Builds the gene index over the fold-change matrix rows.
    pub fn gene_index(&self) -> GeneIndex<'a> {
        GeneIndex::new(self.fold_changes.genes())
    }

    pub fn n_samples(&self) -> usize {
        self.fold_changes.n_samples()
    }
}
