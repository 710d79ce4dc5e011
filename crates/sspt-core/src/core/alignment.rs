//! Gene alignment between pathway matrices and the expression universe.
//!
//! Pathway matrices and the fold-change matrix are ordered independently, so the only
//! reliable correspondence between them is the gene identifier. [`GeneIndex`] turns
//! that identifier match into explicit row positions once, and every sample of a
//! pathway reuses the same positions.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignmentError {
    /// One or more pathway genes are not rows of the fold-change matrix.
    ///
    /// Carries every missing gene, in pathway order.
    #[error("{} gene(s) not present among expressed genes: {}", .0.len(), .0.join(", "))]
    MissingGenes(Vec<String>),
}

/// Lookup from gene identifier to its row position in the expressed-gene universe.
#[derive(Debug, Clone)]
pub struct GeneIndex<'a> {
    positions: HashMap<&'a str, usize>,
}

impl<'a> GeneIndex<'a> {
    /// Builds the index over the expressed genes, in row order.
    ///
    /// Gene identifiers are expected to be unique, as guaranteed by
    /// [`FoldChangeMatrix`](crate::core::models::expression::FoldChangeMatrix).
    pub fn new(expressed_genes: &'a [String]) -> Self {
        let positions = expressed_genes
            .iter()
            .enumerate()
            .map(|(row, gene)| (gene.as_str(), row))
            .collect();
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, gene: &str) -> Option<usize> {
        self.positions.get(gene).copied()
    }

    /// Resolves the row position of every pathway gene, in pathway order.
    ///
    /// # Arguments
    ///
    /// * `pathway_genes` - The pathway's gene identifiers, in the row/column order of
    ///   its interaction matrix.
    ///
    /// # Return
    ///
    /// One position into the expressed-gene universe per pathway gene.
    ///
    /// # Errors
    ///
    /// Returns [`AlignmentError::MissingGenes`] listing every gene that is absent from
    /// the universe. Missing genes are never dropped or zero-filled, since that would
    /// break the dimensional agreement with the interaction matrix.
    pub fn align<S: AsRef<str>>(&self, pathway_genes: &[S]) -> Result<Vec<usize>, AlignmentError> {
        let mut positions = Vec::with_capacity(pathway_genes.len());
        let mut missing = Vec::new();
        for gene in pathway_genes {
            let gene = gene.as_ref();
            match self.position(gene) {
                Some(row) => positions.push(row),
                None => missing.push(gene.to_string()),
            }
        }
        if missing.is_empty() {
            Ok(positions)
        } else {
            Err(AlignmentError::MissingGenes(missing))
        }
    }
}
