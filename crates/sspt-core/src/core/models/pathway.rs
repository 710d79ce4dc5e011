use super::labels::{ensure_count, ensure_finite, ensure_unique};
use super::{Axis, ModelError};
use nalgebra::DMatrix;
use std::collections::HashMap;

/// A square, signed gene-gene interaction matrix for a single pathway.
///
/// Rows and columns share one ordered list of gene identifiers. Entries encode the
/// interaction strength between genes (activation or inhibition weights), with the
/// self term on the diagonal. The gene list defines the pathway's membership and the
/// order every aligned fold-change vector must follow.
#[derive(Debug, Clone, PartialEq)]
pub struct PathwayMatrix {
    genes: Vec<String>,
    interactions: DMatrix<f64>,
}

impl PathwayMatrix {
    /// Creates an interaction matrix whose rows and columns are both labeled by `genes`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if `interactions` is not square, the gene count differs
    /// from its dimension, a gene is listed twice, or any entry is not finite.
    pub fn new(genes: Vec<String>, interactions: DMatrix<f64>) -> Result<Self, ModelError> {
        if !interactions.is_square() {
            return Err(ModelError::NotSquare {
                rows: interactions.nrows(),
                cols: interactions.ncols(),
            });
        }
        ensure_count(&genes, Axis::Row, interactions.nrows())?;
        ensure_unique(&genes, Axis::Row)?;
        ensure_finite(&interactions, &genes, &genes)?;
        Ok(Self {
            genes,
            interactions,
        })
    }

    /// Creates an interaction matrix from separately supplied row and column labels.
    ///
    /// Tabular sources carry both axes explicitly. They must list the same genes in
    /// the same order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::AxisOrderMismatch`] at the first position where the axes
    /// disagree, plus any error of [`PathwayMatrix::new`].
    pub fn with_axes(
        row_genes: Vec<String>,
        column_genes: Vec<String>,
        interactions: DMatrix<f64>,
    ) -> Result<Self, ModelError> {
        ensure_count(&column_genes, Axis::Column, row_genes.len())?;
        if let Some((position, (row, column))) = row_genes
            .iter()
            .zip(column_genes.iter())
            .enumerate()
            .find(|(_, (row, column))| row != column)
        {
            return Err(ModelError::AxisOrderMismatch {
                position,
                row: row.clone(),
                column: column.clone(),
            });
        }
        Self::new(row_genes, interactions)
    }

    /// Creates an interaction matrix from values laid out row by row.
    pub fn from_row_slice(genes: Vec<String>, data: &[f64]) -> Result<Self, ModelError> {
        let k = genes.len();
        if data.len() != k * k {
            return Err(ModelError::ValueCountMismatch {
                expected: k * k,
                found: data.len(),
            });
        }
        Self::new(genes, DMatrix::from_row_slice(k, k, data))
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn interactions(&self) -> &DMatrix<f64> {
        &self.interactions
    }

    /// Number of member genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

/// An ordered, name-keyed collection of pathway interaction matrices.
///
/// Iteration follows insertion order, which is also the row order of every
/// [`ScoreTable`](super::scores::ScoreTable) computed from the collection.
#[derive(Debug, Clone, Default)]
pub struct PathwayCollection {
    entries: Vec<(String, PathwayMatrix)>,
    index: HashMap<String, usize>,
}

impl PathwayCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from `(name, matrix)` pairs, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicatePathway`] if a name appears twice.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (S, PathwayMatrix)>,
        S: Into<String>,
    {
        let mut collection = Self::new();
        for (name, matrix) in entries {
            collection.insert(name, matrix)?;
        }
        Ok(collection)
    }

    /// Appends a pathway at the end of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicatePathway`] if `name` is already present; the
    /// collection is left unchanged.
    pub fn insert(&mut self, name: impl Into<String>, matrix: PathwayMatrix) -> Result<(), ModelError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(ModelError::DuplicatePathway(name));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, matrix));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PathwayMatrix> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathwayMatrix)> + '_ {
        self.entries
            .iter()
            .map(|(name, matrix)| (name.as_str(), matrix))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
