use super::labels::{ensure_count, ensure_finite, ensure_unique};
use super::{Axis, ModelError};
use nalgebra::DMatrix;

/// A genes × samples matrix of expression fold-changes.
///
/// Row labels are the universe of expressed genes visible to the scoring engine and
/// column labels identify the samples. Both label lists are unique, and every value is
/// finite. The matrix is immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldChangeMatrix {
    genes: Vec<String>,
    samples: Vec<String>,
    values: DMatrix<f64>,
}

impl FoldChangeMatrix {
    /// Creates a fold-change matrix from its labels and values.
    ///
    /// # Arguments
    ///
    /// * `genes` - Unique gene identifiers, one per row of `values`.
    /// * `samples` - Unique sample identifiers, one per column of `values`.
    /// * `values` - The dense fold-change values.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the label counts disagree with the matrix shape, a
    /// label is repeated on either axis, or any value is NaN or infinite.
    pub fn new(
        genes: Vec<String>,
        samples: Vec<String>,
        values: DMatrix<f64>,
    ) -> Result<Self, ModelError> {
        ensure_count(&genes, Axis::Row, values.nrows())?;
        ensure_count(&samples, Axis::Column, values.ncols())?;
        ensure_unique(&genes, Axis::Row)?;
        ensure_unique(&samples, Axis::Column)?;
        ensure_finite(&values, &genes, &samples)?;
        Ok(Self {
            genes,
            samples,
            values,
        })
    }

    /// Creates a fold-change matrix from values laid out row by row (one gene per row).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ValueCountMismatch`] if `data` does not hold exactly
    /// `genes.len() * samples.len()` values, plus any error of [`FoldChangeMatrix::new`].
    pub fn from_row_slice(
        genes: Vec<String>,
        samples: Vec<String>,
        data: &[f64],
    ) -> Result<Self, ModelError> {
        let expected = genes.len() * samples.len();
        if data.len() != expected {
            return Err(ModelError::ValueCountMismatch {
                expected,
                found: data.len(),
            });
        }
        let values = DMatrix::from_row_slice(genes.len(), samples.len(), data);
        Self::new(genes, samples, values)
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn values(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn n_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Returns the named per-sample fold-change vector as `(gene, value)` pairs in row order.
    ///
    /// Returns `None` if `sample` is not a column of this matrix.
    pub fn sample_values(&self, sample: &str) -> Option<impl Iterator<Item = (&str, f64)> + '_> {
        let j = self.samples.iter().position(|s| s == sample)?;
        Some(
            self.genes
                .iter()
                .enumerate()
                .map(move |(i, gene)| (gene.as_str(), self.values[(i, j)])),
        )
    }

    /// Returns a matrix with the same labels and new values of identical shape.
    ///
    /// Values must already satisfy the finiteness invariant; callers only rearrange
    /// existing entries.
    pub(crate) fn with_values(&self, values: DMatrix<f64>) -> Self {
        debug_assert_eq!(values.shape(), self.values.shape());
        Self {
            genes: self.genes.clone(),
            samples: self.samples.clone(),
            values,
        }
    }

    /// Consumes the matrix, returning its labels and values.
    pub fn into_parts(self) -> (Vec<String>, Vec<String>, DMatrix<f64>) {
        (self.genes, self.samples, self.values)
    }
}
