use super::labels::{ensure_count, ensure_unique};
use super::{Axis, ModelError};
use nalgebra::DMatrix;

/// Pathway × sample perturbation scores.
///
/// Rows follow the order of the [`PathwayCollection`](super::pathway::PathwayCollection)
/// that produced the table and columns follow the sample order of the
/// [`FoldChangeMatrix`](super::expression::FoldChangeMatrix). A pathway whose linear
/// system could not be solved holds `NaN` in the affected cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    pathways: Vec<String>,
    samples: Vec<String>,
    scores: DMatrix<f64>,
}

impl ScoreTable {
    /// Creates a score table; unlike the input containers, non-finite scores are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the label counts disagree with the shape of `scores`
    /// or a label is repeated.
    pub fn new(
        pathways: Vec<String>,
        samples: Vec<String>,
        scores: DMatrix<f64>,
    ) -> Result<Self, ModelError> {
        ensure_count(&pathways, Axis::Row, scores.nrows())?;
        ensure_count(&samples, Axis::Column, scores.ncols())?;
        ensure_unique(&pathways, Axis::Row)?;
        ensure_unique(&samples, Axis::Column)?;
        Ok(Self {
            pathways,
            samples,
            scores,
        })
    }

    /// Assembles a table from one score row per pathway.
    pub(crate) fn from_rows(
        pathways: Vec<String>,
        samples: Vec<String>,
        rows: &[Vec<f64>],
    ) -> Result<Self, ModelError> {
        ensure_count(&pathways, Axis::Row, rows.len())?;
        let n_samples = samples.len();
        if let Some(row) = rows.iter().find(|row| row.len() != n_samples) {
            return Err(ModelError::ValueCountMismatch {
                expected: n_samples,
                found: row.len(),
            });
        }
        let scores = DMatrix::from_fn(rows.len(), n_samples, |i, j| rows[i][j]);
        Self::new(pathways, samples, scores)
    }

    pub fn pathways(&self) -> &[String] {
        &self.pathways
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn scores(&self) -> &DMatrix<f64> {
        &self.scores
    }

    /// Looks up a single score by pathway and sample name.
    pub fn get(&self, pathway: &str, sample: &str) -> Option<f64> {
        let i = self.pathways.iter().position(|p| p == pathway)?;
        let j = self.samples.iter().position(|s| s == sample)?;
        Some(self.scores[(i, j)])
    }

    /// Returns the scores of one pathway as `(sample, score)` pairs in sample order.
    pub fn pathway_scores(
        &self,
        pathway: &str,
    ) -> Option<impl Iterator<Item = (&str, f64)> + '_> {
        let i = self.pathways.iter().position(|p| p == pathway)?;
        Some(
            self.samples
                .iter()
                .enumerate()
                .map(move |(j, sample)| (sample.as_str(), self.scores[(i, j)])),
        )
    }

    /// Names of pathways with at least one non-finite score.
    pub fn failed_pathways(&self) -> impl Iterator<Item = &str> + '_ {
        self.pathways
            .iter()
            .enumerate()
            .filter(|(i, _)| self.scores.row(*i).iter().any(|v| !v.is_finite()))
            .map(|(_, name)| name.as_str())
    }
}
