//! Linear solvers for the propagated-perturbation system.
//!
//! For a pathway with interaction matrix `X` and aligned fold-changes `fc`, the
//! propagated perturbation `pf` is the solution of `X · pf = -fc`. The accumulated
//! perturbation of each gene is `pf - fc`, and the pathway score for a sample is the
//! sum of that vector.
//!
//! Solving is split into two steps behind the [`LinearSolver`] and [`Factorization`]
//! traits: a pathway's matrix is factorized once, then the factorization is reused
//! for every sample. Two interchangeable strategies are provided:
//!
//! - [`qr::ColPivQrSolver`] - column-pivoting Householder QR
//! - [`lu::LuSolver`] - LU with partial pivoting
//!
//! Both detect singular systems from the magnitude of their pivots instead of
//! returning meaningless values, and neither forms an explicit inverse.

pub mod lu;
pub mod qr;

use nalgebra::{DMatrix, DVector};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolveError {
    #[error("Cannot factorize an empty system")]
    EmptySystem,

    #[error("Interaction matrix must be square, found {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Right-hand side has length {found} but the system has order {order}")]
    DimensionMismatch { order: usize, found: usize },

    #[error(
        "Matrix is numerically singular: smallest pivot magnitude {smallest:e} vs largest {largest:e}"
    )]
    Singular { smallest: f64, largest: f64 },

    #[error("Decomposition reports the matrix as not invertible")]
    NotInvertible,

    #[error("Solution contains a non-finite value at position {0}")]
    NonFinite(usize),
}

/// A solve strategy that factorizes a square interaction matrix.
pub trait LinearSolver: Send + Sync {
    type Factorization: Factorization;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Factorizes `matrix` and checks it for numerical singularity.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Singular`] if the pivots show the matrix to be singular at
    /// the solver's tolerance, and [`SolveError::NotSquare`] or
    /// [`SolveError::EmptySystem`] for malformed input.
    fn factorize(&self, matrix: &DMatrix<f64>) -> Result<Self::Factorization, SolveError>;
}

/// A factorized system that can be solved for any number of right-hand sides.
pub trait Factorization: Send + Sync {
    /// Order of the factorized system.
    fn order(&self) -> usize;

    /// Solves the factorized system for `rhs`.
    fn solve(&self, rhs: &DVector<f64>) -> Result<DVector<f64>, SolveError>;
}

/// Propagated and accumulated perturbation of one pathway in one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Perturbation {
    /// Equilibrium perturbation `pf` solving `X · pf = -fc`.
    pub propagated: DVector<f64>,
    /// Per-gene accumulation `pf - fc`.
    pub accumulation: DVector<f64>,
}

impl Perturbation {
    /// Net accumulated perturbation, the pathway score for the sample.
    pub fn total_accumulation(&self) -> f64 {
        self.accumulation.sum()
    }
}

/// Computes the perturbation of a factorized pathway for one fold-change vector.
///
/// `fold_changes` must be aligned to the row/column order of the factorized matrix.
pub fn perturbation<F>(system: &F, fold_changes: &DVector<f64>) -> Result<Perturbation, SolveError>
where
    F: Factorization + ?Sized,
{
    let rhs = fold_changes.map(|fc| -fc);
    let propagated = system.solve(&rhs)?;
    let accumulation = &propagated - fold_changes;
    Ok(Perturbation {
        propagated,
        accumulation,
    })
}

pub(crate) fn ensure_square(matrix: &DMatrix<f64>) -> Result<usize, SolveError> {
    if !matrix.is_square() {
        return Err(SolveError::NotSquare {
            rows: matrix.nrows(),
            cols: matrix.ncols(),
        });
    }
    if matrix.nrows() == 0 {
        return Err(SolveError::EmptySystem);
    }
    Ok(matrix.nrows())
}

/// Rejects a factorization whose pivots span a range the tolerance deems singular.
///
/// The default relative tolerance is `order * f64::EPSILON`.
pub(crate) fn check_pivots(
    pivots: impl Iterator<Item = f64>,
    order: usize,
    tolerance: Option<f64>,
) -> Result<(), SolveError> {
    let (smallest, largest) = pivots
        .map(f64::abs)
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), p| (lo.min(p), hi.max(p)));
    let relative = tolerance.unwrap_or(order as f64 * f64::EPSILON);
    if largest == 0.0 || !(smallest > relative * largest) {
        return Err(SolveError::Singular { smallest, largest });
    }
    Ok(())
}

pub(crate) fn check_rhs(order: usize, rhs: &DVector<f64>) -> Result<(), SolveError> {
    if rhs.len() != order {
        return Err(SolveError::DimensionMismatch {
            order,
            found: rhs.len(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_finite(solution: DVector<f64>) -> Result<DVector<f64>, SolveError> {
    match solution.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(SolveError::NonFinite(i)),
        None => Ok(solution),
    }
}
