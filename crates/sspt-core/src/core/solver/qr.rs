use super::{
    Factorization, LinearSolver, SolveError, check_pivots, check_rhs, ensure_finite,
    ensure_square,
};
use nalgebra::linalg::ColPivQR;
use nalgebra::{DMatrix, DVector, Dyn};

/// Column-pivoting Householder QR.
///
/// Pivoting moves the dominant remaining entry onto the diagonal at every step, so
/// the spread of the diagonal of `R` reveals how close the matrix is to singular.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColPivQrSolver {
    tolerance: Option<f64>,
}

impl ColPivQrSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `tolerance` as the relative pivot threshold instead of `order * f64::EPSILON`.
    pub fn with_tolerance(tolerance: impl Into<Option<f64>>) -> Self {
        Self {
            tolerance: tolerance.into(),
        }
    }
}

#[derive(Debug)]
pub struct QrFactorization {
    qr: ColPivQR<f64, Dyn, Dyn>,
    order: usize,
}

impl LinearSolver for ColPivQrSolver {
    type Factorization = QrFactorization;

    fn name(&self) -> &'static str {
        "col-piv-qr"
    }

    fn factorize(&self, matrix: &DMatrix<f64>) -> Result<QrFactorization, SolveError> {
        let order = ensure_square(matrix)?;
        let qr = matrix.clone().col_piv_qr();
        check_pivots(qr.r().diagonal().iter().copied(), order, self.tolerance)?;
        Ok(QrFactorization { qr, order })
    }
}

impl Factorization for QrFactorization {
    fn order(&self) -> usize {
        self.order
    }

    fn solve(&self, rhs: &DVector<f64>) -> Result<DVector<f64>, SolveError> {
        check_rhs(self.order, rhs)?;
        let solution = self.qr.solve(rhs).ok_or(SolveError::NotInvertible)?;
        ensure_finite(solution)
    }
}
