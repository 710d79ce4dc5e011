use super::{
    Factorization, LinearSolver, SolveError, check_pivots, check_rhs, ensure_finite,
    ensure_square,
};
use nalgebra::linalg::LU;
use nalgebra::{DMatrix, DVector, Dyn};

/// LU decomposition with partial (row) pivoting, the general direct solve.
///
/// Cheaper than [`ColPivQrSolver`](super::qr::ColPivQrSolver) but not rank-revealing;
/// the diagonal of `U` is still a reliable singularity signal for the well-scaled
/// interaction matrices this crate deals with.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LuSolver {
    tolerance: Option<f64>,
}

impl LuSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(tolerance: impl Into<Option<f64>>) -> Self {
        Self {
            tolerance: tolerance.into(),
        }
    }
}

#[derive(Debug)]
pub struct LuFactorization {
    lu: LU<f64, Dyn, Dyn>,
    order: usize,
}

impl LinearSolver for LuSolver {
    type Factorization = LuFactorization;

    fn name(&self) -> &'static str {
        "lu"
    }

    fn factorize(&self, matrix: &DMatrix<f64>) -> Result<LuFactorization, SolveError> {
        let order = ensure_square(matrix)?;
        let lu = matrix.clone().lu();
        check_pivots(lu.u().diagonal().iter().copied(), order, self.tolerance)?;
        Ok(LuFactorization { lu, order })
    }
}

impl Factorization for LuFactorization {
    fn order(&self) -> usize {
        self.order
    }

    fn solve(&self, rhs: &DVector<f64>) -> Result<DVector<f64>, SolveError> {
        check_rhs(self.order, rhs)?;
        let solution = self.lu.solve(rhs).ok_or(SolveError::NotInvertible)?;
        ensure_finite(solution)
    }
}
