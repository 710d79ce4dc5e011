use crate::core::models::expression::FoldChangeMatrix;
use crate::engine::config::{PermutationScheme, PermuteConfig};
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument};

/// Generates a permuted copy of `matrix` for building empirical null distributions.
///
/// The result keeps the gene and sample labels of the input; only values move. With a
/// seed in `config` the output is reproducible, otherwise the generator is seeded from
/// system entropy.
#[instrument(skip_all, name = "permutation_workflow", fields(scheme = %config.scheme))]
pub fn run(matrix: &FoldChangeMatrix, config: &PermuteConfig) -> FoldChangeMatrix {
    info!(
        genes = matrix.n_genes(),
        samples = matrix.n_samples(),
        seed = ?config.seed,
        "Permuting expression matrix."
    );
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    permute_with(matrix, config.scheme, &mut rng)
}

/// Permutes `matrix` with a caller-supplied random number generator.
pub fn permute_with<R>(
    matrix: &FoldChangeMatrix,
    scheme: PermutationScheme,
    rng: &mut R,
) -> FoldChangeMatrix
where
    R: Rng + ?Sized,
{
    let n_genes = matrix.n_genes();
    if n_genes == 0 {
        return matrix.clone();
    }

    let values = match scheme {
        PermutationScheme::WithinSample => {
            let mut values = matrix.values().clone();
            // Storage is column-major, so each chunk is one sample.
            for column in values.as_mut_slice().chunks_mut(n_genes) {
                column.shuffle(rng);
            }
            values
        }
        PermutationScheme::GeneLabels => {
            let mut order: Vec<usize> = (0..n_genes).collect();
            order.shuffle(rng);
            debug!(?order, "Drew gene permutation.");
            matrix.values().select_rows(order.iter())
        }
    };
    matrix.with_values(values)
}
