//! # Workflows Module
//!
//! Top-level entry points of the library.
//!
//! - **Scoring** ([`score`]) - Pathway × sample perturbation scores from a pathway
//!   collection and a fold-change matrix.
//! - **Permutation** ([`permute`]) - Seeded null matrices with the shape and labels of an
//!   input expression matrix.

pub mod permute;
pub mod score;
