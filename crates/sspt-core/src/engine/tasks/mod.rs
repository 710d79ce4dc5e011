//! Computational units of one scoring invocation.
//!
//! [`alignment`] resolves every pathway against the fold-change matrix up front;
//! [`perturbation`] then factorizes each pathway once and scores all samples against it.

pub mod alignment;
pub mod perturbation;
