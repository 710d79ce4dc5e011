//! # SSPT Core Library
//!
//! Single-sample pathway perturbation scoring. For every pathway, a signed gene-gene
//! interaction matrix `X` and a sample's fold-changes `fc` define the linear system
//! `X · pf = -fc`; the pathway score of the sample is the net accumulated perturbation
//! `sum(pf - fc)`.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Immutable data models (`FoldChangeMatrix`,
//!   `PathwayCollection`, `ScoreTable`), the gene-alignment index, the interchangeable
//!   linear-solver backends, and tab-separated file I/O.
//!
//! - **[`engine`]: The Logic Core.** Configuration, errors, progress reporting, and the
//!   alignment and perturbation tasks that a scoring run is composed of.
//!
//! - **[`workflows`]: The Public API.** [`workflows::score`] runs a full scoring
//!   invocation; [`workflows::permute`] generates permuted expression matrices.

pub mod core;
pub mod engine;
pub mod workflows;
