//! # Engine Module
//!
//! The scoring engine: validated configuration, per-invocation context, the error
//! type of the public API, progress events, and the two computational tasks that
//! every scoring run goes through.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Solver backend, pivot tolerance, singular-system policy
//!   and permutation settings
//! - **Error Handling** ([`error`]) - [`error::EngineError`] wrapping the lower-layer errors
//!   with pathway and sample names
//! - **Progress Monitoring** ([`progress`]) - Callback-based phase and task events
//! - **State** ([`state`]) - Per-pathway outcomes and recorded failures
//! - **Tasks** - Gene alignment of all pathways, then parallel perturbation scoring

pub mod config;
pub(crate) mod context;
pub mod error;
pub mod progress;
pub mod state;
pub(crate) mod tasks;
