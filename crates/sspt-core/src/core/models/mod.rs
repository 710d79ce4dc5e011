//! # Core Models Module
//!
//! This module contains the labeled numeric containers that every scoring operation
//! consumes or produces.
//!
//! ## Overview
//!
//! Expression data and pathway networks arrive from independent sources, each with
//! its own gene ordering. The models here keep the gene and sample identifiers next to
//! the dense values so that downstream code can align them by name rather than by
//! position. All containers validate their invariants on construction and are
//! immutable afterwards.
//!
//! ## Key Components
//!
//! - [`expression`] - Genes × samples fold-change matrix
//! - [`pathway`] - Square signed interaction matrices and the ordered pathway collection
//! - [`scores`] - Pathway × sample score table produced by the scoring workflow

pub mod expression;
mod labels;
pub mod pathway;
pub mod scores;

use std::fmt;
use thiserror::Error;

/// Identifies which axis of a labeled matrix an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => f.write_str("row"),
            Axis::Column => f.write_str("column"),
        }
    }
}

/// Errors raised when a labeled container is constructed from inconsistent parts.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Expected {expected} {axis} labels but found {found}")]
    LabelCountMismatch {
        axis: Axis,
        expected: usize,
        found: usize,
    },

    #[error("Duplicate {axis} label '{label}'")]
    DuplicateLabel { axis: Axis, label: String },

    #[error("Expected {expected} values but found {found}")]
    ValueCountMismatch { expected: usize, found: usize },

    #[error("Interaction matrix must be square, found {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error(
        "Row and column genes of an interaction matrix differ at position {position}: '{row}' vs '{column}'"
    )]
    AxisOrderMismatch {
        position: usize,
        row: String,
        column: String,
    },

    #[error("Non-finite value {value} at row '{row}', column '{column}'")]
    NonFiniteValue {
        row: String,
        column: String,
        value: f64,
    },

    #[error("Pathway '{0}' is already present in the collection")]
    DuplicatePathway(String),
}
