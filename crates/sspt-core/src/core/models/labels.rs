use super::{Axis, ModelError};
use itertools::Itertools;
use nalgebra::DMatrix;

pub(crate) fn ensure_count(labels: &[String], axis: Axis, expected: usize) -> Result<(), ModelError> {
    if labels.len() != expected {
        return Err(ModelError::LabelCountMismatch {
            axis,
            expected,
            found: labels.len(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_unique(labels: &[String], axis: Axis) -> Result<(), ModelError> {
    match labels.iter().duplicates().next() {
        Some(label) => Err(ModelError::DuplicateLabel {
            axis,
            label: label.clone(),
        }),
        None => Ok(()),
    }
}

pub(crate) fn ensure_finite(
    values: &DMatrix<f64>,
    rows: &[String],
    columns: &[String],
) -> Result<(), ModelError> {
    // Column-major walk matches the storage order of `DMatrix`.
    for (j, column) in values.column_iter().enumerate() {
        if let Some((i, &value)) = column.iter().find_position(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteValue {
                row: rows[i].clone(),
                column: columns[j].clone(),
                value,
            });
        }
    }
    Ok(())
}
