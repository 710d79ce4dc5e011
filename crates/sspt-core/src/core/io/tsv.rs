use super::traits::TabularFile;
use crate::core::models::ModelError;
use crate::core::models::expression::FoldChangeMatrix;
use crate::core::models::pathway::{PathwayCollection, PathwayMatrix};
use crate::core::models::scores::ScoreTable;
use nalgebra::DMatrix;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Token written in place of a non-finite score, and read back as `NaN`.
pub const DEFAULT_MISSING_VALUE: &str = "NA";

const PATHWAY_FILE_EXTENSIONS: [&str; 2] = ["tsv", "txt"];

#[derive(Debug, Error)]
pub enum TsvError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed delimited data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input is empty; a header row is required")]
    MissingHeader,

    #[error("Line {line} has {found} fields but the header has {expected}")]
    Ragged {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("In '{path}': {source}", path = path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<TsvError>,
    },
}

impl TsvError {
    fn in_file(path: &Path, source: TsvError) -> Self {
        TsvError::InFile {
            path: path.to_path_buf(),
            source: Box::new(source),
        }
    }
}

struct LabeledRows {
    column_labels: Vec<String>,
    row_labels: Vec<String>,
    values: Vec<f64>,
}

impl LabeledRows {
    fn into_matrix(self) -> (Vec<String>, Vec<String>, DMatrix<f64>) {
        let values = DMatrix::from_row_slice(
            self.row_labels.len(),
            self.column_labels.len(),
            &self.values,
        );
        (self.row_labels, self.column_labels, values)
    }
}

fn parse_value(field: &str) -> Option<f64> {
    let field = field.trim();
    if field.eq_ignore_ascii_case(DEFAULT_MISSING_VALUE) {
        return Some(f64::NAN);
    }
    field.parse().ok()
}

fn read_labeled(reader: impl Read) -> Result<LabeledRows, TsvError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(reader);
    let mut records = csv_reader.records();

    let header = records.next().ok_or(TsvError::MissingHeader)??;
    let column_labels: Vec<String> = header
        .iter()
        .skip(1)
        .map(|label| label.trim().to_string())
        .collect();
    let expected = column_labels.len() + 1;

    let mut row_labels = Vec::new();
    let mut values = Vec::new();
    for record in records {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != expected {
            return Err(TsvError::Ragged {
                line,
                expected,
                found: record.len(),
            });
        }
        let mut fields = record.iter();
        row_labels.push(fields.next().unwrap_or_default().trim().to_string());
        for (field, column) in fields.zip(&column_labels) {
            let value = parse_value(field).ok_or_else(|| TsvError::InvalidNumber {
                line,
                column: column.clone(),
                value: field.to_string(),
            })?;
            values.push(value);
        }
    }

    Ok(LabeledRows {
        column_labels,
        row_labels,
        values,
    })
}

fn write_labeled(
    writer: impl Write,
    corner: &str,
    row_labels: &[String],
    column_labels: &[String],
    values: &DMatrix<f64>,
    missing_value: &str,
) -> Result<(), TsvError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    csv_writer.write_record(std::iter::once(corner).chain(column_labels.iter().map(String::as_str)))?;
    for (i, label) in row_labels.iter().enumerate() {
        let mut record = Vec::with_capacity(column_labels.len() + 1);
        record.push(label.clone());
        record.extend(values.row(i).iter().map(|&v| {
            if v.is_finite() {
                v.to_string()
            } else {
                missing_value.to_string()
            }
        }));
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

impl TabularFile for FoldChangeMatrix {
    type Error = TsvError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self, TsvError> {
        let (genes, samples, values) = read_labeled(reader)?.into_matrix();
        Ok(FoldChangeMatrix::new(genes, samples, values)?)
    }

    fn write_to(&self, writer: &mut impl Write) -> Result<(), TsvError> {
        write_labeled(
            writer,
            "gene",
            self.genes(),
            self.samples(),
            self.values(),
            DEFAULT_MISSING_VALUE,
        )
    }
}

impl TabularFile for PathwayMatrix {
    type Error = TsvError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self, TsvError> {
        let (row_genes, column_genes, interactions) = read_labeled(reader)?.into_matrix();
        Ok(PathwayMatrix::with_axes(row_genes, column_genes, interactions)?)
    }

    fn write_to(&self, writer: &mut impl Write) -> Result<(), TsvError> {
        write_labeled(
            writer,
            "gene",
            self.genes(),
            self.genes(),
            self.interactions(),
            DEFAULT_MISSING_VALUE,
        )
    }
}

impl TabularFile for ScoreTable {
    type Error = TsvError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self, TsvError> {
        let (pathways, samples, scores) = read_labeled(reader)?.into_matrix();
        Ok(ScoreTable::new(pathways, samples, scores)?)
    }

    fn write_to(&self, writer: &mut impl Write) -> Result<(), TsvError> {
        write_scores(self, writer, DEFAULT_MISSING_VALUE)
    }
}

/// Writes a score table, rendering non-finite scores as `missing_value`.
pub fn write_scores(
    table: &ScoreTable,
    writer: impl Write,
    missing_value: &str,
) -> Result<(), TsvError> {
    write_labeled(
        writer,
        "pathway",
        table.pathways(),
        table.samples(),
        table.scores(),
        missing_value,
    )
}

/// Loads every pathway matrix file (`.tsv` or `.txt`) in `dir` into a collection.
///
/// Each file holds one interaction matrix and the pathway is named after the file
/// stem. Files are added in lexicographic order of their names so that the resulting
/// collection order is reproducible.
///
/// # Errors
///
/// Returns [`TsvError::InFile`] naming the offending file for any parse or validation
/// failure, and [`TsvError::Model`] if two files share a stem.
pub fn read_pathway_dir(dir: &Path) -> Result<PathwayCollection, TsvError> {
    let mut paths = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<PathBuf>, io::Error>>()?;
    paths.retain(|path| path.is_file() && has_pathway_extension(path));
    paths.sort();

    let mut collection = PathwayCollection::new();
    for path in paths {
        let Some(name) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let matrix =
            PathwayMatrix::read_from_path(&path).map_err(|e| TsvError::in_file(&path, e))?;
        debug!(pathway = %name, genes = matrix.len(), "Loaded pathway matrix.");
        collection.insert(name, matrix)?;
    }
    Ok(collection)
}

fn has_pathway_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            PATHWAY_FILE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reads_fold_change_matrix() {
        let data = "gene\ts1\ts2\ng1\t1.5\t-2\ng2\t0\t3.25\n";
        let fc = FoldChangeMatrix::read_from(&mut Cursor::new(data)).unwrap();
        assert_eq!(fc.genes(), labels(&["g1", "g2"]).as_slice());
        assert_eq!(fc.samples(), labels(&["s1", "s2"]).as_slice());
        assert_eq!(fc.values()[(0, 1)], -2.0);
        assert_eq!(fc.values()[(1, 1)], 3.25);
    }

    #[test]
    fn skips_comment_lines() {
        let data = "# exported fold-changes\ngene\ts1\ng1\t1\n";
        let fc = FoldChangeMatrix::read_from(&mut Cursor::new(data)).unwrap();
        assert_eq!(fc.n_genes(), 1);
    }

    #[test]
    fn rejects_ragged_rows_with_line_number() {
        let data = "gene\ts1\ts2\ng1\t1\n";
        let err = FoldChangeMatrix::read_from(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(
            err,
            TsvError::Ragged {
                line: 2,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn rejects_non_numeric_values() {
        let data = "gene\ts1\ng1\tup\n";
        let err = FoldChangeMatrix::read_from(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(err, TsvError::InvalidNumber { ref value, .. } if value == "up"));
    }

    #[test]
    fn missing_fold_change_is_a_model_error() {
        let data = "gene\ts1\ng1\tNA\n";
        let err = FoldChangeMatrix::read_from(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(
            err,
            TsvError::Model(ModelError::NonFiniteValue { .. })
        ));
    }

    #[test]
    fn empty_input_requires_header() {
        let err = FoldChangeMatrix::read_from(&mut Cursor::new("")).unwrap_err();
        assert!(matches!(err, TsvError::MissingHeader));
    }

    #[test]
    fn pathway_matrix_requires_matching_axes() {
        let data = "gene\tg1\tg2\ng2\t-1\t0\ng1\t0\t-1\n";
        let err = PathwayMatrix::read_from(&mut Cursor::new(data)).unwrap_err();
        assert!(matches!(
            err,
            TsvError::Model(ModelError::AxisOrderMismatch { position: 0, .. })
        ));
    }

    #[test]
    fn score_table_round_trips_missing_values() {
        let table = ScoreTable::new(
            labels(&["p1", "p2"]),
            labels(&["s1"]),
            DMatrix::from_row_slice(2, 1, &[-0.25, f64::NAN]),
        )
        .unwrap();

        let mut buffer = Vec::new();
        table.write_to(&mut buffer).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert_eq!(text, "pathway\ts1\np1\t-0.25\np2\tNA\n");

        let parsed = ScoreTable::read_from(&mut Cursor::new(buffer)).unwrap();
        assert_eq!(parsed.get("p1", "s1"), Some(-0.25));
        assert!(parsed.get("p2", "s1").unwrap().is_nan());
    }

    #[test]
    fn write_scores_uses_custom_missing_token() {
        let table = ScoreTable::new(
            labels(&["p1"]),
            labels(&["s1", "s2"]),
            DMatrix::from_row_slice(1, 2, &[f64::NAN, 1.0]),
        )
        .unwrap();
        let mut buffer = Vec::new();
        write_scores(&table, &mut buffer, "").unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "pathway\ts1\ts2\np1\t\t1\n");
    }

    #[test]
    fn read_pathway_dir_orders_by_file_name() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b_signal.tsv"), "gene\tx\nx\t-1\n").unwrap();
        fs::write(dir.path().join("a_cycle.tsv"), "gene\ty\tz\ny\t-1\t0.5\nz\t0\t-1\n").unwrap();
        fs::write(dir.path().join("notes.md"), "not a pathway").unwrap();

        let collection = read_pathway_dir(dir.path()).unwrap();
        let names: Vec<_> = collection.names().collect();
        assert_eq!(names, vec!["a_cycle", "b_signal"]);
        assert_eq!(collection.get("a_cycle").unwrap().interactions()[(0, 1)], 0.5);
    }

    #[test]
    fn read_pathway_dir_names_the_failing_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken.tsv"), "gene\tx\ty\nx\t-1\n").unwrap();

        let err = read_pathway_dir(dir.path()).unwrap_err();
        match err {
            TsvError::InFile { path, source } => {
                assert!(path.ends_with("broken.tsv"));
                assert!(matches!(*source, TsvError::Ragged { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn read_pathway_dir_propagates_directory_errors() {
        let dir = tempdir().unwrap();
        let err = read_pathway_dir(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, TsvError::Io(_)));

        fs::create_dir(dir.path().join("nested.tsv")).unwrap();
        fs::write(dir.path().join("p1.tsv"), "gene\tx\nx\t-1\n").unwrap();
        let collection = read_pathway_dir(dir.path()).unwrap();
        assert_eq!(collection.names().collect::<Vec<_>>(), vec!["p1"]);
    }
}
