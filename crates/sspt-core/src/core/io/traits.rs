use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing a labeled tabular format.
///
/// Implementors handle the format-specific parsing and serialization; the provided
/// methods take care of opening and buffering files.
pub trait TabularFile: Sized {
    /// The error type for I/O and parsing failures.
    type Error: Error + From<io::Error>;

    /// Reads a value from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the underlying reader fails.
    fn read_from(reader: &mut impl BufRead) -> Result<Self, Self::Error>;

    /// Writes the value to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying writer fails.
    fn write_to(&self, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Reads a value from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    /// Writes the value to a file path, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
