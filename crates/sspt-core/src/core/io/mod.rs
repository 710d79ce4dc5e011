//! Tab-separated input and output for the labeled containers.
//!
//! The scoring workflow itself never performs I/O; these readers and writers serve
//! host programs such as the command-line interface. Every format is a dense labeled
//! matrix: a header row holding a corner label followed by column labels, then one
//! row per entity starting with its label.

pub mod traits;
pub mod tsv;
