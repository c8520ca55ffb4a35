use crate::core::models::example::Example;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: IndexParseErrorKind },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexParseErrorKind {
    #[error("Expected at least {expected} columns, found {found}")]
    MissingColumns { expected: usize, found: usize },
    #[error("Invalid number in column {column} (value: '{value}')")]
    InvalidNumber { column: usize, value: String },
}

/// Reads an example index: one example per line as
/// `<label> [<affinity>] <receptor> <ligand>`, the affinity column being present exactly when
/// `has_affinity` is set.
///
/// Blank lines and everything after a `#` are ignored, as are columns past the ligand.
pub fn read_index(reader: impl BufRead, has_affinity: bool) -> Result<Vec<Example>, IndexError> {
    let expected = if has_affinity { 4 } else { 3 };
    let mut examples = Vec::new();

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;
        let content = line.split('#').next().unwrap_or("");
        let columns: Vec<&str> = content.split_whitespace().collect();
        if columns.is_empty() {
            continue;
        }
        if columns.len() < expected {
            return Err(IndexError::Parse {
                line: line_num,
                kind: IndexParseErrorKind::MissingColumns {
                    expected,
                    found: columns.len(),
                },
            });
        }

        let number = |column: usize| -> Result<f32, IndexError> {
            columns[column].parse().map_err(|_| IndexError::Parse {
                line: line_num,
                kind: IndexParseErrorKind::InvalidNumber {
                    column: column + 1,
                    value: columns[column].to_string(),
                },
            })
        };

        let label = number(0)?;
        let affinity = if has_affinity { Some(number(1)?) } else { None };
        let first_path = expected - 2;
        examples.push(Example {
            label,
            affinity,
            receptor: columns[first_path].to_string(),
            ligand: columns[first_path + 1].to_string(),
        });
    }

    Ok(examples)
}

pub fn read_index_from_path<P: AsRef<Path>>(
    path: P,
    has_affinity: bool,
) -> Result<Vec<Example>, IndexError> {
    let file = File::open(path)?;
    read_index(BufReader::new(file), has_affinity)
}

/// Writes examples in the layout accepted by [`read_index`]. Examples without an affinity are
/// written with `0` when `has_affinity` is set.
pub fn write_index(
    examples: &[Example],
    has_affinity: bool,
    writer: &mut impl Write,
) -> Result<(), IndexError> {
    for example in examples {
        if has_affinity {
            writeln!(
                writer,
                "{} {} {} {}",
                example.label,
                example.affinity.unwrap_or(0.0),
                example.receptor,
                example.ligand
            )?;
        } else {
            writeln!(
                writer,
                "{} {} {}",
                example.label, example.receptor, example.ligand
            )?;
        }
    }
    Ok(())
}
