//! Result tables written by the demo binary, and the directory tree holding them.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::cli::TestLabel;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: '{token}' is not a number")]
    Parse { line: usize, token: String },
    #[error("line {line}: expected {expected} columns, found {found}")]
    Ragged { line: usize, expected: usize, found: usize },
    #[error("table has no rows")]
    Empty,
    #[error("tables differ in shape: {left:?} vs {right:?}")]
    ShapeMismatch { left: (usize, usize), right: (usize, usize) },
}

/// Row-major numeric matrix: one row per time step, column 0 is time.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ResultTable {
    #[allow(dead_code)]
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let cols = rows.first().map(Vec::len).ok_or(TableError::Empty)?;
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(TableError::Ragged { line: i + 1, expected: cols, found: row.len() });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { rows: rows.len(), cols, data })
    }

    /// Whitespace-delimited numbers; blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let mut data = Vec::new();
        let mut cols = None;
        let mut rows = 0;
        for (idx, raw) in text.lines().enumerate() {
            let line = match raw.split_once('#') {
                Some((before, _)) => before,
                None => raw,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let start = data.len();
            for token in line.split_whitespace() {
                let v: f64 = token.parse().map_err(|_| TableError::Parse {
                    line: idx + 1,
                    token: token.to_string(),
                })?;
                data.push(v);
            }
            let found = data.len() - start;
            match cols {
                None => cols = Some(found),
                Some(expected) if expected != found => {
                    return Err(TableError::Ragged { line: idx + 1, expected, found });
                }
                Some(_) => {}
            }
            rows += 1;
        }
        let cols = cols.ok_or(TableError::Empty)?;
        Ok(Self { rows, cols, data })
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        let text = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|r| self.get(r, col)).collect()
    }

    pub fn time(&self) -> Vec<f64> {
        self.column(0)
    }

    /// Dimensionality of the state: column 0 is time, then `x`, then `xd`.
    pub fn state_dims(&self) -> usize {
        self.cols.saturating_sub(1) / 2
    }

    /// Columns holding `x` (state).
    pub fn x_columns(&self) -> std::ops::Range<usize> {
        1..1 + self.state_dims()
    }

    /// Columns holding `xd` (state derivative).
    pub fn xd_columns(&self) -> std::ops::Range<usize> {
        let n = self.state_dims();
        1 + n..1 + 2 * n
    }

    /// Element-wise `self - other`, with the time column taken from `self`.
    pub fn difference(&self, other: &ResultTable) -> Result<ResultTable, TableError> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(TableError::ShapeMismatch {
                left: (self.rows, self.cols),
                right: (other.rows, other.cols),
            });
        }
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .enumerate()
            .map(|(i, (a, b))| if i % self.cols == 0 { *a } else { a - b })
            .collect();
        Ok(ResultTable { rows: self.rows, cols: self.cols, data })
    }
}

/// Output directory of one demo run: one subdirectory per simulated system.
#[derive(Debug, Clone)]
pub struct RunTree {
    root: PathBuf,
}

impl RunTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Subdirectory names, sorted.
    pub fn systems(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("failed to list '{}'", self.root.display()))?;
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn results_path(&self, system: &str, label: TestLabel) -> PathBuf {
        self.root.join(system).join(label.results_file_name())
    }

    pub fn load(&self, system: &str, label: TestLabel) -> Result<ResultTable> {
        let path = self.results_path(system, label);
        ResultTable::load(&path).with_context(|| format!("loading '{}'", path.display()))
    }
}
