//! Loader: parse the three delimited input files into typed tables.
//!
//! - **Response table**: one [`ResponseRecord`] per row, located by header name
//! - **Indicator matrix**: first column is the row index, the remaining header
//!   cells are column identifiers, cells are kept as written
//!
//! Blank lines are skipped, and so are lines starting with `#` before the
//! header. Fields may be double-quoted to hold the delimiter (`""` escapes a
//! quote); unquoted fields are trimmed.

use std::collections::HashMap;
use std::path::Path;

use crate::config::InputPaths;
use crate::error::{DataLoadError, SchemaMismatchError};

pub type LoadResult<T> = std::result::Result<T, DataLoadError>;

pub const STUDENT_COLUMN: &str = "student_id";
pub const QUESTION_COLUMN: &str = "question_id";
pub const CORRECT_COLUMN: &str = "correct";

/// One student's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    pub student_id: String,
    pub question_id: String,
    /// 1 when the answer was correct, 0 otherwise.
    pub correct: u8,
}

impl ResponseRecord {
    pub fn new(student_id: impl Into<String>, question_id: impl Into<String>, correct: u8) -> Self {
        Self {
            student_id: student_id.into(),
            question_id: question_id.into(),
            correct,
        }
    }
}

/// Response records in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseTable {
    records: Vec<ResponseRecord>,
}

impl ResponseTable {
    pub fn from_records(records: Vec<ResponseRecord>) -> Self {
        Self { records }
    }

    pub fn load(path: &Path, delimiter: char) -> LoadResult<Self> {
        let text = read_input(path)?;
        let table = Self::parse(&text, delimiter, &path.display().to_string())?;
        tracing::info!(path = %path.display(), rows = table.len(), "loaded response table");
        Ok(table)
    }

    /// Parse response records; `source` names the input in error messages.
    pub fn parse(text: &str, delimiter: char, source: &str) -> LoadResult<Self> {
        let ((_, header), lines) = split_header(text).ok_or_else(|| DataLoadError::MissingColumn {
            path: source.to_string(),
            column: STUDENT_COLUMN.to_string(),
        })?;
        let header = split_fields(header, delimiter);

        let position = |column: &str| {
            header
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| DataLoadError::MissingColumn {
                    path: source.to_string(),
                    column: column.to_string(),
                })
        };
        let student_col = position(STUDENT_COLUMN)?;
        let question_col = position(QUESTION_COLUMN)?;
        let correct_col = position(CORRECT_COLUMN)?;

        let mut records = Vec::new();
        for (line, raw) in lines {
            let fields = split_fields(raw, delimiter);
            let field = |idx: usize, column: &str| {
                fields
                    .get(idx)
                    .filter(|v| !v.is_empty())
                    .cloned()
                    .ok_or_else(|| DataLoadError::MissingField {
                        path: source.to_string(),
                        line,
                        column: column.to_string(),
                    })
            };

            let student_id = field(student_col, STUDENT_COLUMN)?;
            let question_id = field(question_col, QUESTION_COLUMN)?;
            let raw_correct = field(correct_col, CORRECT_COLUMN)?;
            let correct = parse_correctness(&raw_correct).ok_or_else(|| {
                DataLoadError::InvalidCorrectness {
                    path: source.to_string(),
                    line,
                    value: raw_correct.clone(),
                }
            })?;

            records.push(ResponseRecord {
                student_id,
                question_id,
                correct,
            });
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[ResponseRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResponseRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_correctness(raw: &str) -> Option<u8> {
    let value: f64 = raw.parse().ok()?;
    if value == 1.0 {
        Some(1)
    } else if value == 0.0 {
        Some(0)
    } else {
        None
    }
}

/// A row-key × column-key table of raw cell values.
///
/// Used for both the skill matrix (concepts × questions) and the prerequisite
/// matrix (prerequisite concepts × concepts). Rows and columns keep their
/// file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndicatorMatrix {
    rows: Vec<String>,
    columns: Vec<String>,
    /// Row-major cells: `cells[row][column]`.
    cells: Vec<Vec<String>>,
    row_index: HashMap<String, usize>,
    column_index: HashMap<String, usize>,
}

impl IndicatorMatrix {
    /// Build a matrix from column keys and `(row key, cells)` pairs.
    pub fn from_rows<C, R, K, V>(columns: C, rows: R) -> Result<Self, SchemaMismatchError>
    where
        C: IntoIterator,
        C::Item: Into<String>,
        R: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source = "<memory>";
        let mut matrix = Self::with_columns(columns.into_iter().map(Into::into).collect(), source)?;
        for (n, (key, cells)) in rows.into_iter().enumerate() {
            matrix.push_row(
                key.into(),
                cells.into_iter().map(Into::into).collect(),
                source,
                n + 2,
            )?;
        }
        Ok(matrix)
    }

    pub fn load(path: &Path, delimiter: char) -> LoadResult<Self> {
        let text = read_input(path)?;
        let matrix = Self::parse(&text, delimiter, &path.display().to_string())?;
        tracing::info!(
            path = %path.display(),
            rows = matrix.rows.len(),
            columns = matrix.columns.len(),
            "loaded indicator matrix"
        );
        Ok(matrix)
    }

    /// Parse a matrix; `source` names the input in error messages.
    pub fn parse(text: &str, delimiter: char, source: &str) -> LoadResult<Self> {
        let ((header_line, header), lines) = split_header(text).ok_or_else(|| SchemaMismatchError::EmptyHeader {
            path: source.to_string(),
        })?;

        let mut header = split_fields(header, delimiter);
        if header.len() < 2 {
            return Err(SchemaMismatchError::NoColumns {
                path: source.to_string(),
            }
            .into());
        }
        // The first header cell only labels the index column.
        let columns = header.split_off(1);
        if columns.iter().any(String::is_empty) {
            return Err(SchemaMismatchError::EmptyKey {
                path: source.to_string(),
                line: header_line,
            }
            .into());
        }

        let mut matrix = Self::with_columns(columns, source)?;
        for (line, raw) in lines {
            let mut fields = split_fields(raw, delimiter);
            let cells = fields.split_off(1);
            let key = fields.pop().unwrap_or_default();
            matrix.push_row(key, cells, source, line)?;
        }
        Ok(matrix)
    }

    fn with_columns(columns: Vec<String>, source: &str) -> Result<Self, SchemaMismatchError> {
        if columns.is_empty() {
            return Err(SchemaMismatchError::NoColumns {
                path: source.to_string(),
            });
        }
        let mut column_index = HashMap::with_capacity(columns.len());
        for (i, key) in columns.iter().enumerate() {
            if column_index.insert(key.clone(), i).is_some() {
                return Err(SchemaMismatchError::DuplicateColumn {
                    path: source.to_string(),
                    key: key.clone(),
                });
            }
        }
        Ok(Self {
            rows: Vec::new(),
            columns,
            cells: Vec::new(),
            row_index: HashMap::new(),
            column_index,
        })
    }

    fn push_row(
        &mut self,
        key: String,
        mut cells: Vec<String>,
        source: &str,
        line: usize,
    ) -> Result<(), SchemaMismatchError> {
        if key.is_empty() {
            return Err(SchemaMismatchError::EmptyKey {
                path: source.to_string(),
                line,
            });
        }
        // Missing trailing cells read as empty, which is the no-edge case.
        if cells.len() < self.columns.len() {
            cells.resize(self.columns.len(), String::new());
        }
        if cells.len() > self.columns.len() {
            return Err(SchemaMismatchError::RowWidth {
                path: source.to_string(),
                line,
                expected: self.columns.len() + 1,
                actual: cells.len() + 1,
            });
        }
        if self.row_index.contains_key(&key) {
            return Err(SchemaMismatchError::DuplicateRow {
                path: source.to_string(),
                line,
                key,
            });
        }
        self.row_index.insert(key.clone(), self.rows.len());
        self.rows.push(key);
        self.cells.push(cells);
        Ok(())
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw cell text, if both keys exist.
    pub fn get(&self, row: &str, column: &str) -> Option<&str> {
        let r = *self.row_index.get(row)?;
        let c = *self.column_index.get(column)?;
        Some(self.cells[r][c].as_str())
    }

    /// Whether the cell holds exactly 1.
    pub fn is_set(&self, row: &str, column: &str) -> bool {
        self.get(row, column).is_some_and(is_indicator)
    }

    /// `(row key, raw value)` pairs of one column, in row order.
    pub fn column(&self, column: &str) -> impl Iterator<Item = (&str, &str)> {
        let c = self.column_index.get(column).copied();
        self.rows
            .iter()
            .zip(self.cells.iter())
            .filter_map(move |(key, cells)| c.map(|c| (key.as_str(), cells[c].as_str())))
    }
}

/// A cell marks a relation only when it is numerically equal to 1.
pub fn is_indicator(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok_and(|v| v == 1.0)
}

/// The three loaded inputs of one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tables {
    pub responses: ResponseTable,
    pub skills: IndicatorMatrix,
    pub prerequisites: IndicatorMatrix,
}

impl Tables {
    /// Load all three inputs; the first failure aborts.
    pub fn load(inputs: &InputPaths, delimiter: char) -> LoadResult<Self> {
        Ok(Self {
            responses: ResponseTable::load(&inputs.responses, delimiter)?,
            skills: IndicatorMatrix::load(&inputs.skills, delimiter)?,
            prerequisites: IndicatorMatrix::load(&inputs.prerequisites, delimiter)?,
        })
    }
}

fn read_input(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).map_err(|e| DataLoadError::Read {
        path: path.display().to_string(),
        source: e,
    })
}

/// The header line and the non-blank lines after it, with 1-based line numbers.
///
/// `#` comments are only recognised before the header; after it every
/// non-blank line is data. Lines are returned untrimmed so that empty edge
/// fields survive whitespace delimiters such as tab.
fn split_header(text: &str) -> Option<((usize, &str), impl Iterator<Item = (usize, &str)>)> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());
    let header = lines.find(|(_, line)| !line.trim_start().starts_with('#'))?;
    Some((header, lines))
}

/// Split one line on `delimiter`, honouring double-quoted fields.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    let finish = |field: &mut String, quoted: bool| {
        let value = std::mem::take(field);
        if quoted { value } else { value.trim().to_string() }
    };

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else if c == '"' && field.trim().is_empty() {
            // Opening quote: whitespace before it is not part of the value.
            field.clear();
            quoted = true;
            in_quotes = true;
        } else if c == delimiter {
            fields.push(finish(&mut field, quoted));
            quoted = false;
        } else if quoted && c.is_whitespace() {
            // Whitespace between a closing quote and the delimiter.
        } else {
            field.push(c);
        }
    }
    fields.push(finish(&mut field, quoted));
    fields
}
