// ============================================================
// TABULAR I/O
// ============================================================
// Loads the taxonomy and comments inputs (XLSX or CSV) and writes
// the classified results as CSV.

pub mod comments_loader;
pub mod results_writer;
pub mod taxonomy_loader;

use crate::domain::error::{AppError, Result};
use std::path::Path;

/// Row-oriented view over an input file: first row is the header.
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Positions of the required columns, or a SchemaError naming what is
    /// missing. Schema errors are fatal for the run.
    pub fn required_columns(&self, required: &[&str]) -> Result<Vec<usize>> {
        let mut positions = Vec::with_capacity(required.len());
        let mut missing = Vec::new();
        for name in required {
            match self.headers.iter().position(|h| h == name) {
                Some(pos) => positions.push(pos),
                None => missing.push(*name),
            }
        }
        if missing.is_empty() {
            Ok(positions)
        } else {
            Err(AppError::SchemaError(format!(
                "Missing required columns: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn cell(&self, row: &[String], column: usize) -> String {
        row.get(column).cloned().unwrap_or_default()
    }
}

/// Read a tabular file by extension: `.xlsx` goes through calamine, anything
/// else is treated as CSV.
pub fn read_table(path: &Path) -> Result<Table> {
    let is_xlsx = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("xlsx"))
        .unwrap_or(false);

    if is_xlsx {
        read_xlsx(path)
    } else {
        let content = read_with_encoding_detection(path)?;
        parse_csv(&content)
    }
}

fn read_xlsx(path: &Path) -> Result<Table> {
    use calamine::{open_workbook, Data, Reader, Xlsx};

    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| AppError::IoError(format!("Failed to open Excel file: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::SchemaError("No worksheet found".to_string()))?
        .map_err(|e| AppError::ParseError(format!("Failed to read Excel range: {}", e)))?;

    let mut rows_iter = range.rows();
    let headers = match rows_iter.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => return Err(AppError::SchemaError("Excel file is empty".to_string())),
    };

    let rows = rows_iter
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    fn cell_to_string(cell: &Data) -> String {
        match cell {
            Data::String(s) => s.clone(),
            Data::Empty => String::new(),
            other => format!("{}", other),
        }
    }

    Ok(Table { headers, rows })
}

/// Parse CSV content from a string.
pub fn parse_csv(content: &str) -> Result<Table> {
    use csv::{ReaderBuilder, Trim};

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
        })?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    Ok(Table { headers, rows })
}

/// Read a file as UTF-8, falling back to Windows-1252 for legacy exports.
fn read_with_encoding_detection(path: &Path) -> Result<String> {
    let buffer = std::fs::read(path)
        .map_err(|e| AppError::IoError(format!("Failed to read file: {}", e)))?;

    if let Ok(content) = std::str::from_utf8(&buffer) {
        // Strip a UTF-8 BOM if the exporter put one there.
        return Ok(content.trim_start_matches('\u{feff}').to_string());
    }

    let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&buffer);
    Ok(decoded.into_owned())
}
