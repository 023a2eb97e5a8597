//! CSV file I/O with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::SystemTime;

use csv::StringRecord;

use crate::error::{TrackerError, TrackerResult};

/// A CSV file read as raw text: trimmed header names plus the data records
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub records: Vec<StringRecord>,
}

impl CsvTable {
    /// Position of a column by exact (trimmed) header name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Required columns that are absent from the header, in the order given
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.column(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }

    /// Trimmed cell value, or "" when the column or cell is absent
    pub fn field<'r>(record: &'r StringRecord, column: Option<usize>) -> &'r str {
        column
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Parse CSV text from any reader
///
/// Rows may have fewer or more cells than the header; missing cells read as empty.
pub fn read_csv<R: Read>(reader: R) -> TrackerResult<CsvTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| TrackerError::Csv(format!("Failed to read header: {}", e)))?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| TrackerError::Csv(format!("Failed to read row: {}", e)))?;
        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        records.push(record);
    }

    Ok(CsvTable { headers, records })
}

/// Read a CSV file, returning `None` when the file is missing or has no content
pub fn read_csv_file<P: AsRef<Path>>(path: P) -> TrackerResult<Option<CsvTable>> {
    let path = path.as_ref();

    if !path.exists() {
        return Ok(None);
    }

    let mut contents = String::new();
    File::open(path)
        .and_then(|mut f| f.read_to_string(&mut contents))
        .map_err(|e| TrackerError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;

    if contents.trim().is_empty() {
        return Ok(None);
    }

    read_csv(contents.as_bytes()).map(Some)
}

/// Write a header and rows as CSV to any writer
pub fn write_csv<W, I>(writer: W, header: &[&str], rows: I) -> TrackerResult<()>
where
    W: Write,
    I: IntoIterator<Item = Vec<String>>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a CSV file atomically (write to temp, then rename)
pub fn write_csv_atomic<P, I>(path: P, header: &[&str], rows: I) -> TrackerResult<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Vec<String>>,
{
    let mut buffer = Vec::new();
    write_csv(&mut buffer, header, rows)?;
    write_atomic(path, &buffer)
}

/// Write bytes to a file atomically
///
/// The file is either completely written or not modified at all.
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> TrackerResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            TrackerError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("csv.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| TrackerError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            TrackerError::Storage(format!("Failed to write data: {}", e))
        })?;

    writer.get_ref().sync_all().map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        TrackerError::Storage(format!("Failed to sync data: {}", e))
    })?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        TrackerError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Last modification time of a file, if it exists
pub fn file_mtime<P: AsRef<Path>>(path: P) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_file_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.csv");
        assert!(read_csv_file(&path).unwrap().is_none());
    }

    #[test]
    fn test_read_empty_file_returns_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.csv");
        fs::write(&path, "  \n").unwrap();
        assert!(read_csv_file(&path).unwrap().is_none());
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.csv");

        write_csv_atomic(
            &path,
            &["Category", "Budget"],
            vec![
                vec!["Food".to_string(), "3000.00".to_string()],
                vec!["Rent, flat".to_string(), "12000.00".to_string()],
            ],
        )
        .unwrap();

        let table = read_csv_file(&path).unwrap().unwrap();
        assert_eq!(table.headers, vec!["Category", "Budget"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(CsvTable::field(&table.records[1], table.column("Category")), "Rent, flat");
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data.csv");

        write_atomic(&path, b"a,b\n1,2\n").unwrap();

        assert!(path.exists());
        assert!(!temp_dir.path().join("nested").join("data.csv.tmp").exists());
    }

    #[test]
    fn test_header_trimming_and_missing_columns() {
        let table = read_csv(" Date , Type,Amount\n2024-01-01,Income,5\n".as_bytes()).unwrap();
        assert_eq!(table.column("Date"), Some(0));
        assert_eq!(table.column("Type"), Some(1));
        assert_eq!(
            table.missing_columns(&["Date", "Type", "Category", "Amount"]),
            vec!["Category".to_string()]
        );
    }

    #[test]
    fn test_short_rows_read_as_empty_cells() {
        let table = read_csv("A,B,C\n1,2\n\n".as_bytes()).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(CsvTable::field(&table.records[0], table.column("C")), "");
        assert_eq!(CsvTable::field(&table.records[0], None), "");
    }
}
