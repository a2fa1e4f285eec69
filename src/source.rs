/// Record sources: where raw rows come from.
///
/// Two variants are provided:
///
/// - [`CsvFileSource`] reads a delimited bulk file in one pass.
/// - [`PaginatedSource`] performs a full cursor-paginated scan through a
///   [`PageClient`], accumulating every page before returning.
///
/// Sources never coerce values. They hand back untyped [`RawRecord`]s and the
/// [`TableBuilder`](crate::builder::TableBuilder) applies the typing policy.
use crate::error::IngestionError;
use crate::record::{RawRecord, RawValue};
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fs;
use std::path::{Path, PathBuf};

/// Anything that can produce a finite sequence of raw records.
pub trait RecordSource {
    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;

    /// Read every record. A partial read is an error, never a shorter result.
    fn read_records(&self) -> Result<Vec<RawRecord>, IngestionError>;
}

// ============================================================================
// File-backed source
// ============================================================================

/// Reads a comma-delimited file whose first row is the header.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvFileSource { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for CsvFileSource {
    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }

    fn read_records(&self) -> Result<Vec<RawRecord>, IngestionError> {
        let text = fs::read_to_string(&self.path).map_err(|source| IngestionError::Io {
            path: self.path.clone(),
            source,
        })?;
        parse_csv_records(&text, &self.describe())
    }
}

/// Parse CSV text into raw records keyed by the header row.
///
/// Rows shorter than the header are kept; their missing fields are simply
/// absent. Extra trailing fields are ignored. Empty fields are absent values.
/// Empty lines are not records, but a line of empty fields (`,,`) is a
/// record with every field absent.
pub fn parse_csv_records(text: &str, origin: &str) -> Result<Vec<RawRecord>, IngestionError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows = parse_csv_rows(text).into_iter();

    let header: Vec<String> = match rows.next() {
        Some(header) if !is_blank_row(&header) => {
            header.into_iter().map(|name| name.trim().to_string()).collect()
        }
        _ => {
            return Err(IngestionError::MissingHeader {
                origin: origin.to_string(),
            })
        }
    };

    let records = rows
        .filter(|row| !is_empty_line(row))
        .map(|row| {
            header
                .iter()
                .zip(row)
                .filter(|(_, field)| !field.trim().is_empty())
                .map(|(name, field)| (name.clone(), RawValue::String(field)))
                .collect::<RawRecord>()
        })
        .collect();

    Ok(records)
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|field| field.trim().is_empty())
}

fn is_empty_line(row: &[String]) -> bool {
    row.len() == 1 && row[0].trim().is_empty()
}

/// Split CSV text into rows of fields, handling quoted fields with embedded
/// delimiters, doubled quotes and newlines.
fn parse_csv_rows(csv: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut current_row = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut chars = csv.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current_field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                current_row.push(std::mem::take(&mut current_field));
            }
            '\n' if !in_quotes => {
                current_row.push(std::mem::take(&mut current_field));
                rows.push(std::mem::take(&mut current_row));
            }
            // CRLF ends the row at the '\n'; a lone CR ends it here.
            '\r' if !in_quotes => {
                if chars.peek() != Some(&'\n') {
                    current_row.push(std::mem::take(&mut current_field));
                    rows.push(std::mem::take(&mut current_row));
                }
            }
            _ => current_field.push(c),
        }
    }

    if !current_field.is_empty() || !current_row.is_empty() {
        current_row.push(current_field);
        rows.push(current_row);
    }

    rows
}

// ============================================================================
// Remote paginated source
// ============================================================================

/// Opaque continuation token returned by a paginated scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanCursor(pub String);

impl ScanCursor {
    pub fn new(token: impl Into<String>) -> Self {
        ScanCursor(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of a remote scan.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanPage {
    #[serde(default)]
    pub items: Vec<RawRecord>,
    /// Present when more pages follow.
    #[serde(default)]
    pub cursor: Option<ScanCursor>,
}

impl ScanPage {
    pub fn new(items: Vec<RawRecord>, cursor: Option<ScanCursor>) -> Self {
        ScanPage { items, cursor }
    }

    pub fn last(items: Vec<RawRecord>) -> Self {
        ScanPage { items, cursor: None }
    }
}

/// The remote store's page-fetch primitive.
///
/// Retries and timeouts belong to the implementation. Whatever error it
/// finally returns fails the whole scan.
pub trait PageClient {
    fn describe(&self) -> String {
        "remote table".to_string()
    }

    /// Fetch the page starting at `cursor`, or the first page when `None`.
    fn fetch_page(
        &self,
        cursor: Option<&ScanCursor>,
    ) -> Result<ScanPage, Box<dyn StdError + Send + Sync>>;
}

/// Full-table scan over a [`PageClient`].
pub struct PaginatedSource<C> {
    client: C,
}

impl<C: PageClient> PaginatedSource<C> {
    pub fn new(client: C) -> Self {
        PaginatedSource { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: PageClient> RecordSource for PaginatedSource<C> {
    fn describe(&self) -> String {
        format!("paginated scan of {}", self.client.describe())
    }

    fn read_records(&self) -> Result<Vec<RawRecord>, IngestionError> {
        let mut records = Vec::new();
        let mut cursor: Option<ScanCursor> = None;
        let mut page = 0;

        loop {
            let fetched = self
                .client
                .fetch_page(cursor.as_ref())
                .map_err(|e| IngestionError::PageFetch {
                    page,
                    message: e.to_string(),
                })?;

            debug!(
                "scan page {} returned {} items (more: {})",
                page,
                fetched.items.len(),
                fetched.cursor.is_some()
            );
            records.extend(fetched.items);

            match fetched.cursor {
                None => break,
                Some(next) if cursor.as_ref() == Some(&next) => {
                    return Err(IngestionError::StalledCursor { page });
                }
                Some(next) => cursor = Some(next),
            }
            page += 1;
        }

        Ok(records)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write;

    pub(crate) fn record(fields: &[(&str, &str)]) -> RawRecord {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), RawValue::from(*v)))
            .collect()
    }

    /// Serves pre-built pages; page `n` is requested with cursor `"page-n"`.
    pub(crate) struct StaticPages {
        pub pages: Vec<Vec<RawRecord>>,
        pub fail_on: Option<usize>,
        pub calls: Cell<usize>,
    }

    impl StaticPages {
        pub(crate) fn with_sizes(sizes: &[usize]) -> Self {
            let pages = sizes
                .iter()
                .enumerate()
                .map(|(p, &size)| {
                    (0..size)
                        .map(|i| {
                            let age = (20 + p * 10 + i).to_string();
                            record(&[
                                ("region", if i % 2 == 0 { "Seoul" } else { "Busan" }),
                                ("age", age.as_str()),
                                ("total_payment", "1000"),
                            ])
                        })
                        .collect()
                })
                .collect();
            StaticPages {
                pages,
                fail_on: None,
                calls: Cell::new(0),
            }
        }
    }

    impl PageClient for StaticPages {
        fn describe(&self) -> String {
            "static pages".to_string()
        }

        fn fetch_page(
            &self,
            cursor: Option<&ScanCursor>,
        ) -> Result<ScanPage, Box<dyn StdError + Send + Sync>> {
            self.calls.set(self.calls.get() + 1);
            let index = match cursor {
                None => 0,
                Some(c) => c
                    .as_str()
                    .strip_prefix("page-")
                    .and_then(|n| n.parse::<usize>().ok())
                    .ok_or("bad cursor")?,
            };
            if self.fail_on == Some(index) {
                return Err("throughput exceeded".into());
            }
            let items = self.pages.get(index).cloned().ok_or("page out of range")?;
            if index + 1 == self.pages.len() {
                return Ok(ScanPage::last(items));
            }
            Ok(ScanPage::new(items, Some(ScanCursor::new(format!("page-{}", index + 1)))))
        }
    }

    #[test]
    fn test_paginated_scan_reads_every_page() {
        let source = PaginatedSource::new(StaticPages::with_sizes(&[10, 10, 4]));
        let records = source.read_records().unwrap();

        assert_eq!(records.len(), 24);
        assert_eq!(source.client().calls.get(), 3);
    }

    #[test]
    fn test_paginated_scan_single_page() {
        let source = PaginatedSource::new(StaticPages::with_sizes(&[5]));
        assert_eq!(source.read_records().unwrap().len(), 5);
        assert_eq!(source.client().calls.get(), 1);
    }

    #[test]
    fn test_paginated_scan_empty_table() {
        let source = PaginatedSource::new(StaticPages::with_sizes(&[0]));
        assert!(source.read_records().unwrap().is_empty());
    }

    #[test]
    fn test_failed_page_fails_whole_scan() {
        let mut client = StaticPages::with_sizes(&[10, 10, 4]);
        client.fail_on = Some(2);
        let source = PaginatedSource::new(client);

        match source.read_records() {
            Err(IngestionError::PageFetch { page, message }) => {
                assert_eq!(page, 2);
                assert!(message.contains("throughput exceeded"));
            }
            other => panic!("expected PageFetch error, got {:?}", other),
        }
    }

    struct StuckClient;

    impl PageClient for StuckClient {
        fn fetch_page(
            &self,
            _cursor: Option<&ScanCursor>,
        ) -> Result<ScanPage, Box<dyn StdError + Send + Sync>> {
            Ok(ScanPage::new(vec![record(&[("age", "1")])], Some(ScanCursor::new("same"))))
        }
    }

    #[test]
    fn test_stalled_cursor_is_an_error() {
        let source = PaginatedSource::new(StuckClient);
        assert!(matches!(
            source.read_records(),
            Err(IngestionError::StalledCursor { page: 1 })
        ));
    }

    #[test]
    fn test_scan_page_from_json() {
        let page: ScanPage = serde_json::from_str(
            r#"{"items": [{"region": "Seoul", "age": 30}], "cursor": "abc"}"#,
        )
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.cursor, Some(ScanCursor::new("abc")));

        let last: ScanPage = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(last.cursor.is_none());
    }

    #[test]
    fn test_parse_csv_basic() {
        let csv = "region,age,total_payment\nSeoul,31,12000\nBusan,45,8000\n";
        let records = parse_csv_records(csv, "test").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("region"), Some(&RawValue::from("Seoul")));
        assert_eq!(records[1].get("age"), Some(&RawValue::from("45")));
    }

    #[test]
    fn test_parse_csv_short_and_long_rows() {
        let csv = "region,age,total_payment\nSeoul\nBusan,45,8000,extra\n";
        let records = parse_csv_records(csv, "test").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].len(), 1);
        assert!(records[0].get("age").is_none());
        assert_eq!(records[1].len(), 3);
    }

    #[test]
    fn test_parse_csv_quotes_bom_and_crlf() {
        let csv = "\u{feff}region,note\r\n\"Seoul, Gangnam\",\"say \"\"hi\"\"\"\r\n\r\nBusan,\"two\nlines\"\r\n";
        let records = parse_csv_records(csv, "test").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("region"), Some(&RawValue::from("Seoul, Gangnam")));
        assert_eq!(records[0].get("note"), Some(&RawValue::from("say \"hi\"")));
        assert_eq!(records[1].get("note"), Some(&RawValue::from("two\nlines")));
    }

    #[test]
    fn test_parse_csv_empty_field_is_absent() {
        let records = parse_csv_records("region,age\nSeoul,\n", "test").unwrap();
        assert!(records[0].get("age").is_none());
    }

    #[test]
    fn test_parse_csv_requires_header() {
        assert!(matches!(
            parse_csv_records("", "empty.csv"),
            Err(IngestionError::MissingHeader { .. })
        ));
        assert!(matches!(
            parse_csv_records("\n\n", "blank.csv"),
            Err(IngestionError::MissingHeader { .. })
        ));
    }

    #[test]
    fn test_parse_csv_keeps_all_empty_rows() {
        let csv = "region,age,total_payment\nSeoul,20,100\n,,\nBusan,30,5\n\n";
        let records = parse_csv_records(csv, "test").unwrap();

        assert_eq!(records.len(), 3);
        assert!(records[1].is_empty());
        assert_eq!(records[2].get("region"), Some(&RawValue::from("Busan")));
    }

    #[test]
    fn test_parse_csv_cr_only_line_endings() {
        let csv = "region,age\rSeoul,20\rBusan,\"a\rb\"\r";
        let records = parse_csv_records(csv, "test").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("age"), Some(&RawValue::from("20")));
        assert_eq!(records[1].get("age"), Some(&RawValue::from("a\rb")));
    }

    #[test]
    fn test_parse_csv_header_only() {
        assert!(parse_csv_records("region,age\n", "test").unwrap().is_empty());
    }

    #[test]
    fn test_csv_file_source_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "region,age").unwrap();
        writeln!(file, "Seoul,20").unwrap();
        writeln!(file, "Daegu,abc").unwrap();

        let source = CsvFileSource::new(file.path());
        let records = source.read_records().unwrap();
        assert_eq!(records.len(), 2);
        assert!(source.describe().contains("csv file"));
    }

    #[test]
    fn test_csv_file_source_missing_file() {
        let source = CsvFileSource::new("/definitely/not/here/data.csv");
        assert!(matches!(
            source.read_records(),
            Err(IngestionError::Io { .. })
        ));
    }
}
