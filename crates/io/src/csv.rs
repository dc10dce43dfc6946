// CSV/TSV import
//
// Same normalization as the Excel path: header row skipped, first five
// columns kept, trimmed keyword, numeric-looking text coerced to numbers.

use std::io::Read;
use std::path::Path;

use kwcompare_engine::model::{KeywordTable, LoadIssueKind, SourceRow, REQUIRED_COLUMNS};

use crate::loader::file_name_of;
use crate::xlsx::field_from_str;

/// Read one delimited file into a normalized keyword table.
/// `.tsv` forces a tab delimiter; anything else is sniffed.
pub fn read_table(path: &Path, source_index: usize) -> Result<KeywordTable, LoadIssueKind> {
    let read_err = |message: String| LoadIssueKind::Read { message };

    let content = read_file_as_utf8(path).map_err(read_err)?;
    let delimiter = if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("tsv")) {
        b'\t'
    } else {
        sniff_delimiter(&content)
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    let mut saw_header = false;
    for (row_idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| read_err(e.to_string()))?;
        if row_idx == 0 {
            // Header row; its width is the file's column count.
            if record.len() < REQUIRED_COLUMNS {
                return Err(LoadIssueKind::Shape { columns: record.len() });
            }
            saw_header = true;
            continue;
        }
        let keyword = record.get(0).unwrap_or("").trim().to_string();
        if keyword.is_empty() {
            continue;
        }
        let field_at = |i: usize| field_from_str(record.get(i).unwrap_or(""));
        rows.push(SourceRow {
            keyword,
            position: field_at(1),
            search_volume: field_at(2),
            cpc: field_at(3),
            url: field_at(4),
        });
    }

    if !saw_header {
        // Completely empty file: not even a header row.
        return Err(LoadIssueKind::Shape { columns: 0 });
    }

    Ok(KeywordTable {
        source_index,
        file_name: file_name_of(path),
        rows,
    })
}

/// Detect the most likely delimiter by field-count consistency over the
/// first few lines. Ties break toward the higher field count.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample: Vec<&str> = content.lines().take(10).collect();

    let mut best = b',';
    let mut best_score = 0u64;
    for &delim in candidates {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        let first = counts.first().copied().unwrap_or(0);
        if first <= 1 {
            continue;
        }
        let consistent = counts.iter().filter(|&&c| c == first).count() as u64;
        let score = consistent * first as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }
    best
}

/// Read a file as UTF-8, falling back to Windows-1252 (common for
/// Excel-exported CSVs).
fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}
