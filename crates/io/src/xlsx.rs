// Excel import (xlsx, xls, xlsb, ods) and workbook export (xlsx only)
//
// Import reads the first worksheet of each file: row 1 is treated as the
// header row, only the first five columns are kept (Keyword, Position,
// Search Volume, CPC, URL).

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};

use kwcompare_engine::model::{
    format_number, Bucket, CompareReport, Field, KeywordTable, LoadIssueKind, MergedRow,
    SourceRow, REQUIRED_COLUMNS, SENTINEL,
};

use crate::loader::file_name_of;

/// Read one spreadsheet into a normalized keyword table.
pub fn read_table(path: &Path, source_index: usize) -> Result<KeywordTable, LoadIssueKind> {
    let read_err = |message: String| LoadIssueKind::Read { message };

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| read_err(format!("cannot open spreadsheet: {e}")))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first_sheet = sheet_names
        .first()
        .ok_or_else(|| read_err("spreadsheet contains no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|e| read_err(format!("cannot read sheet '{first_sheet}': {e}")))?;

    let (_, width) = range.get_size();
    if width < REQUIRED_COLUMNS {
        return Err(LoadIssueKind::Shape { columns: width });
    }

    let mut rows = Vec::new();
    for (row_idx, row) in range.rows().enumerate() {
        if row_idx == 0 {
            continue; // header row
        }
        let keyword = keyword_from_data(row.first());
        if keyword.is_empty() {
            continue;
        }
        rows.push(SourceRow {
            keyword,
            position: field_from_data(row.get(1)),
            search_volume: field_from_data(row.get(2)),
            cpc: field_from_data(row.get(3)),
            url: field_from_data(row.get(4)),
        });
    }

    Ok(KeywordTable {
        source_index,
        file_name: file_name_of(path),
        rows,
    })
}

/// Keyword column: coerce to text and trim. Numeric keywords keep their
/// integer spelling ("42", not "42.0").
fn keyword_from_data(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(n)) => format_number(*n),
        Some(Data::Int(n)) => n.to_string(),
        Some(Data::Bool(b)) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

fn field_from_data(cell: Option<&Data>) -> Field {
    match cell {
        None | Some(Data::Empty) => Field::Missing,
        Some(Data::String(s)) => field_from_str(s),
        Some(Data::Float(n)) => Field::Number(*n),
        Some(Data::Int(n)) => Field::Number(*n as f64),
        Some(Data::Bool(b)) => Field::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Some(Data::Error(e)) => Field::Text(format!("#{e:?}")),
        Some(Data::DateTime(dt)) => Field::Number(dt.as_f64()),
        Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => Field::Text(s.clone()),
    }
}

/// Numeric-looking text becomes a number so "3" and 3 merge identically.
pub(crate) fn field_from_str(s: &str) -> Field {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Field::Missing;
    }
    match trimmed.parse::<f64>() {
        Ok(n) => Field::Number(n),
        Err(_) => Field::Text(trimmed.to_string()),
    }
}

/// Build the three-sheet workbook in memory. Sheet order and names are part
/// of the output contract: "Client", "2+ Competitors", "1 Competitor".
pub fn export(report: &CompareReport) -> Result<Vec<u8>, String> {
    let mut workbook = XlsxWorkbook::new();
    let headers = report.header_row();

    for bucket in [Bucket::Client, Bucket::TwoPlusCompetitors, Bucket::OneCompetitor] {
        let worksheet = workbook
            .add_worksheet()
            .set_name(bucket.sheet_name())
            .map_err(|e| format!("cannot create sheet '{}': {e}", bucket.sheet_name()))?;
        write_bucket_sheet(worksheet, &headers, report.bucket_rows(bucket))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("cannot build XLSX workbook: {e}"))
}

/// Export and write to disk.
pub fn export_to_file(report: &CompareReport, path: &Path) -> Result<(), String> {
    let bytes = export(report)?;
    std::fs::write(path, bytes).map_err(|e| format!("cannot write {}: {e}", path.display()))
}

fn write_bucket_sheet(
    worksheet: &mut Worksheet,
    headers: &[String],
    rows: &[MergedRow],
) -> Result<(), String> {
    let cell_err = |e: rust_xlsxwriter::XlsxError| format!("cannot write cell: {e}");

    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, header, &bold)
            .map_err(cell_err)?;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        let out_row = (row_idx + 1) as u32;
        for (col, field) in row.output_fields().iter().enumerate() {
            let col = col as u16;
            match field {
                Field::Number(n) => worksheet.write_number(out_row, col, *n),
                Field::Text(s) => worksheet.write_string(out_row, col, s),
                Field::Missing => worksheet.write_string(out_row, col, SENTINEL),
            }
            .map_err(cell_err)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kwcompare_engine::model::LoadOutcome;
    use tempfile::tempdir;

    /// Write a five-column fixture with a header row. `None` leaves the
    /// position cell empty.
    fn write_fixture(path: &Path, rows: &[(&str, Option<f64>, Option<f64>, Option<f64>, &str)]) {
        let mut workbook = XlsxWorkbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["Keyword", "Position", "Search Volume", "CPC", "URL"]
            .iter()
            .enumerate()
        {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        for (i, (keyword, position, volume, cpc, url)) in rows.iter().enumerate() {
            let r = (i + 1) as u32;
            sheet.write_string(r, 0, *keyword).unwrap();
            if let Some(p) = position {
                sheet.write_number(r, 1, *p).unwrap();
            }
            if let Some(v) = volume {
                sheet.write_number(r, 2, *v).unwrap();
            }
            if let Some(c) = cpc {
                sheet.write_number(r, 3, *c).unwrap();
            }
            if !url.is_empty() {
                sheet.write_string(r, 4, *url).unwrap();
            }
        }
        workbook.save(path).unwrap();
    }

    #[test]
    fn read_skips_header_and_keeps_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client.xlsx");
        write_fixture(&path, &[
            ("shoes", Some(1.0), Some(900.0), Some(2.5), "https://a.com"),
            ("  boots  ", Some(4.0), None, None, ""),
        ]);

        let table = read_table(&path, 1).unwrap();
        assert_eq!(table.source_index, 1);
        assert_eq!(table.file_name, "client.xlsx");
        assert_eq!(table.rows.len(), 2);

        let shoes = &table.rows[0];
        assert_eq!(shoes.keyword, "shoes");
        assert_eq!(shoes.position, Field::Number(1.0));
        assert_eq!(shoes.url, Field::Text("https://a.com".to_string()));

        // Keyword trimmed, empty cells missing
        let boots = &table.rows[1];
        assert_eq!(boots.keyword, "boots");
        assert!(boots.search_volume.is_missing());
        assert!(boots.url.is_missing());
    }

    #[test]
    fn read_drops_rows_with_empty_keyword() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gaps.xlsx");
        write_fixture(&path, &[
            ("shoes", Some(1.0), None, None, ""),
            ("   ", Some(2.0), None, None, ""),
            ("hats", Some(3.0), None, None, ""),
        ]);

        let table = read_table(&path, 2).unwrap();
        let keywords: Vec<&str> = table.rows.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["shoes", "hats"]);
    }

    #[test]
    fn four_column_file_is_a_shape_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("narrow.xlsx");
        let mut workbook = XlsxWorkbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["Keyword", "Position", "Search Volume", "CPC"].iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        sheet.write_string(1, 0, "shoes").unwrap();
        sheet.write_number(1, 1, 1.0).unwrap();
        sheet.write_number(1, 2, 10.0).unwrap();
        sheet.write_number(1, 3, 0.5).unwrap();
        workbook.save(&path).unwrap();

        match read_table(&path, 1) {
            Err(LoadIssueKind::Shape { columns }) => assert_eq!(columns, 4),
            other => panic!("expected shape error, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"this is not a spreadsheet").unwrap();
        match read_table(&path, 1) {
            Err(LoadIssueKind::Read { .. }) => {}
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn numeric_text_parses_to_number() {
        assert_eq!(field_from_str("3.5"), Field::Number(3.5));
        assert_eq!(field_from_str(" 12 "), Field::Number(12.0));
        assert_eq!(field_from_str("top"), Field::Text("top".to_string()));
        assert_eq!(field_from_str("  "), Field::Missing);
    }

    #[test]
    fn export_writes_three_sheets_with_sentinels() {
        let dir = tempdir().unwrap();

        let client = dir.path().join("f1.xlsx");
        let comp_a = dir.path().join("f2.xlsx");
        let comp_b = dir.path().join("f3.xlsx");
        write_fixture(&client, &[("shoes", Some(1.0), Some(900.0), None, "c.com")]);
        write_fixture(&comp_a, &[
            ("shoes", Some(5.0), None, Some(3.5), "a.com"),
            ("boots", Some(2.0), None, None, ""),
        ]);
        write_fixture(&comp_b, &[("boots", Some(8.0), None, None, "b.com")]);

        let outcome = LoadOutcome {
            tables: vec![
                read_table(&client, 1).unwrap(),
                read_table(&comp_a, 2).unwrap(),
                read_table(&comp_b, 3).unwrap(),
            ],
            issues: vec![],
        };
        let report = kwcompare_engine::run(outcome).unwrap();

        let out = dir.path().join("combined.xlsx");
        export_to_file(&report, &out).unwrap();

        let mut workbook = open_workbook_auto(&out).unwrap();
        assert_eq!(
            workbook.sheet_names().to_vec(),
            vec!["Client", "2+ Competitors", "1 Competitor"],
        );

        let client_sheet = workbook.worksheet_range("Client").unwrap();
        let header: Vec<String> = client_sheet.rows().next().unwrap().iter().map(|c| c.to_string()).collect();
        assert_eq!(header, vec![
            "Keyword",
            "Position from Spreadsheet 1",
            "Position from Spreadsheet 2",
            "Position from Spreadsheet 3",
            "Search Volume",
            "CPC",
            "URL from Spreadsheet 1",
            "URL from Spreadsheet 2",
            "URL from Spreadsheet 3",
        ]);

        let shoes: Vec<Data> = client_sheet.rows().nth(1).unwrap().to_vec();
        assert_eq!(shoes[0], Data::String("shoes".to_string()));
        assert_eq!(shoes[1], Data::Float(1.0));
        // Missing slot for file 3 renders the sentinel
        assert_eq!(shoes[3], Data::String(SENTINEL.to_string()));
        // CPC reconciled from file 2
        assert_eq!(shoes[5], Data::Float(3.5));

        let two_plus = workbook.worksheet_range("2+ Competitors").unwrap();
        let boots: Vec<Data> = two_plus.rows().nth(1).unwrap().to_vec();
        assert_eq!(boots[0], Data::String("boots".to_string()));
        assert_eq!(boots[1], Data::String(SENTINEL.to_string()));
    }
}
