//! On-screen preview tables: the first rows of each bucket, width-aligned.

use kwcompare_engine::model::{CompareReport, MergedRow};

use crate::util::{display_width, pad_right};

/// Cap per-column width so long URLs don't blow out the terminal.
const MAX_COL_WIDTH: usize = 40;

pub fn print_report(report: &CompareReport, rows_per_bucket: usize) {
    let headers = report.header_row();
    print_bucket("Client Keywords", &report.client, &headers, rows_per_bucket);
    print_bucket(
        "2+ Competitors (Not in Client)",
        &report.two_plus_competitors,
        &headers,
        rows_per_bucket,
    );
    print_bucket(
        "Only 1 Competitor (Not in Client)",
        &report.one_competitor,
        &headers,
        rows_per_bucket,
    );
}

fn print_bucket(title: &str, rows: &[MergedRow], headers: &[String], limit: usize) {
    let shown = rows.len().min(limit);
    println!();
    println!("{title} — showing {shown} of {} rows", rows.len());

    let mut grid: Vec<Vec<String>> = Vec::with_capacity(shown + 1);
    grid.push(headers.to_vec());
    for row in rows.iter().take(limit) {
        grid.push(row.output_fields().iter().map(|f| f.display()).collect());
    }

    let cols = headers.len();
    let mut widths = vec![0usize; cols];
    for line in &grid {
        for (c, cell) in line.iter().enumerate() {
            widths[c] = widths[c].max(display_width(cell).min(MAX_COL_WIDTH));
        }
    }

    for (i, line) in grid.iter().enumerate() {
        let rendered: Vec<String> = line
            .iter()
            .enumerate()
            .map(|(c, cell)| pad_right(cell, widths[c]))
            .collect();
        println!("  {}", rendered.join("  "));
        if i == 0 {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            println!("  {}", rule.join("  "));
        }
    }
}
