use rustc_hash::FxHashSet;

use crate::classify::classify;
use crate::error::CompareError;
use crate::merge::{merge_tables, reconcile};
use crate::model::{CompareMeta, CompareReport, CompareSummary, LoadOutcome, SourceMeta};

/// Run the comparison over pre-loaded tables. Returns the classified report.
///
/// The client reference set comes from the first successfully loaded table:
/// by convention the first upload is the client file, and when it was
/// skipped the next loaded file takes its place as the baseline.
pub fn run(input: LoadOutcome) -> Result<CompareReport, CompareError> {
    if input.tables.is_empty() {
        return Err(CompareError::NoValidFiles);
    }

    let client_keywords: FxHashSet<String> = input.tables[0]
        .rows
        .iter()
        .map(|r| r.keyword.clone())
        .collect();

    let mut rows = merge_tables(&input.tables);
    reconcile(&mut rows);
    let total_keywords = rows.len();

    let buckets = classify(rows, &client_keywords);

    let summary = CompareSummary {
        total_keywords,
        client: buckets.client.len(),
        two_plus_competitors: buckets.two_plus_competitors.len(),
        one_competitor: buckets.one_competitor.len(),
        unranked_dropped: buckets.unranked_dropped,
    };

    let sources = input
        .tables
        .iter()
        .map(|t| SourceMeta {
            source_index: t.source_index,
            file_name: t.file_name.clone(),
            rows_loaded: t.rows.len(),
        })
        .collect();

    Ok(CompareReport {
        meta: CompareMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            sources,
        },
        summary,
        source_indexes: input.tables.iter().map(|t| t.source_index).collect(),
        client: buckets.client,
        two_plus_competitors: buckets.two_plus_competitors,
        one_competitor: buckets.one_competitor,
        issues: input.issues,
    })
}
