use serde::{Serialize, Serializer};

/// Rendered form of a missing value. Only applied at the edges (export,
/// preview, JSON) so a genuine keyword or URL equal to "N/A" is never
/// confused with an absent cell.
pub const SENTINEL: &str = "N/A";

/// Number of leading columns read from every input file:
/// Keyword, Position, Search Volume, CPC, URL. Extras are ignored.
pub const REQUIRED_COLUMNS: usize = 5;

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// A single loaded cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Number(f64),
    Text(String),
    Missing,
}

impl Field {
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    /// Display form: integers without decimals, sentinel for missing cells.
    pub fn display(&self) -> String {
        match self {
            Field::Number(n) => format_number(*n),
            Field::Text(s) => s.clone(),
            Field::Missing => SENTINEL.to_string(),
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Number(n) => serializer.serialize_f64(*n),
            Field::Text(s) => serializer.serialize_str(s),
            Field::Missing => serializer.serialize_str(SENTINEL),
        }
    }
}

/// Format a number the way it reads in a spreadsheet: integers without decimals.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One normalized row of an input file. The keyword is trimmed and non-empty.
#[derive(Debug, Clone)]
pub struct SourceRow {
    pub keyword: String,
    pub position: Field,
    pub search_volume: Field,
    pub cpc: Field,
    pub url: Field,
}

/// One successfully loaded input file.
///
/// `source_index` is the 1-based upload position and is preserved across
/// skipped files, so output columns stay labeled by the index the user
/// supplied ("Position from Spreadsheet 3" even if file 2 was skipped).
#[derive(Debug, Clone)]
pub struct KeywordTable {
    pub source_index: usize,
    pub file_name: String,
    pub rows: Vec<SourceRow>,
}

/// Why a file was skipped. Non-fatal: the run continues without it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadIssueKind {
    /// Fewer than the required five columns.
    Shape { columns: usize },
    /// Open/parse failure (corrupt file, unsupported format).
    Read { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadIssue {
    pub file_name: String,
    pub kind: LoadIssueKind,
}

impl std::fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            LoadIssueKind::Shape { columns } => {
                write!(f, "{} has fewer than 5 columns ({} found)", self.file_name, columns)
            }
            LoadIssueKind::Read { message } => {
                write!(f, "cannot read {}: {}", self.file_name, message)
            }
        }
    }
}

/// Loader output handed to the engine: tables in upload order plus the
/// issues for files that were skipped.
#[derive(Debug)]
pub struct LoadOutcome {
    pub tables: Vec<KeywordTable>,
    pub issues: Vec<LoadIssue>,
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// One row per distinct trimmed keyword across all loaded files.
///
/// The per-file slot vectors are parallel to `LoadOutcome::tables`.
/// `search_volume`, `cpc` and `appearances` are filled by the reconciler.
#[derive(Debug, Clone, Serialize)]
pub struct MergedRow {
    pub keyword: String,
    pub positions: Vec<Field>,
    #[serde(skip)]
    pub volumes: Vec<Field>,
    #[serde(skip)]
    pub cpcs: Vec<Field>,
    pub urls: Vec<Field>,
    pub search_volume: Field,
    pub cpc: Field,
    #[serde(skip)]
    pub appearances: usize,
}

impl MergedRow {
    pub fn new(keyword: String, slots: usize) -> Self {
        Self {
            keyword,
            positions: vec![Field::Missing; slots],
            volumes: vec![Field::Missing; slots],
            cpcs: vec![Field::Missing; slots],
            urls: vec![Field::Missing; slots],
            search_volume: Field::Missing,
            cpc: Field::Missing,
            appearances: 0,
        }
    }

    /// Cells in the shared output shape: Keyword, Position_1..n,
    /// Search Volume, CPC, URL_1..n. Appearances is not part of the shape.
    pub fn output_fields(&self) -> Vec<Field> {
        let mut cells = Vec::with_capacity(3 + 2 * self.positions.len());
        cells.push(Field::Text(self.keyword.clone()));
        cells.extend(self.positions.iter().cloned());
        cells.push(self.search_volume.clone());
        cells.push(self.cpc.clone());
        cells.extend(self.urls.iter().cloned());
        cells
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Client,
    TwoPlusCompetitors,
    OneCompetitor,
}

impl Bucket {
    /// Sheet name in the exported workbook.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Self::Client => "Client",
            Self::TwoPlusCompetitors => "2+ Competitors",
            Self::OneCompetitor => "1 Competitor",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// Disjoint partition of merged rows, each bucket in merge order.
#[derive(Debug, Default)]
pub struct Buckets {
    pub client: Vec<MergedRow>,
    pub two_plus_competitors: Vec<MergedRow>,
    pub one_competitor: Vec<MergedRow>,
    /// Rows absent from the client file whose position was missing in every
    /// contributing file. They belong to no bucket and are dropped.
    pub unranked_dropped: usize,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SourceMeta {
    pub source_index: usize,
    pub file_name: String,
    pub rows_loaded: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareMeta {
    pub engine_version: String,
    pub run_at: String,
    pub sources: Vec<SourceMeta>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareSummary {
    /// Distinct keywords across all loaded files (before the unranked drop).
    pub total_keywords: usize,
    pub client: usize,
    pub two_plus_competitors: usize,
    pub one_competitor: usize,
    pub unranked_dropped: usize,
}

#[derive(Debug, Serialize)]
pub struct CompareReport {
    pub meta: CompareMeta,
    pub summary: CompareSummary,
    /// Upload index of each loaded file, parallel to the row slot vectors.
    pub source_indexes: Vec<usize>,
    pub client: Vec<MergedRow>,
    pub two_plus_competitors: Vec<MergedRow>,
    pub one_competitor: Vec<MergedRow>,
    pub issues: Vec<LoadIssue>,
}

impl CompareReport {
    /// Header row shared by all three sheets, labeled by upload index.
    pub fn header_row(&self) -> Vec<String> {
        let mut headers = Vec::with_capacity(3 + 2 * self.source_indexes.len());
        headers.push("Keyword".to_string());
        for i in &self.source_indexes {
            headers.push(format!("Position from Spreadsheet {i}"));
        }
        headers.push("Search Volume".to_string());
        headers.push("CPC".to_string());
        for i in &self.source_indexes {
            headers.push(format!("URL from Spreadsheet {i}"));
        }
        headers
    }

    pub fn bucket_rows(&self, bucket: Bucket) -> &[MergedRow] {
        match bucket {
            Bucket::Client => &self.client,
            Bucket::TwoPlusCompetitors => &self.two_plus_competitors,
            Bucket::OneCompetitor => &self.one_competitor,
        }
    }
}
