use rustc_hash::{FxHashMap, FxHashSet};

use crate::model::{Field, KeywordTable, MergedRow};

/// Outer-join all tables on the trimmed keyword, in upload order.
///
/// Iterative equivalent of repeated pairwise outer joins with the left table
/// accumulating: the first occurrence of a keyword fixes its output position,
/// so earlier tables' keys come first in their row order and keys new to a
/// later table are appended in that table's row order. One slot per loaded
/// table; slots stay `Missing` where the keyword is absent.
///
/// Duplicate keywords within one file: the first row wins its slot.
pub fn merge_tables(tables: &[KeywordTable]) -> Vec<MergedRow> {
    let slots = tables.len();
    let mut rows: Vec<MergedRow> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();

    for (slot, table) in tables.iter().enumerate() {
        let mut seen_in_table: FxHashSet<&str> = FxHashSet::default();
        for source in &table.rows {
            if !seen_in_table.insert(&source.keyword) {
                continue;
            }
            let row_idx = *index.entry(source.keyword.clone()).or_insert_with(|| {
                rows.push(MergedRow::new(source.keyword.clone(), slots));
                rows.len() - 1
            });
            let row = &mut rows[row_idx];
            row.positions[slot] = source.position.clone();
            row.volumes[slot] = source.search_volume.clone();
            row.cpcs[slot] = source.cpc.clone();
            row.urls[slot] = source.url.clone();
        }
    }

    rows
}

/// Fill the reconciled fields on every merged row: first non-missing search
/// volume and CPC scanning slots in upload order, and the appearance count.
///
/// Presence is defined solely by the position slot being non-missing; URL
/// slots are never consulted.
pub fn reconcile(rows: &mut [MergedRow]) {
    for row in rows.iter_mut() {
        row.search_volume = first_available(&row.volumes);
        row.cpc = first_available(&row.cpcs);
        row.appearances = row.positions.iter().filter(|p| !p.is_missing()).count();
    }
}

fn first_available(slots: &[Field]) -> Field {
    slots
        .iter()
        .find(|f| !f.is_missing())
        .cloned()
        .unwrap_or(Field::Missing)
}
