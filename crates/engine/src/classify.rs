use rustc_hash::FxHashSet;

use crate::model::{Bucket, Buckets, MergedRow};

/// Bucket for one merged row, or `None` when the row belongs to no bucket
/// (absent from the client file with zero appearances — possible when a
/// keyword's position cell is empty in every file that lists it).
pub fn bucket_for(row: &MergedRow, client_keywords: &FxHashSet<String>) -> Option<Bucket> {
    if client_keywords.contains(&row.keyword) {
        Some(Bucket::Client)
    } else if row.appearances >= 2 {
        Some(Bucket::TwoPlusCompetitors)
    } else if row.appearances == 1 {
        Some(Bucket::OneCompetitor)
    } else {
        None
    }
}

/// Partition reconciled rows into the three buckets, preserving merge order.
pub fn classify(rows: Vec<MergedRow>, client_keywords: &FxHashSet<String>) -> Buckets {
    let mut buckets = Buckets::default();
    for row in rows {
        match bucket_for(&row, client_keywords) {
            Some(Bucket::Client) => buckets.client.push(row),
            Some(Bucket::TwoPlusCompetitors) => buckets.two_plus_competitors.push(row),
            Some(Bucket::OneCompetitor) => buckets.one_competitor.push(row),
            None => buckets.unranked_dropped += 1,
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    fn merged(keyword: &str, positions: Vec<Option<f64>>) -> MergedRow {
        let mut row = MergedRow::new(keyword.to_string(), positions.len());
        for (i, p) in positions.into_iter().enumerate() {
            row.positions[i] = p.map(Field::Number).unwrap_or(Field::Missing);
        }
        row.appearances = row.positions.iter().filter(|p| !p.is_missing()).count();
        row
    }

    fn client_set(keywords: &[&str]) -> FxHashSet<String> {
        keywords.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn client_keyword_always_client_bucket() {
        let clients = client_set(&["shoes"]);
        // Present everywhere, still Client.
        let row = merged("shoes", vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert_eq!(bucket_for(&row, &clients), Some(Bucket::Client));
        // Present only in the client file.
        let row = merged("shoes", vec![Some(1.0), None, None]);
        assert_eq!(bucket_for(&row, &clients), Some(Bucket::Client));
    }

    #[test]
    fn non_client_split_by_appearances() {
        let clients = client_set(&["shoes"]);
        let two = merged("boots", vec![None, Some(2.0), Some(8.0)]);
        assert_eq!(bucket_for(&two, &clients), Some(Bucket::TwoPlusCompetitors));
        let one = merged("hats", vec![None, None, Some(3.0)]);
        assert_eq!(bucket_for(&one, &clients), Some(Bucket::OneCompetitor));
    }

    #[test]
    fn zero_appearances_outside_client_has_no_bucket() {
        let clients = client_set(&["shoes"]);
        let orphan = merged("gloves", vec![None, None, None]);
        assert_eq!(bucket_for(&orphan, &clients), None);

        let buckets = classify(vec![orphan], &clients);
        assert!(buckets.client.is_empty());
        assert!(buckets.two_plus_competitors.is_empty());
        assert!(buckets.one_competitor.is_empty());
        assert_eq!(buckets.unranked_dropped, 1);
    }

    #[test]
    fn classify_preserves_merge_order() {
        let clients = client_set(&["a", "c"]);
        let rows = vec![
            merged("a", vec![Some(1.0), None]),
            merged("b", vec![None, Some(2.0)]),
            merged("c", vec![Some(3.0), None]),
            merged("d", vec![None, Some(4.0)]),
        ];
        let buckets = classify(rows, &clients);
        let client: Vec<&str> = buckets.client.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(client, vec!["a", "c"]);
        let one: Vec<&str> = buckets.one_competitor.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(one, vec!["b", "d"]);
    }
}
