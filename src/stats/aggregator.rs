//! Statistics Aggregator
//!
//! Pure rollups over core records the caller has already fetched and
//! filtered. Counts include every record; means skip records whose
//! designated numeric field is absent or non-numeric; records without the
//! categorical field fall into no group.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::CoreRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub count: usize,
    pub mean: f64,
}

/// Rollup over one candidate set: total count, mean of the numeric field,
/// and per-group counts/means keyed by the categorical field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    pub count: usize,
    pub mean: f64,
    pub groups: BTreeMap<String, GroupStats>,
}

/// Compute the summary. An empty input is a valid case: count 0, mean 0.0
/// (never NaN), empty group map. No group is fabricated — only values
/// actually present become keys.
pub fn summarize<'a>(
    records: impl IntoIterator<Item = &'a CoreRecord>,
    numeric_field: &str,
    group_field: &str,
) -> StatsSummary {
    let mut count = 0usize;
    let mut sum = 0.0f64;
    let mut numeric_count = 0usize;

    struct Bucket {
        count: usize,
        sum: f64,
        numeric_count: usize,
    }
    let mut buckets: BTreeMap<String, Bucket> = BTreeMap::new();

    for record in records {
        count += 1;
        let numeric = record.field(numeric_field).and_then(|v| v.as_f64());
        if let Some(value) = numeric {
            sum += value;
            numeric_count += 1;
        }

        let Some(group) = record.field(group_field).filter(|v| !v.is_null()) else {
            continue;
        };
        let bucket = buckets.entry(group.to_string()).or_insert(Bucket {
            count: 0,
            sum: 0.0,
            numeric_count: 0,
        });
        bucket.count += 1;
        if let Some(value) = numeric {
            bucket.sum += value;
            bucket.numeric_count += 1;
        }
    }

    StatsSummary {
        count,
        mean: mean(sum, numeric_count),
        groups: buckets
            .into_iter()
            .map(|(key, bucket)| {
                (
                    key,
                    GroupStats {
                        count: bucket.count,
                        mean: mean(bucket.sum, bucket.numeric_count),
                    },
                )
            })
            .collect(),
    }
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}
