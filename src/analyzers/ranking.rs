//! Ranking and top/bottom-N selection over dimension aggregates.

use std::collections::HashMap;

use crate::analyzers::types::RankedEntry;

/// Assigns min-tie ranks: tied values share the lowest rank among them and
/// the next distinct value resumes at its positional rank.
fn assign_ranks(values: &[f64], ascending: bool) -> Vec<u32> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        if ascending {
            values[a].total_cmp(&values[b])
        } else {
            values[b].total_cmp(&values[a])
        }
    });

    let mut ranks = vec![0u32; values.len()];
    for (position, &index) in order.iter().enumerate() {
        if position > 0 && values[index] == values[order[position - 1]] {
            ranks[index] = ranks[order[position - 1]];
        } else {
            ranks[index] = position as u32 + 1;
        }
    }
    ranks
}

/// Ranks aggregates best-first. With `ascending = false` the largest value
/// ranks 1; ties share the lowest rank (values [100, 100, 80] descending
/// yield ranks [1, 1, 3]).
pub fn rank(aggregates: &[(String, f64)], ascending: bool) -> Vec<RankedEntry> {
    let values: Vec<f64> = aggregates.iter().map(|(_, v)| *v).collect();
    let ranks = assign_ranks(&values, ascending);

    let mut entries: Vec<RankedEntry> = aggregates
        .iter()
        .zip(ranks)
        .map(|((key, value), rank)| RankedEntry {
            key: key.clone(),
            value: *value,
            rank,
        })
        .collect();

    entries.sort_by_key(|entry| entry.rank);
    entries
}

/// The `n` largest aggregates, best first.
pub fn top_n(aggregates: &[(String, f64)], n: usize) -> Vec<(String, f64)> {
    let mut sorted = aggregates.to_vec();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
    sorted.truncate(n);
    sorted
}

/// The `n` smallest aggregates, smallest first.
///
/// With `exclude_nonpositive` set, entries with value ≤ 0 are removed
/// before selection: zero or negative aggregates represent absent
/// activity, not poor performance, and would otherwise dominate a
/// bottom-performers view. Fewer than `n` qualifying entries yield a
/// shorter list, never padding.
pub fn bottom_n(
    aggregates: &[(String, f64)],
    n: usize,
    exclude_nonpositive: bool,
) -> Vec<(String, f64)> {
    let mut sorted: Vec<(String, f64)> = aggregates
        .iter()
        .filter(|(_, value)| !exclude_nonpositive || *value > 0.0)
        .cloned()
        .collect();
    sorted.sort_by(|a, b| a.1.total_cmp(&b.1));
    sorted.truncate(n);
    sorted
}

/// Min-tie ranks computed independently within each partition label,
/// aligned with the input order. Ranks restart at 1 per partition.
pub fn rank_partitioned(partitions: &[String], values: &[f64], ascending: bool) -> Vec<u32> {
    let mut by_partition: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, partition) in partitions.iter().enumerate() {
        by_partition.entry(partition.as_str()).or_default().push(index);
    }

    let mut ranks = vec![0u32; values.len()];
    for indices in by_partition.values() {
        let partition_values: Vec<f64> = indices.iter().map(|&i| values[i]).collect();
        for (&index, rank) in indices.iter().zip(assign_ranks(&partition_values, ascending)) {
            ranks[index] = rank;
        }
    }
    ranks
}
