//! Merging an imported record array into a stored one.

use std::collections::HashMap;

use serde_json::Value;

use super::policy::MergePolicy;

/// Result of merging one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordMerge {
    /// Stored records first, then newly added ones.
    pub records: Vec<Value>,
    /// Imported records whose id was new.
    pub added: usize,
    /// Stored records whose content was replaced.
    pub replaced: usize,
    /// Imported elements dropped for lacking a usable id.
    pub rejected: usize,
}

impl RecordMerge {
    /// True if `records` differs from what was stored.
    pub fn changed(&self) -> bool {
        self.added > 0 || self.replaced > 0
    }
}

/// The id of a record: a non-empty string `id` on a JSON object.
pub fn record_id(record: &Value) -> Option<&str> {
    record
        .as_object()?
        .get("id")?
        .as_str()
        .filter(|id| !id.is_empty())
}

/// Merges `incoming` into `existing` under `policy`.
///
/// The result keeps every stored record in place and appends imported
/// records with ids not seen before, in import order. Ids are deduplicated
/// across both sides, including repeats inside `incoming`. With
/// [`MergePolicy::LastWriterWins`] an imported record with a known id
/// replaces the earlier one in place.
pub fn merge_records(existing: Vec<Value>, incoming: &[Value], policy: MergePolicy) -> RecordMerge {
    let stored_len = existing.len();
    let mut records = existing;

    let mut positions: HashMap<String, usize> = HashMap::new();
    for (pos, record) in records.iter().enumerate() {
        if let Some(id) = record_id(record) {
            positions.entry(id.to_string()).or_insert(pos);
        }
    }

    let mut originals: HashMap<usize, Value> = HashMap::new();
    let mut added = 0;
    let mut rejected = 0;

    for item in incoming {
        let Some(id) = record_id(item) else {
            rejected += 1;
            continue;
        };

        match positions.get(id).copied() {
            None => {
                positions.insert(id.to_string(), records.len());
                records.push(item.clone());
                added += 1;
            }
            Some(pos) => {
                if policy == MergePolicy::AppendOnly || records[pos] == *item {
                    continue;
                }
                if pos < stored_len {
                    originals
                        .entry(pos)
                        .or_insert_with(|| records[pos].clone());
                }
                records[pos] = item.clone();
            }
        }
    }

    let replaced = originals
        .iter()
        .filter(|(pos, original)| records[**pos] != **original)
        .count();

    RecordMerge {
        records,
        added,
        replaced,
        rejected,
    }
}
