//! Section-level diffing between two computed section lists.
//!
//! Sections are matched by name. When a name occurs more than once in a list
//! (possible only when the section sort does not keep equal names together)
//! occurrences are matched in order: the second `"a"` before is the second
//! `"a"` after.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use super::SectionInfo;

/// Kind of a section-level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionChangeType {
    /// A section appeared; the index refers to the new section list.
    Insert,
    /// A section disappeared; the index refers to the previous section list.
    Delete,
    /// A section kept its name but its number of objects changed; the index
    /// refers to the new section list.
    CountChange,
}

impl SectionChangeType {
    /// Numeric code of the change type, matching the codes list views use for
    /// insert (1), delete (2) and update (5, since 3 and 4 are row moves and
    /// row updates).
    pub fn code(&self) -> u8 {
        match self {
            SectionChangeType::Insert => 1,
            SectionChangeType::Delete => 2,
            SectionChangeType::CountChange => 5,
        }
    }
}

impl fmt::Display for SectionChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SectionChangeType::Insert => "insert",
            SectionChangeType::Delete => "delete",
            SectionChangeType::CountChange => "count-change",
        };
        f.write_str(s)
    }
}

/// One section-level change produced by [`diff_sections`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionChange {
    pub change_type: SectionChangeType,
    /// Previous index for deletes, new index otherwise.
    pub index: usize,
    pub name: String,
}

/// Name plus occurrence number; `("a", 1)` is the second section named "a".
type SectionKey<'a> = (&'a str, usize);

fn keyed<T>(sections: &[SectionInfo<T>]) -> Vec<SectionKey<'_>> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    sections
        .iter()
        .map(|s| {
            let n = seen.entry(s.name()).or_insert(0);
            let key = (s.name(), *n);
            *n += 1;
            key
        })
        .collect()
}

/// Computes the section-level changes turning `previous` into `current`.
///
/// Deletes come first in ascending previous index, followed by inserts and
/// count changes in ascending new index. Sections whose name and count are
/// unchanged produce nothing, even if they moved.
pub fn diff_sections<T>(
    previous: &[SectionInfo<T>],
    current: &[SectionInfo<T>],
) -> Vec<SectionChange> {
    let previous_keys = keyed(previous);
    let current_keys = keyed(current);

    let previous_counts: HashMap<SectionKey<'_>, usize> = previous_keys
        .iter()
        .zip(previous)
        .map(|(key, s)| (*key, s.number_of_objects()))
        .collect();
    let current_lookup: HashMap<SectionKey<'_>, usize> = current_keys
        .iter()
        .enumerate()
        .map(|(i, key)| (*key, i))
        .collect();

    let mut changes = Vec::new();

    for (index, key) in previous_keys.iter().enumerate() {
        if !current_lookup.contains_key(key) {
            changes.push(SectionChange {
                change_type: SectionChangeType::Delete,
                index,
                name: key.0.to_string(),
            });
        }
    }

    for (index, (key, section)) in current_keys.iter().zip(current).enumerate() {
        let change_type = match previous_counts.get(key) {
            None => SectionChangeType::Insert,
            Some(&count) if count != section.number_of_objects() => {
                SectionChangeType::CountChange
            }
            Some(_) => continue,
        };
        changes.push(SectionChange {
            change_type,
            index,
            name: key.0.to_string(),
        });
    }

    changes
}
