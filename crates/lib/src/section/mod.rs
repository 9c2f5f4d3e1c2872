//! Section computation.
//!
//! A [`SectionIndex`] partitions an ordered record collection into named
//! sections. It is rebuilt from scratch whenever the collection changes and
//! never edited in place, so two indexes can always be compared with
//! [`diff_sections`].

use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::Arc,
};

use crate::{
    KeyPath, SortDescriptor,
    record::{IndexPath, Record, RecordId},
    sort::sort_by_descriptors,
};

mod diff;
pub use diff::{SectionChange, SectionChangeType, diff_sections};

mod title;
pub use title::default_index_title;


/// One section of a controller's results.
pub struct SectionInfo<T> {
    name: String,
    index_title: String,
    objects: Arc<[Record<T>]>,
}

impl<T> SectionInfo<T> {
    pub fn new(
        name: impl Into<String>,
        index_title: impl Into<String>,
        objects: Vec<Record<T>>,
    ) -> Self {
        Self {
            name: name.into(),
            index_title: index_title.into(),
            objects: objects.into(),
        }
    }

    /// The section name, `""` for the single section of unsectioned results.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index_title(&self) -> &str {
        &self.index_title
    }

    pub fn number_of_objects(&self) -> usize {
        self.objects.len()
    }

    /// Objects of the section in row order.
    pub fn objects(&self) -> &[Record<T>] {
        &self.objects
    }

    pub fn object(&self, row: usize) -> Option<&Record<T>> {
        self.objects.get(row)
    }
}

impl<T> Clone for SectionInfo<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            index_title: self.index_title.clone(),
            objects: Arc::clone(&self.objects),
        }
    }
}

impl<T> fmt::Debug for SectionInfo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionInfo")
            .field("name", &self.name)
            .field("index_title", &self.index_title)
            .field("number_of_objects", &self.objects.len())
            .finish()
    }
}

/// Sections, index titles and reverse lookups derived from one collection.
pub struct SectionIndex<T> {
    sections: Vec<SectionInfo<T>>,
    titles: Vec<String>,
    title_sections: Vec<usize>,
    positions: HashMap<RecordId, IndexPath>,
}

impl<T> SectionIndex<T> {
    /// An index with no sections.
    pub fn empty() -> Self {
        Self {
            sections: Vec::new(),
            titles: Vec::new(),
            title_sections: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Partitions `records` into sections.
    ///
    /// Without `grouping` every record lands in one section named `""` with
    /// title `""`. With a section sort and section name key path, the records
    /// are stable-sorted by the section sort (records inside a section keep
    /// their input order) and a new section starts whenever the name changes.
    /// `title_for` is called once per section to derive its index title.
    ///
    /// An empty collection always yields an empty index.
    pub fn build(
        records: &[Record<T>],
        grouping: Option<(&SortDescriptor<T>, &KeyPath<T>)>,
        mut title_for: impl FnMut(&str) -> String,
    ) -> Self {
        if records.is_empty() {
            return Self::empty();
        }

        let sections = match grouping {
            None => vec![SectionInfo::new("", "", records.to_vec())],
            Some((section_sort, key_path)) => {
                let ordered = sort_by_descriptors(
                    records.to_vec(),
                    std::slice::from_ref(section_sort),
                    |r| r.object(),
                );
                group_by_name(ordered, key_path)
                    .into_iter()
                    .map(|(name, objects)| {
                        let title = title_for(&name);
                        SectionInfo::new(name, title, objects)
                    })
                    .collect()
            }
        };

        Self::from_sections(sections)
    }

    /// Builds an index over already computed sections.
    pub fn from_sections(sections: Vec<SectionInfo<T>>) -> Self {
        let mut titles = Vec::new();
        let mut title_sections = Vec::new();
        let mut seen_titles = HashSet::new();
        let mut positions = HashMap::new();

        for (section_index, section) in sections.iter().enumerate() {
            let title = section.index_title();
            if !title.is_empty() && seen_titles.insert(title.to_string()) {
                titles.push(title.to_string());
                title_sections.push(section_index);
            }
            for (row, record) in section.objects().iter().enumerate() {
                positions
                    .entry(record.id().clone())
                    .or_insert(IndexPath::new(section_index, row));
            }
        }

        Self {
            sections,
            titles,
            title_sections,
            positions,
        }
    }

    pub fn sections(&self) -> &[SectionInfo<T>] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&SectionInfo<T>> {
        self.sections.get(index)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Deduplicated index titles in first-seen order. Empty titles are omitted.
    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    /// First section carrying the title at `title_index`.
    pub fn section_for_title_index(&self, title_index: usize) -> Option<usize> {
        self.title_sections.get(title_index).copied()
    }

    pub fn object(&self, path: IndexPath) -> Option<&Record<T>> {
        self.sections.get(path.section)?.object(path.row)
    }

    pub fn index_path_of(&self, id: &RecordId) -> Option<IndexPath> {
        self.positions.get(id).copied()
    }

    /// Whether both indexes have the same section names, order and counts.
    pub fn same_shape(&self, other: &SectionIndex<T>) -> bool {
        self.sections.len() == other.sections.len()
            && self
                .sections
                .iter()
                .zip(&other.sections)
                .all(|(a, b)| a.name == b.name && a.objects.len() == b.objects.len())
    }

    /// Every record in section order.
    pub fn flatten(&self) -> Vec<Record<T>> {
        self.sections
            .iter()
            .flat_map(|s| s.objects().iter().cloned())
            .collect()
    }
}

impl<T> Clone for SectionIndex<T> {
    fn clone(&self) -> Self {
        Self {
            sections: self.sections.clone(),
            titles: self.titles.clone(),
            title_sections: self.title_sections.clone(),
            positions: self.positions.clone(),
        }
    }
}

impl<T> fmt::Debug for SectionIndex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionIndex")
            .field("sections", &self.sections)
            .field("titles", &self.titles)
            .finish_non_exhaustive()
    }
}

/// Splits section-ordered records into runs of equal section name.
fn group_by_name<T>(
    ordered: Vec<Record<T>>,
    key_path: &KeyPath<T>,
) -> Vec<(String, Vec<Record<T>>)> {
    let mut groups: Vec<(String, Vec<Record<T>>)> = Vec::new();
    let mut closed: HashSet<String> = HashSet::new();

    for record in ordered {
        let name = key_path.section_name(record.object());
        match groups.last_mut() {
            Some((current, objects)) if *current == name => objects.push(record),
            last => {
                if let Some((previous, _)) = last {
                    closed.insert(previous.clone());
                }
                if closed.contains(&name) {
                    tracing::warn!(
                        "Section '{name}' is not contiguous under the section sort on '{}'; starting a new section",
                        key_path.path()
                    );
                }
                groups.push((name, vec![record]));
            }
        }
    }

    groups
}
