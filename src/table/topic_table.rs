// src/table/topic_table.rs

use std::time::Duration;

use crate::table::sample::Sample;

/// Derives the duration index from microsecond timestamps. Only used for
/// slicing and display; joins always use the raw timestamps.
pub fn duration_index(timestamps: &[u64]) -> Vec<Duration> {
    timestamps.iter().map(|&t| Duration::from_micros(t)).collect()
}

/// A named column of tri-state samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub samples: Vec<Sample>,
}

impl Column {
    pub fn new(name: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }
}

/// The normalized table of one topic instance, named `T_<topic>_<instance>`.
/// Column names are unique and never include `timestamp`.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicTable {
    pub(crate) name: String,
    pub(crate) topic: String,
    pub(crate) instance: u32,
    pub(crate) timestamps: Vec<u64>,
    pub(crate) index: Vec<Duration>,
    pub(crate) columns: Vec<Column>,
}

impl TopicTable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn instance(&self) -> u32 {
        self.instance
    }

    pub fn timestamps(&self) -> &[u64] {
        &self.timestamps
    }

    pub fn index(&self) -> &[Duration] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// A topic table whose columns carry the `<table>__` prefix. Only produced by
/// [`crate::table::namespace::namespace`], so a table cannot be prefixed twice.
#[derive(Debug, Clone, PartialEq)]
pub struct NamespacedTable {
    pub(crate) table: TopicTable,
}

impl NamespacedTable {
    pub fn name(&self) -> &str {
        self.table.name()
    }

    pub fn topic(&self) -> &str {
        self.table.topic()
    }

    pub fn timestamps(&self) -> &[u64] {
        self.table.timestamps()
    }

    pub fn columns(&self) -> &[Column] {
        self.table.columns()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.table.column(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.table.column_names()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn into_inner(self) -> TopicTable {
        self.table
    }
}

// src/table/topic_table.rs
