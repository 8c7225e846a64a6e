// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading, merging and analysing a log.
#[derive(Debug, Error)]
pub enum Error {
    #[error("file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("file is not a .ulg file: {}", .0.display())]
    NotULogFile(PathBuf),

    #[error("not a single requested topic is present in the log")]
    NoTopicPresent,

    #[error("the following topics do not exist in the log: {}", .0.join(", "))]
    MissingTopics(Vec<String>),

    #[error("cannot merge an empty set of topic tables")]
    EmptyMerge,

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("column {name} has {actual} rows, table has {expected}")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("column already exists: {0}")]
    DuplicateColumn(String),

    #[error("invalid value {value:?} for {field} in {}", .path.display())]
    InvalidValue {
        path: PathBuf,
        field: String,
        value: String,
    },

    #[error("latitude {0} is outside the UTM range")]
    LatitudeOutOfRange(f64),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

// src/error.rs
