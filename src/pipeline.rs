// src/pipeline.rs

use log::info;
use std::path::Path;

use crate::constants::ULOG_EXTENSION;
use crate::data_input::log_data::ParsedLog;
use crate::data_input::log_info::open_log;
use crate::data_input::log_parser::LogReader;
use crate::error::{Error, Result};
use crate::registry::{AnalysisKind, TopicRequirements};
use crate::table::builder::build_topic_tables;
use crate::table::merge::{merge, FillPolicy};
use crate::table::namespace::namespace;
use crate::table::unified::UnifiedTable;

/// Rejects paths that do not exist or do not end in `.ulg` (any case).
pub fn check_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    let is_ulog = path
        .extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case(ULOG_EXTENSION));
    if !is_ulog {
        return Err(Error::NotULogFile(path.to_path_buf()));
    }
    Ok(())
}

/// A log resampled for one analysis: the unified table plus the parsed log it
/// came from.
#[derive(Debug, Clone)]
pub struct ResampledLog {
    pub kind: AnalysisKind,
    pub table: UnifiedTable,
    pub log: ParsedLog,
    pub topics: Vec<String>,
    pub requirements: TopicRequirements,
}

impl ResampledLog {
    /// Opens `path` and resamples the topics `kind` needs, plus `extra_topics`
    /// (`extra_zoh_topics` are held instead of interpolated).
    pub fn create<R: LogReader + ?Sized>(
        reader: &R,
        path: &Path,
        kind: AnalysisKind,
        extra_topics: &[String],
        extra_zoh_topics: &[String],
    ) -> Result<Self> {
        check_file(path)?;

        let requirements = kind
            .requirements()
            .with_additional(extra_topics, extra_zoh_topics);
        let topics = requirements.required_topics.clone();
        info!("Analysis '{}' reads topics: {}", kind, topics.join(", "));

        let log = open_log(reader, path, &topics)?;
        let tables = namespace(build_topic_tables(&log, &requirements));
        let policy = FillPolicy::resolve(&requirements, &tables);
        let table = merge(tables, &policy)?;
        info!(
            "Resampled {} rows x {} columns",
            table.len(),
            table.columns().len()
        );

        Ok(Self {
            kind,
            table,
            log,
            topics,
            requirements,
        })
    }
}


// src/pipeline.rs
