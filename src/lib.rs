// src/lib.rs - Library interface for the resampling pipeline and analyses

pub mod axis_names;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod table;

pub use data_input::log_parser::{CsvLogReader, LogReader};
pub use error::{Error, Result};
pub use pipeline::ResampledLog;
pub use registry::{AnalysisKind, TopicMsgs, TopicRequirements};
pub use table::merge::{merge, FillMethod, FillPolicy};
pub use table::unified::UnifiedTable;

pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

// src/lib.rs
