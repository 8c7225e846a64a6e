// src/table/mod.rs

pub mod builder;
pub mod merge;
pub mod namespace;
pub mod sample;
pub mod topic_table;
pub mod unified;

// src/table/mod.rs
