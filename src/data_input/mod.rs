// src/data_input/mod.rs

pub mod log_data;
pub mod log_info;
pub mod log_parser;

// src/data_input/mod.rs
