// src/data_input/log_data.rs

use std::collections::BTreeMap;

/// A single logged value: a scalar or a fixed-size array.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(f64),
    Array(Vec<f64>),
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<Vec<f64>> for FieldValue {
    fn from(values: Vec<f64>) -> Self {
        FieldValue::Array(values)
    }
}

/// One message of a topic. `fields` keeps the logged field order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub timestamp: u64, // Microseconds since boot.
    pub fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new(timestamp: u64) -> Self {
        Self {
            timestamp,
            fields: Vec::new(),
        }
    }

    /// Builder-style helper used by readers and tests.
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// All messages of one topic instance, as handed over by the log parser.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTopicBatch {
    pub topic: String,
    pub instance: u32, // multi_id
    pub records: Vec<Record>,
}

impl RawTopicBatch {
    pub fn new(topic: &str, instance: u32, records: Vec<Record>) -> Self {
        Self {
            topic: topic.to_string(),
            instance,
            records,
        }
    }
}

/// A parameter change logged during the flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangedParam {
    pub timestamp: u64,
    pub name: String,
    pub value: f64,
}

/// The parsed log: topic batches plus parameters and log time span.
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    pub data_list: Vec<RawTopicBatch>,
    pub initial_parameters: BTreeMap<String, f64>,
    pub changed_parameters: Vec<ChangedParam>,
    pub start_timestamp: u64,
    pub last_timestamp: u64,
}

impl ParsedLog {
    /// First batch of `topic`, any instance.
    pub fn get_dataset(&self, topic: &str) -> Option<&RawTopicBatch> {
        self.data_list.iter().find(|batch| batch.topic == topic)
    }

    pub fn topic_names(&self) -> impl Iterator<Item = &str> {
        self.data_list.iter().map(|batch| batch.topic.as_str())
    }
}

// src/data_input/log_data.rs
