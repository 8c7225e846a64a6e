// src/registry.rs

use std::fmt;

/// Fields of a topic whose NaN values mean "not used" rather than "not sampled".
/// An empty `msgs` list covers every field of the topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMsgs {
    pub topic: String,
    pub msgs: Vec<String>,
}

impl TopicMsgs {
    pub fn new(topic: &str, msgs: &[&str]) -> Self {
        Self {
            topic: topic.to_string(),
            msgs: msgs.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// What one analysis needs from a log.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopicRequirements {
    /// Every one of these must be present or the run fails.
    pub required_topics: Vec<String>,
    /// Resampled by hold-last-value instead of linear interpolation.
    pub zoh_topics: Vec<String>,
    pub nan_topic_msgs: Vec<TopicMsgs>,
}

impl TopicRequirements {
    /// Adds caller-supplied topics and hold topics, skipping ones already listed.
    pub fn with_additional(mut self, topics: &[String], zoh_topics: &[String]) -> Self {
        for topic in topics {
            if !self.required_topics.contains(topic) {
                self.required_topics.push(topic.clone());
            }
        }
        for topic in zoh_topics {
            if !self.zoh_topics.contains(topic) {
                self.zoh_topics.push(topic.clone());
            }
        }
        self
    }

    pub fn is_zoh_topic(&self, topic: &str) -> bool {
        self.zoh_topics.iter().any(|t| t == topic)
    }

    /// NaN-bearing fields declared for `topic`, if any declaration exists.
    pub fn nan_fields(&self, topic: &str) -> Option<&[String]> {
        self.nan_topic_msgs
            .iter()
            .find(|t| t.topic == topic)
            .map(|t| t.msgs.as_slice())
    }
}

fn topics(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// The analyses this crate knows about. Each one only contributes data; the
/// table pipeline is identical for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum AnalysisKind {
    LocalPosition,
    Attitude,
    GlobalPosition,
    VehicleStatus,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 4] = [
        AnalysisKind::LocalPosition,
        AnalysisKind::Attitude,
        AnalysisKind::GlobalPosition,
        AnalysisKind::VehicleStatus,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AnalysisKind::LocalPosition => "local_position",
            AnalysisKind::Attitude => "attitude",
            AnalysisKind::GlobalPosition => "global_position",
            AnalysisKind::VehicleStatus => "vehicle_status",
        }
    }

    pub fn requirements(&self) -> TopicRequirements {
        match self {
            AnalysisKind::LocalPosition => TopicRequirements {
                required_topics: topics(&[
                    "vehicle_local_position",
                    "vehicle_local_position_setpoint",
                ]),
                zoh_topics: Vec::new(),
                // NaN setpoint axes are not controlled.
                nan_topic_msgs: vec![TopicMsgs::new(
                    "vehicle_local_position_setpoint",
                    &["x", "y", "z"],
                )],
            },
            AnalysisKind::Attitude => TopicRequirements {
                required_topics: topics(&["vehicle_attitude", "vehicle_attitude_setpoint"]),
                zoh_topics: Vec::new(),
                nan_topic_msgs: Vec::new(),
            },
            AnalysisKind::GlobalPosition => {
                let required = topics(&[
                    "vehicle_global_position",
                    "vehicle_local_position",
                    "position_setpoint_triplet",
                ]);
                TopicRequirements {
                    zoh_topics: required.clone(),
                    required_topics: required,
                    nan_topic_msgs: Vec::new(),
                }
            }
            AnalysisKind::VehicleStatus => TopicRequirements {
                required_topics: topics(&[
                    "vehicle_local_position",
                    "vehicle_local_position_setpoint",
                    "vehicle_status",
                ]),
                // nav_state is discrete.
                zoh_topics: topics(&["vehicle_status"]),
                nan_topic_msgs: vec![TopicMsgs::new(
                    "vehicle_local_position_setpoint",
                    &["x", "y", "z"],
                )],
            },
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}


// src/registry.rs
