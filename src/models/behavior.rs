//! Behavior record payloads.

use serde::Deserialize;

/// Response of `v1/students/{id}/behaviors`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BehaviorList {
    #[serde(default)]
    pub behaviors: Vec<BehaviorRecord>,
}

/// A single behavior record (praise, note, reprimand).
#[derive(Debug, Clone, Deserialize)]
pub struct BehaviorRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "kindOfBehaviorName", default)]
    pub kind_of_behavior_name: Option<String>,
    #[serde(rename = "behaviorReason", default)]
    pub behavior_reason: Option<String>,
}
