//! Homework payloads.

use serde::Deserialize;

use super::schedule::NameRef;

/// Response of `v1/students/{id}/homeworks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomeworkList {
    #[serde(default)]
    pub homeworks: Vec<Homework>,
}

/// A single homework assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct Homework {
    #[serde(default)]
    pub subject: Option<NameRef>,
    #[serde(rename = "dateTo", default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(rename = "detailedDescription", default)]
    pub detailed_description: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Homework {
    /// Free-text description; the detailed field takes precedence.
    pub fn description(&self) -> Option<&str> {
        self.detailed_description.as_deref().or(self.text.as_deref())
    }
}
