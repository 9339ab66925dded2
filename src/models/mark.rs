//! Grades (marks) payloads.

use serde::Deserialize;
use std::collections::HashMap;

/// Response of `v1/students/{id}/marks/list`.
///
/// Subject names are side-loaded in `subjects` and resolved per mark by id,
/// they are not embedded in each mark record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkList {
    #[serde(default)]
    pub marks: Vec<Mark>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

impl MarkList {
    /// Build the subject-id to name lookup used when formatting rows.
    pub fn subject_names(&self) -> HashMap<&str, &str> {
        self.subjects
            .iter()
            .map(|s| (s.id.as_str(), s.name.as_str()))
            .collect()
    }
}

/// A single grade record.
#[derive(Debug, Clone, Deserialize)]
pub struct Mark {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "subjectId", default)]
    pub subject_id: Option<String>,
    #[serde(rename = "markText", default)]
    pub mark_text: Option<String>,
    #[serde(rename = "markDate", default)]
    pub mark_date: Option<String>,
    // Weight arrives as a bare number but is only ever displayed, so it is
    // kept loosely typed and rendered through `sanitize::scalar_text`.
    #[serde(default)]
    pub weight: Option<serde_json::Value>,
    #[serde(default)]
    pub theme: Option<String>,
}

/// Side-loaded subject entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Subject {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Extended record of a single mark.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkDetail {
    #[serde(rename = "markText", default)]
    pub mark_text: Option<String>,
    #[serde(rename = "subjectName", default)]
    pub subject_name: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub weight: Option<serde_json::Value>,
    #[serde(rename = "teacherDisplayName", default)]
    pub teacher_display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_list_tolerates_missing_fields() {
        let json = r#"{
            "marks": [{"subjectId": "SUB1", "markText": "1"}],
            "subjects": [{"id": "SUB1", "name": "Matematika"}]
        }"#;
        let list: MarkList = serde_json::from_str(json).unwrap();
        assert_eq!(list.marks.len(), 1);
        assert!(list.marks[0].mark_date.is_none());
        assert_eq!(list.subject_names().get("SUB1"), Some(&"Matematika"));
    }

    #[test]
    fn empty_body_is_an_empty_list() {
        let list: MarkList = serde_json::from_str("{}").unwrap();
        assert!(list.marks.is_empty());
        assert!(list.subjects.is_empty());
    }
}
