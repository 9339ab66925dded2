//! Time-table payloads.

use serde::Deserialize;

/// Response of `v1/timeTable`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeTable {
    #[serde(default)]
    pub days: Vec<ScheduleDay>,
}

/// One day of the time-table.
///
/// The service does not guarantee slot order within a day; the presentation
/// layer sorts by `beginTime` before rendering.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleDay {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub schedules: Vec<Lesson>,
}

/// A single time slot.
#[derive(Debug, Clone, Deserialize)]
pub struct Lesson {
    #[serde(rename = "beginTime", default)]
    pub begin_time: String,
    #[serde(rename = "endTime", default)]
    pub end_time: String,
    #[serde(default)]
    pub subject: Option<NameRef>,
    #[serde(rename = "hourType", default)]
    pub hour_type: Option<DisplayRef>,
    #[serde(default)]
    pub room: Option<AbbrevRef>,
}

impl Lesson {
    /// Subject name, falling back to the hour type label (e.g. a school
    /// event without a subject), then to a generic placeholder.
    pub fn subject_label(&self) -> String {
        if let Some(subject) = &self.subject {
            if !subject.name.is_empty() {
                return subject.name.clone();
            }
        }
        self.hour_type
            .as_ref()
            .map(|h| h.display_name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "Info".to_string())
    }

    /// Room abbreviation, empty when the slot has no room.
    pub fn room_label(&self) -> &str {
        self.room.as_ref().map(|r| r.abbrev.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NameRef {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayRef {
    #[serde(rename = "displayName", default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbbrevRef {
    #[serde(default)]
    pub abbrev: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_label_falls_back_to_hour_type() {
        let json = r#"{
            "beginTime": "2026-03-02T08:00:00",
            "endTime": "2026-03-02T08:45:00",
            "hourType": {"displayName": "Třídnická hodina"}
        }"#;
        let lesson: Lesson = serde_json::from_str(json).unwrap();
        assert_eq!(lesson.subject_label(), "Třídnická hodina");
        assert_eq!(lesson.room_label(), "");
    }

    #[test]
    fn subject_name_wins_over_hour_type() {
        let json = r#"{
            "beginTime": "2026-03-02T08:00:00",
            "endTime": "2026-03-02T08:45:00",
            "subject": {"name": "Fyzika"},
            "hourType": {"displayName": "Hodina"},
            "room": {"abbrev": "U12"}
        }"#;
        let lesson: Lesson = serde_json::from_str(json).unwrap();
        assert_eq!(lesson.subject_label(), "Fyzika");
        assert_eq!(lesson.room_label(), "U12");
    }
}
