//! User bootstrap payloads and semester selection.

use serde::Deserialize;

/// Response of `v1/user`.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUser {
    #[serde(rename = "personID")]
    pub person_id: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub class: Option<ClassRef>,
}

/// Class reference embedded in the user payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassRef {
    #[serde(default)]
    pub abbrev: String,
}

/// Response of `v1/timeTable/codeLists`. Only the semester list is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodeLists {
    #[serde(default)]
    pub semester: Vec<Semester>,
}

/// A candidate academic term with its date range.
#[derive(Debug, Clone, Deserialize)]
pub struct Semester {
    pub id: String,
    #[serde(rename = "dateFrom", default)]
    pub date_from: String,
    #[serde(rename = "dateTo", default)]
    pub date_to: String,
}

/// Request context established once after login and read-only afterwards.
///
/// Cloned into every fetch task; no field is mutated past bootstrap.
#[derive(Debug, Clone, Default)]
pub struct UserProfile {
    pub person_id: String,
    pub full_name: String,
    pub class_abbrev: String,
    pub semester_id: Option<String>,
}

/// Pick the active semester: the first whose `[dateFrom, dateTo]` range
/// contains `today`, else the last semester in the given order.
///
/// Dates are compared as `YYYY-MM-DD` prefixes, lexically. The service emits
/// fixed-width ISO-8601 timestamps, so string order matches calendar order.
pub fn select_semester(semesters: &[Semester], today: &str) -> Option<String> {
    for semester in semesters {
        if date_part(&semester.date_from) <= today && today <= date_part(&semester.date_to) {
            return Some(semester.id.clone());
        }
    }
    semesters.last().map(|s| s.id.clone())
}

/// First 10 characters of a timestamp, i.e. the `YYYY-MM-DD` part.
fn date_part(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn semester(id: &str, from: &str, to: &str) -> Semester {
        Semester {
            id: id.to_string(),
            date_from: from.to_string(),
            date_to: to.to_string(),
        }
    }

    #[test]
    fn picks_the_semester_containing_today() {
        let semesters = vec![
            semester("s1", "2025-09-01T00:00:00", "2026-01-31T00:00:00"),
            semester("s2", "2026-02-01T00:00:00", "2026-06-30T00:00:00"),
        ];
        assert_eq!(
            select_semester(&semesters, "2026-03-15"),
            Some("s2".to_string())
        );
    }

    #[test]
    fn boundary_dates_are_inclusive() {
        let semesters = vec![semester("s1", "2026-02-01T00:00:00", "2026-06-30T00:00:00")];
        assert_eq!(
            select_semester(&semesters, "2026-02-01"),
            Some("s1".to_string())
        );
        assert_eq!(
            select_semester(&semesters, "2026-06-30"),
            Some("s1".to_string())
        );
    }

    #[test]
    fn falls_back_to_last_semester_when_none_contains_today() {
        let semesters = vec![
            semester("old", "2024-09-01T00:00:00", "2025-01-31T00:00:00"),
            semester("older", "2024-02-01T00:00:00", "2024-06-30T00:00:00"),
        ];
        // Falls back to the last entry in the returned order, not the newest.
        assert_eq!(
            select_semester(&semesters, "2026-08-23"),
            Some("older".to_string())
        );
    }

    #[test]
    fn empty_semester_set_selects_nothing() {
        assert_eq!(select_semester(&[], "2026-08-23"), None);
    }
}
