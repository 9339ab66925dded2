//! Domain accessors - one stateless function per REST resource.
//!
//! Each accessor knows its endpoint path, the required query parameters and
//! any response post-processing (merging, tagging). None retries, none
//! caches. Every failure collapses to the "no data" sentinel (`None` or an
//! empty `Vec`); the client logs the cause before swallowing it.

use chrono::{Duration, Local, NaiveDate};

use crate::models::{
    merge_messages, BehaviorList, CodeLists, CurrentUser, HomeworkList, MarkDetail, MarkList,
    Message, MessagePage, TimeTable, UserProfile,
};
use crate::services::client::ApiClient;

/// Bootstrap the request context after login.
///
/// Returns `None` only when the user fetch itself fails. A missing or
/// unmatched semester leaves `semester_id` absent and later requests send it
/// empty, mirroring how the service treats an omitted semester filter.
pub async fn init_user_data(client: &ApiClient) -> Option<UserProfile> {
    let user: CurrentUser = client.get("v1/user", &[]).await?;

    let mut profile = UserProfile {
        person_id: user.person_id.unwrap_or_default(),
        full_name: user.full_name.unwrap_or_default(),
        class_abbrev: user.class.map(|c| c.abbrev).unwrap_or_default(),
        semester_id: None,
    };

    let code_lists: Option<CodeLists> = client
        .get(
            "v1/timeTable/codeLists",
            &[("studentId", profile.person_id.clone())],
        )
        .await;
    if let Some(code_lists) = code_lists {
        let today = Local::now().format("%Y-%m-%d").to_string();
        profile.semester_id = crate::models::select_semester(&code_lists.semester, &today);
    }

    tracing::debug!(
        full_name = %profile.full_name,
        semester = ?profile.semester_id,
        "user data initialized"
    );
    Some(profile)
}

/// Marks for the active semester, all signing states, first 100 records.
pub async fn get_grades(client: &ApiClient, profile: &UserProfile) -> Option<MarkList> {
    client
        .get(
            &format!("v1/students/{}/marks/list", profile.person_id),
            &[
                (
                    "SemesterId",
                    profile.semester_id.clone().unwrap_or_default(),
                ),
                ("SigningFilter", "all".to_string()),
                ("Pagination.PageSize", "100".to_string()),
            ],
        )
        .await
}

/// The request window for the schedule: local midnight of `today` through
/// local midnight of `today + 7` days, independent of the current time.
pub fn schedule_window(today: NaiveDate) -> (String, String) {
    let format = "%Y-%m-%dT00:00:00";
    (
        today.format(format).to_string(),
        (today + Duration::days(7)).format(format).to_string(),
    )
}

/// Time-table for the next seven days. Slots within a day are returned in
/// service order; the dashboard sorts them by begin time before rendering.
pub async fn get_schedule(client: &ApiClient, profile: &UserProfile) -> Option<TimeTable> {
    let (date_from, date_to) = schedule_window(Local::now().date_naive());
    client
        .get(
            "v1/timeTable",
            &[
                ("StudentId", profile.person_id.clone()),
                ("DateFrom", date_from),
                ("DateTo", date_to),
            ],
        )
        .await
}

/// Active homework assignments.
pub async fn get_homework(client: &ApiClient, profile: &UserProfile) -> Option<HomeworkList> {
    client
        .get(
            &format!("v1/students/{}/homeworks", profile.person_id),
            &[("Filter", "active".to_string())],
        )
        .await
}

/// Received and sent messages (20 each), tagged with their direction and
/// merged newest-first. A failed page contributes nothing to the merge.
pub async fn get_messages(client: &ApiClient) -> Vec<Message> {
    let page_size = [("Pagination.PageSize", "20".to_string())];

    let received = client
        .get::<MessagePage>("v1/messages/received", &page_size)
        .await
        .map(|page| page.messages)
        .unwrap_or_default();
    let sent = client
        .get::<MessagePage>("v1/messages/sent", &page_size)
        .await
        .map(|page| page.messages)
        .unwrap_or_default();

    merge_messages(received, sent)
}

/// All behavior records.
pub async fn get_behaviors(client: &ApiClient, profile: &UserProfile) -> Option<BehaviorList> {
    client
        .get(
            &format!("v1/students/{}/behaviors", profile.person_id),
            &[("RecordsFilter", "all".to_string())],
        )
        .await
}

/// Extended record of a single mark.
pub async fn get_mark_detail(
    client: &ApiClient,
    profile: &UserProfile,
    mark_id: &str,
) -> Option<MarkDetail> {
    client
        .get(
            &format!("v1/students/{}/marks/{}", profile.person_id, mark_id),
            &[],
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_window_spans_exactly_seven_days_from_midnight() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
        let (from, to) = schedule_window(today);
        assert_eq!(from, "2026-08-23T00:00:00");
        assert_eq!(to, "2026-08-30T00:00:00");
    }

    #[test]
    fn schedule_window_rolls_over_month_boundaries() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 26).unwrap();
        let (from, to) = schedule_window(today);
        assert_eq!(from, "2026-02-26T00:00:00");
        assert_eq!(to, "2026-03-05T00:00:00");
    }
}
