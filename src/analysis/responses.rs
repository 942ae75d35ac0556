//! Response filtering and breakdowns.
//!
//! Views over a response snapshot used by the report: role and date-range
//! filtering, newest-first ordering, per-role counts and a daily timeline.

use crate::models::Response;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

/// Criteria for selecting responses. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseFilter {
    /// Drop responses tagged with a different survey. Untagged responses
    /// are kept, since single-survey exports often omit the tag.
    pub survey_id: Option<String>,
    pub role: Option<String>,
    /// Inclusive lower bound on the submission date (UTC).
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the submission date (UTC).
    pub to: Option<NaiveDate>,
}

impl ResponseFilter {
    /// Check a single response against every set criterion.
    pub fn matches(&self, response: &Response) -> bool {
        if let (Some(wanted), Some(actual)) = (&self.survey_id, &response.survey_id) {
            if wanted != actual {
                return false;
            }
        }

        if let Some(ref role) = self.role {
            if response.role.as_ref() != Some(role) {
                return false;
            }
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(date) = response.submitted_at.map(|t| t.date_naive()) else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) {
                return false;
            }
            if self.to.is_some_and(|to| date > to) {
                return false;
            }
        }

        true
    }

    /// Keep only the matching responses.
    pub fn apply(&self, responses: Vec<Response>) -> Vec<Response> {
        responses.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Sort responses newest first; responses without a timestamp go last.
pub fn sort_newest_first(responses: &mut [Response]) {
    // None < Some, so reversing puts unknown timestamps at the end.
    responses.sort_by_key(|r| Reverse(r.submitted_at));
}

/// Number of responses for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCount {
    pub role: String,
    pub count: usize,
}

/// Count responses per role, most common first (ties by name).
pub fn role_breakdown(responses: &[Response]) -> Vec<RoleCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for response in responses {
        *counts.entry(response.role_or_unknown()).or_default() += 1;
    }

    let mut breakdown: Vec<RoleCount> = counts
        .into_iter()
        .map(|(role, count)| RoleCount {
            role: role.to_string(),
            count,
        })
        .collect();
    breakdown.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.role.cmp(&b.role)));

    breakdown
}

/// Number of responses submitted on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// Count responses per UTC day, keeping the most recent `days` days with data.
pub fn daily_timeline(responses: &[Response], days: usize) -> Vec<DailyCount> {
    let mut by_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();

    for timestamp in responses.iter().filter_map(|r| r.submitted_at) {
        *by_day.entry(timestamp.date_naive()).or_default() += 1;
    }

    let skip = by_day.len().saturating_sub(days);
    by_day
        .into_iter()
        .skip(skip)
        .map(|(date, count)| DailyCount { date, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;

    fn response(role: Option<&str>, submitted: Option<&str>) -> Response {
        Response {
            role: role.map(String::from),
            submitted_at: submitted.and_then(parse_timestamp),
            ..Response::default()
        }
    }

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_filter_by_role() {
        let filter = ResponseFilter {
            role: Some("staff".to_string()),
            ..ResponseFilter::default()
        };
        assert!(filter.matches(&response(Some("staff"), None)));
        assert!(!filter.matches(&response(Some("Staff"), None)));
        assert!(!filter.matches(&response(None, None)));
    }

    #[test]
    fn test_filter_by_date_range_is_inclusive() {
        let filter = ResponseFilter {
            from: Some(date("2024-10-01")),
            to: Some(date("2024-10-31")),
            ..ResponseFilter::default()
        };
        assert!(filter.matches(&response(None, Some("2024-10-01T00:00:00Z"))));
        assert!(filter.matches(&response(None, Some("2024-10-31T23:59:59Z"))));
        assert!(!filter.matches(&response(None, Some("2024-11-01T00:00:00Z"))));
        assert!(!filter.matches(&response(None, Some("2024-09-30T23:59:59Z"))));
        assert!(!filter.matches(&response(None, None)));
    }

    #[test]
    fn test_filter_by_survey() {
        let filter = ResponseFilter {
            survey_id: Some("s1".to_string()),
            ..ResponseFilter::default()
        };
        let mut r = response(None, None);
        assert!(filter.matches(&r));
        r.survey_id = Some("s1".to_string());
        assert!(filter.matches(&r));
        r.survey_id = Some("s2".to_string());
        assert!(!filter.matches(&r));
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = ResponseFilter::default();
        let kept = filter.apply(vec![response(None, None), response(Some("health"), None)]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut responses = vec![
            response(Some("a"), Some("2024-01-01")),
            response(Some("b"), None),
            response(Some("c"), Some("2024-03-01")),
            response(Some("d"), Some("2024-02-01")),
        ];
        sort_newest_first(&mut responses);

        let roles: Vec<_> = responses.iter().map(|r| r.role_or_unknown()).collect();
        assert_eq!(roles, vec!["c", "d", "a", "b"]);
    }

    #[test]
    fn test_role_breakdown() {
        let responses = vec![
            response(Some("customer"), None),
            response(Some("staff"), None),
            response(Some("customer"), None),
            response(None, None),
        ];
        let breakdown = role_breakdown(&responses);

        assert_eq!(breakdown[0], RoleCount { role: "customer".to_string(), count: 2 });
        assert_eq!(breakdown[1].role, "staff");
        assert_eq!(breakdown[2].role, "unknown");
        assert_eq!(breakdown.iter().map(|r| r.count).sum::<usize>(), 4);
    }

    #[test]
    fn test_daily_timeline_keeps_last_days() {
        let responses = vec![
            response(None, Some("2024-01-01T08:00:00Z")),
            response(None, Some("2024-01-01T18:00:00Z")),
            response(None, Some("2024-01-03T10:00:00Z")),
            response(None, Some("2024-01-05T10:00:00Z")),
            response(None, None),
        ];

        let all = daily_timeline(&responses, 30);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0], DailyCount { date: date("2024-01-01"), count: 2 });

        let recent = daily_timeline(&responses, 2);
        let dates: Vec<_> = recent.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date("2024-01-03"), date("2024-01-05")]);
    }
}
