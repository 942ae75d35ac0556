//! Report model and generators.
//!
//! A [`Report`] bundles the tabulated survey results with the response
//! breakdowns. The generators render it as Markdown, JSON or CSV.

pub mod csv;
pub mod generator;

pub use self::csv::{generate_responses_csv, generate_results_csv};
pub use generator::{generate_json_report, generate_markdown_report};

use crate::analysis::{
    daily_timeline, role_breakdown, tabulate, DailyCount, ResponseFilter, RoleCount,
    SurveyResults,
};
use crate::config::ReportConfig;
use crate::models::{Response, Survey, SurveyStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata about the results report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Survey document id, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey_id: Option<String>,
    pub survey_title: String,
    pub category: String,
    pub status: SurveyStatus,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Responses included after filtering.
    pub total_responses: usize,
    /// Human-readable description of each applied filter.
    pub filters: Vec<String>,
}

/// The complete survey results report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub description: String,
    /// Responses per role, empty when disabled.
    pub roles: Vec<RoleCount>,
    /// Responses per day, empty when disabled.
    pub timeline: Vec<DailyCount>,
    pub results: SurveyResults,
}

impl Report {
    /// Build a report from a survey and its (already filtered) responses.
    pub fn build(
        survey: &Survey,
        responses: &[Response],
        filter: &ResponseFilter,
        config: &ReportConfig,
    ) -> Self {
        let metadata = ReportMetadata {
            survey_id: survey.id.clone(),
            survey_title: survey.display_name().to_string(),
            category: survey.category.clone(),
            status: survey.status,
            generated_at: Utc::now(),
            total_responses: responses.len(),
            filters: describe_filter(filter),
        };

        Self {
            metadata,
            description: survey.description.clone(),
            roles: if config.include_roles {
                role_breakdown(responses)
            } else {
                Vec::new()
            },
            timeline: if config.include_timeline {
                daily_timeline(responses, config.timeline_days)
            } else {
                Vec::new()
            },
            results: tabulate(survey, responses),
        }
    }
}

fn describe_filter(filter: &ResponseFilter) -> Vec<String> {
    let mut filters = Vec::new();

    if let Some(ref role) = filter.role {
        filters.push(format!("role = {}", role));
    }
    match (filter.from, filter.to) {
        (Some(from), Some(to)) => filters.push(format!("submitted {} to {}", from, to)),
        (Some(from), None) => filters.push(format!("submitted on or after {}", from)),
        (None, Some(to)) => filters.push(format!("submitted on or before {}", to)),
        (None, None) => {}
    }

    filters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, QuestionType};
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_build_report() {
        let survey = Survey {
            id: Some("s1".to_string()),
            title: "Customer Satisfaction".to_string(),
            questions: vec![Question::new("q1", "Rate us", QuestionType::Rating)],
            ..Survey::default()
        };
        let responses = vec![
            Response {
                role: Some("customer".to_string()),
                ..Response::with_answers([("q1", json!(4))])
            },
            Response::with_answers([("q1", json!(2))]),
        ];
        let filter = ResponseFilter {
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..ResponseFilter::default()
        };

        let report = Report::build(&survey, &responses, &filter, &ReportConfig::default());
        assert_eq!(report.metadata.survey_title, "Customer Satisfaction");
        assert_eq!(report.metadata.total_responses, 2);
        assert_eq!(report.metadata.filters, vec!["submitted on or after 2024-01-01"]);
        assert_eq!(report.roles.len(), 2);
        assert!(report.timeline.is_empty());
        assert_eq!(report.results.questions.len(), 1);
    }

    #[test]
    fn test_build_report_without_breakdowns() {
        let config = ReportConfig {
            include_roles: false,
            include_timeline: false,
            ..ReportConfig::default()
        };
        let responses = vec![Response {
            role: Some("staff".to_string()),
            submitted_at: crate::models::parse_timestamp("2024-05-01"),
            ..Response::default()
        }];

        let report = Report::build(
            &Survey::default(),
            &responses,
            &ResponseFilter::default(),
            &config,
        );
        assert!(report.roles.is_empty());
        assert!(report.timeline.is_empty());
        assert!(report.metadata.filters.is_empty());
        assert_eq!(report.metadata.survey_title, "Untitled survey");
    }
}
