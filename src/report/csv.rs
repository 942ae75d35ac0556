//! CSV exports.
//!
//! Two exports: the tabulated results (one row per statistic) and the raw
//! responses (one row per respondent). Fields are quoted per RFC 4180.

use crate::analysis::{QuestionStat, SurveyResults};
use crate::models::{Response, Survey};
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};

const RESULTS_HEADER: [&str; 6] = ["question_id", "question", "type", "label", "count", "value"];

/// Generate the results CSV.
///
/// Choice and yes/no rows carry the percentage in `value`, rating rows the
/// average, text rows leave it empty.
pub fn generate_results_csv(results: &SurveyResults) -> String {
    let mut csv = String::new();
    push_row(&mut csv, RESULTS_HEADER.iter().map(|h| Cow::Borrowed(*h)));

    for question in &results.questions {
        let kind = question.kind.to_string();
        let mut row = |label: &str, count: usize, value: String| {
            push_row(
                &mut csv,
                [
                    Cow::Borrowed(question.id.as_str()),
                    Cow::Borrowed(question.text.as_str()),
                    Cow::Borrowed(kind.as_str()),
                    Cow::Borrowed(label),
                    Cow::Owned(count.to_string()),
                    Cow::Owned(value),
                ]
                .into_iter(),
            );
        };

        match &question.stat {
            QuestionStat::MultipleChoice(stat) | QuestionStat::Checkbox(stat) => {
                for option in &stat.options {
                    row(&option.option, option.count, format!("{:.1}", option.percentage));
                }
            }
            QuestionStat::Rating(stat) => {
                row("average", stat.count, format!("{:.1}", stat.average));
            }
            QuestionStat::YesNo(stat) => {
                row("yes", stat.yes_count, format!("{:.1}", stat.yes_percentage));
                row("no", stat.no_count, format!("{:.1}", stat.no_percentage));
            }
            QuestionStat::Text(stat) => {
                row("answers", stat.total(), String::new());
            }
        }
    }

    csv
}

/// A column of the raw responses export.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Column {
    Id,
    SurveyId,
    Role,
    Name,
    SubmittedAt,
    Answer(String),
    Extra(String),
}

impl Column {
    fn header(&self) -> &str {
        match self {
            Column::Id => "id",
            Column::SurveyId => "surveyId",
            Column::Role => "role",
            Column::Name => "name",
            Column::SubmittedAt => "submittedAt",
            Column::Answer(key) | Column::Extra(key) => key,
        }
    }

    fn value(&self, response: &Response) -> String {
        match self {
            Column::Id => response.id.clone().unwrap_or_default(),
            Column::SurveyId => response.survey_id.clone().unwrap_or_default(),
            Column::Role => response.role.clone().unwrap_or_default(),
            Column::Name => response.name.clone().unwrap_or_default(),
            Column::SubmittedAt => response
                .submitted_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            Column::Answer(key) => response.answers.get(key).map(field_value).unwrap_or_default(),
            Column::Extra(key) => response.extra.get(key).map(field_value).unwrap_or_default(),
        }
    }
}

/// Generate the raw responses CSV.
///
/// Answer columns follow the survey's question order when a survey is
/// given; answers to unknown questions and extra fields follow, sorted.
/// Columns named in `excluded` are left out.
pub fn generate_responses_csv(
    responses: &[Response],
    survey: Option<&Survey>,
    excluded: &[String],
) -> String {
    let columns = response_columns(responses, survey, excluded);

    let mut csv = String::new();
    push_row(&mut csv, columns.iter().map(|c| Cow::Borrowed(c.header())));

    for response in responses {
        push_row(&mut csv, columns.iter().map(|c| Cow::Owned(c.value(response))));
    }

    csv
}

fn response_columns(
    responses: &[Response],
    survey: Option<&Survey>,
    excluded: &[String],
) -> Vec<Column> {
    let mut candidates = vec![
        Column::Id,
        Column::SurveyId,
        Column::Role,
        Column::Name,
        Column::SubmittedAt,
    ];

    if let Some(survey) = survey {
        candidates.extend(survey.questions.iter().map(|q| Column::Answer(q.id.clone())));
    }

    let answer_keys: BTreeSet<&String> = responses.iter().flat_map(|r| r.answers.keys()).collect();
    candidates.extend(answer_keys.into_iter().map(|k| Column::Answer(k.clone())));

    let extra_keys: BTreeSet<&String> = responses.iter().flat_map(|r| r.extra.keys()).collect();
    candidates.extend(extra_keys.into_iter().map(|k| Column::Extra(k.clone())));

    // First column with a given header wins.
    let mut seen: HashSet<String> = excluded.iter().cloned().collect();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.header().to_string()))
        .collect()
}

/// Render a raw document value as a CSV field.
fn field_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

/// Quote a field if it contains a delimiter, quote or line break.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn push_row<'a>(csv: &mut String, fields: impl Iterator<Item = Cow<'a, str>>) {
    let row: Vec<String> = fields.map(|f| escape_field(&f).into_owned()).collect();
    csv.push_str(&row.join(","));
    csv.push('\n');
}
