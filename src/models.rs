//! Data models for surveys and their responses.
//!
//! This module contains the survey schema (questions and their types),
//! the respondent documents, and schema validation. Field names follow the
//! camelCase layout of the exported database documents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Type of a survey question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    /// Short free-text answer
    Text,
    /// Long free-text answer
    Textarea,
    /// Integer rating, expected 1-5
    Rating,
    /// Exactly one of the declared options
    MultipleChoice,
    /// Any subset of the declared options
    Checkbox,
    /// "yes" or "no"
    YesNo,
}

impl QuestionType {
    /// Whether questions of this type carry a list of options.
    pub fn has_options(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::Checkbox)
    }

    /// Human label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::Text => "Text Answer",
            QuestionType::Textarea => "Long Text",
            QuestionType::Rating => "Rating Scale",
            QuestionType::MultipleChoice => "Multiple Choice",
            QuestionType::Checkbox => "Checkboxes",
            QuestionType::YesNo => "Yes/No",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QuestionType::Text => "text",
            QuestionType::Textarea => "textarea",
            QuestionType::Rating => "rating",
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::Checkbox => "checkbox",
            QuestionType::YesNo => "yes-no",
        };
        write!(f, "{}", name)
    }
}

/// One item in a survey schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within the survey.
    pub id: String,
    /// Prompt shown to the respondent.
    #[serde(default)]
    pub text: String,
    /// Question type.
    #[serde(rename = "type")]
    pub kind: QuestionType,
    /// Whether an answer is required at collection time.
    #[serde(default)]
    pub required: bool,
    /// Declared options, only for choice questions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl Question {
    /// Creates a question without options.
    pub fn new(id: impl Into<String>, text: impl Into<String>, kind: QuestionType) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind,
            required: false,
            options: Vec::new(),
        }
    }

    /// Creates a choice question with the given options.
    pub fn with_options<I, S>(
        id: impl Into<String>,
        text: impl Into<String>,
        kind: QuestionType,
        options: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: options.into_iter().map(Into::into).collect(),
            ..Self::new(id, text, kind)
        }
    }
}

/// Publication status of a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyStatus {
    Active,
    #[default]
    Draft,
    Closed,
}

impl fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveyStatus::Active => write!(f, "Active"),
            SurveyStatus::Draft => write!(f, "Draft"),
            SurveyStatus::Closed => write!(f, "Closed"),
        }
    }
}

impl std::str::FromStr for SurveyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SurveyStatus::Active),
            "draft" => Ok(SurveyStatus::Draft),
            "closed" => Ok(SurveyStatus::Closed),
            other => Err(format!("unknown survey status: {}", other)),
        }
    }
}

/// A survey: descriptive metadata plus the ordered question schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Survey {
    /// Document identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Survey category (customer, product, health, store, general).
    #[serde(rename = "type", default)]
    pub category: String,
    #[serde(default)]
    pub status: SurveyStatus,
    #[serde(default, deserialize_with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
    /// Stored response counter maintained by the collection side.
    #[serde(default)]
    pub response_count: u64,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// A violated schema invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("question #{index} has an empty id")]
    EmptyId { index: usize },

    #[error("duplicate question id '{0}'")]
    DuplicateId(String),

    #[error("question '{id}' is {kind} but declares no options")]
    MissingOptions { id: String, kind: QuestionType },

    #[error("question '{id}' is {kind} and must not declare options")]
    UnexpectedOptions { id: String, kind: QuestionType },

    #[error("question '{id}' has a blank option")]
    BlankOption { id: String },
}

impl Survey {
    /// Display name for logs and reports.
    pub fn display_name(&self) -> &str {
        if !self.title.is_empty() {
            &self.title
        } else {
            self.id.as_deref().unwrap_or("Untitled survey")
        }
    }

    /// Check the schema invariants, returning every violation found.
    pub fn validate(&self) -> Result<(), Vec<SchemaError>> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for (index, question) in self.questions.iter().enumerate() {
            if question.id.is_empty() {
                errors.push(SchemaError::EmptyId { index: index + 1 });
            } else if !seen.insert(question.id.as_str()) {
                errors.push(SchemaError::DuplicateId(question.id.clone()));
            }

            match (question.kind.has_options(), question.options.is_empty()) {
                (true, true) => errors.push(SchemaError::MissingOptions {
                    id: question.id.clone(),
                    kind: question.kind,
                }),
                (false, false) => errors.push(SchemaError::UnexpectedOptions {
                    id: question.id.clone(),
                    kind: question.kind,
                }),
                _ => {}
            }

            if question.options.iter().any(|o| o.trim().is_empty()) {
                errors.push(SchemaError::BlankOption {
                    id: question.id.clone(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// One respondent's submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_id: Option<String>,
    /// Respondent role (customer, staff, health, volunteer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Submission time; unparseable values are treated as unknown.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub submitted_at: Option<DateTime<Utc>>,
    /// Raw answers keyed by question id.
    #[serde(default)]
    pub answers: HashMap<String, Value>,
    /// Any other top-level document fields.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Response {
    /// Creates a response from question id / answer pairs.
    pub fn with_answers<I, K>(answers: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ..Self::default()
        }
    }

    /// Raw answer for a question, if any.
    pub fn answer(&self, question_id: &str) -> Option<&Value> {
        self.answers.get(question_id)
    }

    /// Role, or "unknown" when missing.
    pub fn role_or_unknown(&self) -> &str {
        self.role.as_deref().filter(|r| !r.is_empty()).unwrap_or("unknown")
    }
}

/// Parse a timestamp from RFC 3339 or a bare `YYYY-MM-DD` date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_timestamp(&s),
        // Epoch milliseconds
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_timestamp(&s).map(|ts| ts.date_naive()),
        _ => None,
    })
}
