//! Survey response aggregation and statistics.
//!
//! This module turns a survey schema plus a snapshot of responses into
//! per-question statistics. Aggregation is total: malformed answers are
//! excluded from the statistic they would have fed, never reported as errors.

use super::answers::{self, YesNo};
use crate::models::{Question, QuestionType, Response, Survey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Count and share of a single declared option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionCount {
    pub option: String,
    pub count: usize,
    /// Share of respondents who answered the question, 0-100, one decimal.
    pub percentage: f64,
}

/// Statistics for a multiple-choice or checkbox question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceStat {
    /// One entry per declared option, in declared order.
    pub options: Vec<OptionCount>,
    /// Respondents who answered the question at all.
    pub total_answers: usize,
}

impl ChoiceStat {
    /// Total number of counted selections across all options.
    pub fn selections(&self) -> usize {
        self.options.iter().map(|o| o.count).sum()
    }

    /// Count for a declared option.
    pub fn count(&self, option: &str) -> Option<usize> {
        self.options
            .iter()
            .find(|o| o.option == option)
            .map(|o| o.count)
    }

    /// Percentage for a declared option.
    pub fn percentage(&self, option: &str) -> Option<f64> {
        self.options
            .iter()
            .find(|o| o.option == option)
            .map(|o| o.percentage)
    }
}

/// Statistics for a rating question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingStat {
    /// Mean of valid ratings, one decimal; 0 when there are none.
    pub average: f64,
    /// Number of valid (parseable) ratings.
    pub count: usize,
    /// Respondents who answered the question at all.
    pub total_answers: usize,
}

/// Statistics for a yes/no question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YesNoStat {
    pub yes_count: usize,
    pub no_count: usize,
    /// Shares of the answers classified as yes or no; "neither" answers
    /// are left out of the denominator.
    pub yes_percentage: f64,
    pub no_percentage: f64,
    /// Respondents who answered the question at all.
    pub total_answers: usize,
}

/// Collected answers of a free-text question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStat {
    /// Every non-empty answer, in response order.
    pub answers: Vec<String>,
}

impl TextStat {
    /// Number of non-empty answers.
    pub fn total(&self) -> usize {
        self.answers.len()
    }

    /// The first `limit` answers and how many were left out.
    pub fn preview(&self, limit: usize) -> (&[String], usize) {
        let shown = &self.answers[..self.answers.len().min(limit)];
        (shown, self.answers.len() - shown.len())
    }
}

/// Statistic summary for one question, shaped by its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum QuestionStat {
    MultipleChoice(ChoiceStat),
    Checkbox(ChoiceStat),
    Rating(RatingStat),
    YesNo(YesNoStat),
    Text(TextStat),
}

impl QuestionStat {
    /// Respondents who answered the question at all.
    pub fn total_answers(&self) -> usize {
        match self {
            QuestionStat::MultipleChoice(s) | QuestionStat::Checkbox(s) => s.total_answers,
            QuestionStat::Rating(s) => s.total_answers,
            QuestionStat::YesNo(s) => s.total_answers,
            QuestionStat::Text(s) => s.total(),
        }
    }
}

/// A question together with its statistic, for ordered presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub stat: QuestionStat,
}

/// Results for a whole survey, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResults {
    pub total_responses: usize,
    pub questions: Vec<QuestionResult>,
}

/// Compute the statistic for every question, keyed by question id.
pub fn aggregate(survey: &Survey, responses: &[Response]) -> HashMap<String, QuestionStat> {
    survey
        .questions
        .iter()
        .map(|q| (q.id.clone(), question_stat(q, responses)))
        .collect()
}

/// Compute the statistic for every question, keeping schema order.
pub fn tabulate(survey: &Survey, responses: &[Response]) -> SurveyResults {
    debug!(
        "Tabulating {} questions over {} responses",
        survey.questions.len(),
        responses.len()
    );

    SurveyResults {
        total_responses: responses.len(),
        questions: survey
            .questions
            .iter()
            .map(|q| QuestionResult {
                id: q.id.clone(),
                text: q.text.clone(),
                kind: q.kind,
                stat: question_stat(q, responses),
            })
            .collect(),
    }
}

/// Compute the statistic for a single question.
pub fn question_stat(question: &Question, responses: &[Response]) -> QuestionStat {
    let answered: Vec<_> = responses
        .iter()
        .filter_map(|r| answers::non_empty(r.answer(&question.id)))
        .collect();

    match question.kind {
        QuestionType::MultipleChoice => QuestionStat::MultipleChoice(tally_options(
            &question.options,
            answered.len(),
            answered.iter().filter_map(|a| answers::choice(a)),
        )),
        QuestionType::Checkbox => QuestionStat::Checkbox(tally_options(
            &question.options,
            answered.len(),
            answered.iter().flat_map(|a| answers::selections(a)),
        )),
        QuestionType::Rating => {
            let ratings: Vec<i64> = answered.iter().filter_map(|a| answers::rating(a)).collect();
            let average = if ratings.is_empty() {
                0.0
            } else {
                let sum: i128 = ratings.iter().map(|&r| i128::from(r)).sum();
                round_one(sum as f64 / ratings.len() as f64)
            };
            QuestionStat::Rating(RatingStat {
                average,
                count: ratings.len(),
                total_answers: answered.len(),
            })
        }
        QuestionType::YesNo => {
            let (mut yes_count, mut no_count) = (0usize, 0usize);
            for answer in &answered {
                match answers::yes_no(answer) {
                    Some(YesNo::Yes) => yes_count += 1,
                    Some(YesNo::No) => no_count += 1,
                    None => {}
                }
            }
            QuestionStat::YesNo(YesNoStat {
                yes_count,
                no_count,
                yes_percentage: percentage(yes_count, yes_count + no_count),
                no_percentage: percentage(no_count, yes_count + no_count),
                total_answers: answered.len(),
            })
        }
        QuestionType::Text | QuestionType::Textarea => QuestionStat::Text(TextStat {
            answers: answered.iter().map(|a| answers::text(a)).collect(),
        }),
    }
}

/// Count selections against the declared options, seeding every option at zero.
///
/// Selections that match no declared option are ignored.
fn tally_options<'a>(
    options: &[String],
    total_answers: usize,
    selections: impl Iterator<Item = &'a str>,
) -> ChoiceStat {
    let mut counts = vec![0usize; options.len()];

    for selection in selections {
        match options.iter().position(|o| o == selection) {
            Some(index) => counts[index] += 1,
            None => debug!("Ignoring answer '{}' outside the declared options", selection),
        }
    }

    ChoiceStat {
        options: options
            .iter()
            .zip(counts)
            .map(|(option, count)| OptionCount {
                option: option.clone(),
                count,
                percentage: percentage(count, total_answers),
            })
            .collect(),
        total_answers,
    }
}

/// `count / total * 100` rounded to one decimal; 0 for an empty sample.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_one(count as f64 / total as f64 * 100.0)
    }
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
