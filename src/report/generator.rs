//! Markdown and JSON report generation.
//!
//! This module renders a survey results [`Report`] as a Markdown document
//! or as pretty-printed JSON.

use super::{Report, ReportMetadata};
use crate::analysis::{ChoiceStat, DailyCount, QuestionResult, QuestionStat, RoleCount};
use anyhow::Result;

/// Width of the text bars drawn next to percentages.
const BAR_WIDTH: usize = 20;

/// Generate a complete Markdown report.
///
/// `text_preview` is the number of free-text answers quoted per question.
pub fn generate_markdown_report(report: &Report, text_preview: usize) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# {} - Results\n\n", report.metadata.survey_title));

    if !report.description.is_empty() {
        output.push_str(&format!("{}\n\n", report.description));
    }

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));
    output.push_str(&generate_summary_section(&report.roles, &report.timeline));
    output.push_str(&generate_questions_section(report, text_preview));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    if let Some(ref id) = metadata.survey_id {
        section.push_str(&format!("- **Survey ID:** `{}`\n", id));
    }
    if !metadata.category.is_empty() {
        section.push_str(&format!("- **Category:** {}\n", metadata.category));
    }
    section.push_str(&format!("- **Status:** {}\n", metadata.status));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Total Responses:** {}\n",
        metadata.total_responses
    ));
    if !metadata.filters.is_empty() {
        section.push_str(&format!("- **Filters:** {}\n", metadata.filters.join(", ")));
    }
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &Report) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Summary](#summary)\n");
    toc.push_str("- [Results by Question](#results-by-question)\n");

    if report.metadata.total_responses > 0 {
        for (index, question) in report.results.questions.iter().enumerate() {
            toc.push_str(&format!(
                "  - [Q{}: {}](#{})\n",
                index + 1,
                question.text,
                anchor(&question.id)
            ));
        }
    }

    toc.push('\n');

    toc
}

/// Generate the response summary section.
fn generate_summary_section(roles: &[RoleCount], timeline: &[DailyCount]) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");

    if !roles.is_empty() {
        section.push_str("### Responses by Role\n\n");
        section.push_str("| Role | Responses |\n");
        section.push_str("|:---|:---:|\n");
        for role in roles {
            section.push_str(&format!("| {} | {} |\n", cell(&role.role), role.count));
        }
        section.push('\n');
    }

    if !timeline.is_empty() {
        section.push_str("### Responses by Day\n\n");
        section.push_str("| Date | Responses |\n");
        section.push_str("|:---|:---:|\n");
        for day in timeline {
            section.push_str(&format!("| {} | {} |\n", day.date, day.count));
        }
        section.push('\n');
    }

    section
}

/// Generate the per-question results section.
fn generate_questions_section(report: &Report, text_preview: usize) -> String {
    let mut section = String::new();

    section.push_str("## Results by Question\n\n");

    if report.metadata.total_responses == 0 {
        section.push_str("No responses yet.\n\n");
        return section;
    }

    if report.results.questions.is_empty() {
        section.push_str("This survey has no questions.\n\n");
        return section;
    }

    for (index, question) in report.results.questions.iter().enumerate() {
        section.push_str(&generate_question_block(index + 1, question, text_preview));
    }

    section
}

/// Generate the results block for a single question.
fn generate_question_block(number: usize, question: &QuestionResult, text_preview: usize) -> String {
    let mut block = String::new();

    block.push_str(&format!(
        "### Q{}: {} {{#{}}}\n\n",
        number,
        question.text,
        anchor(&question.id)
    ));
    block.push_str(&format!(
        "*Type: {} | Answers: {}*\n\n",
        question.kind.label(),
        question.stat.total_answers()
    ));

    match &question.stat {
        QuestionStat::MultipleChoice(stat) | QuestionStat::Checkbox(stat) => {
            block.push_str(&generate_choice_table(stat));
        }
        QuestionStat::Rating(stat) => {
            block.push_str(&format!("**{:.1} / 5**\n\n", stat.average));
            block.push_str(&format!(
                "Average rating from {} responses\n\n",
                stat.count
            ));
        }
        QuestionStat::YesNo(stat) => {
            block.push_str("| Answer | Count | Share | |\n");
            block.push_str("|:---|:---:|:---:|:---|\n");
            block.push_str(&format!(
                "| Yes | {} | {:.1}% | {} |\n",
                stat.yes_count,
                stat.yes_percentage,
                bar(stat.yes_percentage)
            ));
            block.push_str(&format!(
                "| No | {} | {:.1}% | {} |\n\n",
                stat.no_count,
                stat.no_percentage,
                bar(stat.no_percentage)
            ));
        }
        QuestionStat::Text(stat) => {
            let (shown, remaining) = stat.preview(text_preview);
            if shown.is_empty() && remaining == 0 {
                block.push_str("*No answers.*\n\n");
            }
            for answer in shown {
                block.push_str(&format!("> \"{}\"\n\n", answer.replace('\n', " ")));
            }
            if remaining > 0 {
                block.push_str(&format!("*... and {} more responses*\n\n", remaining));
            }
        }
    }

    block.push_str("---\n\n");

    block
}

/// Generate the option table of a choice question.
fn generate_choice_table(stat: &ChoiceStat) -> String {
    let mut table = String::new();

    table.push_str("| Option | Count | Share | |\n");
    table.push_str("|:---|:---:|:---:|:---|\n");
    for option in &stat.options {
        table.push_str(&format!(
            "| {} | {} | {:.1}% | {} |\n",
            cell(&option.option),
            option.count,
            option.percentage,
            bar(option.percentage)
        ));
    }
    table.push('\n');

    table
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by Ingrevo Survey*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

fn anchor(id: &str) -> String {
    id.replace(['/', '.', ' '], "-").to_lowercase()
}

fn cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn bar(percentage: f64) -> String {
    let filled = ((percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled.min(BAR_WIDTH))
}
