//! Loading exported survey and response documents.
//!
//! Surveys and responses live in the document database; this module reads
//! them from JSON exports so the aggregator can run on an in-memory snapshot.
//! Responses may come from a single JSON file or from a directory tree of
//! per-document files.

use crate::models::{Response, Survey};
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Errors raised while loading documents.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Options for loading responses.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Show a progress bar while walking a directory.
    pub show_progress: bool,
}

/// Load a single survey document.
pub fn load_survey(path: &Path) -> Result<Survey, StoreError> {
    let survey: Survey = read_json(path)?;
    info!(
        "Loaded survey '{}' with {} questions",
        survey.display_name(),
        survey.questions.len()
    );
    Ok(survey)
}

/// Load a catalog: a JSON array of survey documents.
pub fn load_catalog(path: &Path) -> Result<Vec<Survey>, StoreError> {
    let surveys: Vec<Survey> = read_json(path)?;
    info!("Loaded {} surveys from catalog", surveys.len());
    Ok(surveys)
}

/// Load responses from a JSON file or a directory of JSON files.
///
/// In a directory, files that can't be read or parsed are skipped with a
/// warning. A single file that fails is an error.
pub fn load_responses(path: &Path, options: &LoadOptions) -> Result<Vec<Response>, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }

    if path.is_dir() {
        return load_response_dir(path, options);
    }

    let value: Value = read_json(path)?;
    let responses = documents_to_responses(value, &file_stem(path));
    info!("Loaded {} responses from {}", responses.len(), path.display());
    Ok(responses)
}

fn load_response_dir(dir: &Path, options: &LoadOptions) -> Result<Vec<Response>, StoreError> {
    let files: Vec<PathBuf> = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Cannot read directory entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_json(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    debug!("Found {} response files under {}", files.len(), dir.display());

    let progress = if options.show_progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let mut responses = Vec::new();
    let mut skipped = 0usize;

    for file in &files {
        match read_json::<Value>(file) {
            Ok(value) => responses.extend(documents_to_responses(value, &file_stem(file))),
            Err(e) => {
                warn!("Skipping {}: {}", file.display(), e);
                skipped += 1;
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();

    if skipped > 0 {
        warn!("Skipped {} unreadable response files", skipped);
    }
    info!(
        "Loaded {} responses from {} files in {}",
        responses.len(),
        files.len() - skipped,
        dir.display()
    );

    Ok(responses)
}

/// Turn a parsed file into responses: one document or an array of them.
///
/// Documents without an id are named after the file (`stem`, or `stem-N`
/// inside an array). Elements that aren't valid documents are skipped.
fn documents_to_responses(value: Value, stem: &str) -> Vec<Response> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| to_response(item, || format!("{}-{}", stem, i + 1)))
            .collect(),
        other => to_response(other, || stem.to_string()).into_iter().collect(),
    }
}

fn to_response(value: Value, fallback_id: impl FnOnce() -> String) -> Option<Response> {
    match serde_json::from_value::<Response>(value) {
        Ok(mut response) => {
            if response.id.is_none() {
                response.id = Some(fallback_id());
            }
            Some(response)
        }
        Err(e) => {
            warn!("Skipping malformed response document {}: {}", fallback_id(), e);
            None
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_survey() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "survey.json",
            r#"{"title": "Feedback", "questions": [{"id": "q1", "type": "yes-no"}]}"#,
        );

        let survey = load_survey(&path).unwrap();
        assert_eq!(survey.title, "Feedback");
        assert_eq!(survey.questions.len(), 1);
    }

    #[test]
    fn test_load_survey_errors() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.json");
        assert!(matches!(load_survey(&missing), Err(StoreError::NotFound(_))));

        let broken = write(temp.path(), "broken.json", "{ not json");
        assert!(matches!(load_survey(&broken), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn test_load_responses_from_array_file() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "responses.json",
            &json!([
                {"id": "r1", "answers": {"q1": "yes"}},
                {"answers": {"q1": "no"}},
                {"answers": "not a map"}
            ])
            .to_string(),
        );

        let responses = load_responses(&path, &LoadOptions::default()).unwrap();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].id.as_deref(), Some("r1"));
        assert_eq!(responses[1].id.as_deref(), Some("responses-2"));
    }

    #[test]
    fn test_load_responses_from_directory() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b.json", r#"{"role": "staff"}"#);
        write(temp.path(), "a.json", r#"{"role": "customer"}"#);
        write(temp.path(), "nested/c.json", r#"[{"role": "health"}]"#);
        write(temp.path(), "notes.txt", "ignored");
        write(temp.path(), "broken.json", "{");

        let responses = load_responses(temp.path(), &LoadOptions::default()).unwrap();
        let ids: Vec<_> = responses.iter().filter_map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "b", "c-1"]);
        assert_eq!(responses[0].role.as_deref(), Some("customer"));
    }

    #[test]
    fn test_load_responses_missing_path() {
        let temp = TempDir::new().unwrap();
        let result = load_responses(&temp.path().join("nope"), &LoadOptions::default());
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_load_catalog() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "surveys.json",
            r#"[{"title": "A", "status": "active"}, {"title": "B"}]"#,
        );

        let surveys = load_catalog(&path).unwrap();
        assert_eq!(surveys.len(), 2);
        assert_eq!(surveys[1].status, crate::models::SurveyStatus::Draft);
    }

    #[test]
    fn test_fixture_end_to_end() {
        use crate::analysis::{aggregate, QuestionStat, ResponseFilter};

        let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        let survey = load_survey(&fixtures.join("customer-survey.json")).unwrap();
        assert!(survey.validate().is_ok());

        let responses =
            load_responses(&fixtures.join("responses"), &LoadOptions::default()).unwrap();
        assert_eq!(responses.len(), 4);

        let filter = ResponseFilter {
            survey_id: survey.id.clone(),
            ..ResponseFilter::default()
        };
        let responses = filter.apply(responses);
        assert_eq!(responses.len(), 3);

        let stats = aggregate(&survey, &responses);

        let QuestionStat::Rating(rating) = &stats["q1"] else {
            panic!("expected rating stat");
        };
        assert_eq!((rating.average, rating.count, rating.total_answers), (4.0, 2, 3));

        let QuestionStat::MultipleChoice(frequency) = &stats["q2"] else {
            panic!("expected multiple-choice stat");
        };
        assert_eq!(frequency.count("Weekly"), Some(1));
        assert_eq!(frequency.percentage("Daily"), Some(33.3));
        assert_eq!(frequency.count("First time"), Some(0));

        let QuestionStat::Checkbox(likes) = &stats["q3"] else {
            panic!("expected checkbox stat");
        };
        assert_eq!(likes.count("Staff Service"), Some(2));
        assert_eq!(likes.percentage("Staff Service"), Some(100.0));

        let QuestionStat::YesNo(recommend) = &stats["q4"] else {
            panic!("expected yes/no stat");
        };
        assert_eq!((recommend.yes_count, recommend.no_count), (1, 1));
        assert_eq!(recommend.yes_percentage, 50.0);

        let QuestionStat::Text(comments) = &stats["q5"] else {
            panic!("expected text stat");
        };
        assert_eq!(
            comments.answers,
            vec!["Love the allergen labels.", "More gluten-free options, please"]
        );

        let catalog = load_catalog(&fixtures.join("catalog.json")).unwrap();
        let catalog_stats = crate::catalog::CatalogStats::from_surveys(&catalog);
        assert_eq!(catalog_stats.total_responses, 2393);
        assert_eq!(catalog_stats.active_rate, 50);
    }
}
