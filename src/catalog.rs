//! Survey catalog queries.
//!
//! Filtering and headline statistics over the list of surveys, as shown on
//! the admin surveys page.

use crate::models::{Survey, SurveyStatus};
use serde::{Deserialize, Serialize};

/// Catalog filter. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyQuery {
    pub status: Option<SurveyStatus>,
    /// Case-insensitive substring of the title or description.
    pub search: Option<String>,
}

impl SurveyQuery {
    /// Check a single survey against the query.
    pub fn matches(&self, survey: &Survey) -> bool {
        if self.status.is_some_and(|status| survey.status != status) {
            return false;
        }

        match self.search.as_deref().map(str::to_lowercase) {
            Some(term) if !term.is_empty() => {
                survey.title.to_lowercase().contains(&term)
                    || survey.description.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }

    /// Select matching surveys, keeping catalog order.
    pub fn apply<'a>(&self, surveys: &'a [Survey]) -> Vec<&'a Survey> {
        surveys.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Headline numbers for a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    pub active: usize,
    /// Sum of the stored response counters.
    pub total_responses: u64,
    /// Active surveys as a whole percent of all surveys.
    pub active_rate: u32,
}

impl CatalogStats {
    /// Compute catalog statistics.
    pub fn from_surveys(surveys: &[Survey]) -> Self {
        let total = surveys.len();
        let active = surveys
            .iter()
            .filter(|s| s.status == SurveyStatus::Active)
            .count();
        let total_responses = surveys.iter().map(|s| s.response_count).sum();
        let active_rate = if total == 0 {
            0
        } else {
            (active as f64 / total as f64 * 100.0).round() as u32
        };

        Self {
            total,
            active,
            total_responses,
            active_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey(title: &str, description: &str, status: SurveyStatus, responses: u64) -> Survey {
        Survey {
            title: title.to_string(),
            description: description.to_string(),
            status,
            response_count: responses,
            ..Survey::default()
        }
    }

    fn catalog() -> Vec<Survey> {
        vec![
            survey("Customer Satisfaction", "Serve you better", SurveyStatus::Active, 847),
            survey("Product Feedback", "Thoughts about products", SurveyStatus::Active, 1234),
            survey("Store Layout", "Aisle navigation", SurveyStatus::Closed, 12),
        ]
    }

    #[test]
    fn test_filter_by_status() {
        let surveys = catalog();
        let query = SurveyQuery {
            status: Some(SurveyStatus::Closed),
            ..SurveyQuery::default()
        };
        let found = query.apply(&surveys);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Store Layout");
    }

    #[test]
    fn test_search_title_and_description() {
        let surveys = catalog();
        let by_title = SurveyQuery {
            search: Some("FEEDBACK".to_string()),
            ..SurveyQuery::default()
        };
        assert_eq!(by_title.apply(&surveys).len(), 1);

        let by_description = SurveyQuery {
            search: Some("aisle".to_string()),
            ..SurveyQuery::default()
        };
        assert_eq!(by_description.apply(&surveys)[0].title, "Store Layout");

        let blank = SurveyQuery {
            search: Some(String::new()),
            ..SurveyQuery::default()
        };
        assert_eq!(blank.apply(&surveys).len(), 3);
    }

    #[test]
    fn test_catalog_stats() {
        let stats = CatalogStats::from_surveys(&catalog());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.total_responses, 2093);
        assert_eq!(stats.active_rate, 67);

        assert_eq!(CatalogStats::from_surveys(&[]), CatalogStats::default());
    }
}
