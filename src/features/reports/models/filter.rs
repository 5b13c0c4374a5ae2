use super::{Report, ReportStatus};
use crate::shared::constants::FILTER_ALL;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ReportStatus),
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == FILTER_ALL {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReporterFilter {
    #[default]
    All,
    /// Matches the reporter's name, email, or listing label
    Only(String),
}

impl From<&str> for ReporterFilter {
    fn from(s: &str) -> Self {
        if s.is_empty() || s == FILTER_ALL {
            ReporterFilter::All
        } else {
            ReporterFilter::Only(s.to_string())
        }
    }
}

/// Admin listing predicate. All parts must match.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    /// Case-insensitive substring searched across the text fields
    pub search: Option<String>,
    pub status: StatusFilter,
    pub reporter: ReporterFilter,
}

impl ReportFilter {
    pub fn matches(&self, report: &Report) -> bool {
        self.matches_search(report) && self.matches_status(report) && self.matches_reporter(report)
    }

    fn matches_search(&self, report: &Report) -> bool {
        let Some(term) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        else {
            return true;
        };
        let term = term.to_lowercase();

        [
            report.description.as_deref(),
            report.issue_type.as_deref(),
            report.user_name.as_deref(),
            report.user_id.as_deref(),
            report.address.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }

    fn matches_status(&self, report: &Report) -> bool {
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => report.status == status,
        }
    }

    fn matches_reporter(&self, report: &Report) -> bool {
        match &self.reporter {
            ReporterFilter::All => true,
            ReporterFilter::Only(who) => {
                report.user_name.as_deref() == Some(who.as_str())
                    || report.user_id.as_deref() == Some(who.as_str())
                    || report.reporter_label() == who
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<Report> {
        [
            json!({"id": 1, "userId": "ana@example.com", "userName": "Ana", "issueType": "pothole",
                   "description": "Deep hole near the school", "address": "Main St", "status": "pending"}),
            json!({"id": 2, "userId": "ben@example.com", "userName": "Ben", "issueType": "graffiti",
                   "description": "Tagged wall", "address": "Harbor Rd", "status": "resolved"}),
            json!({"id": 3, "userId": "ana@example.com", "issueType": "water_leak",
                   "address": "main street 4", "status": "in-progress"}),
            json!({"id": 4, "issueType": "other"}),
        ]
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
    }

    fn ids(filter: &ReportFilter) -> Vec<i64> {
        sample()
            .iter()
            .filter(|r| filter.matches(r))
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn test_default_filter_matches_everything() {
        assert_eq!(ids(&ReportFilter::default()), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_search_is_case_insensitive_across_fields() {
        let by_address = ReportFilter {
            search: Some("MAIN".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&by_address), vec![1, 3]);

        let by_email = ReportFilter {
            search: Some("ben@".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&by_email), vec![2]);

        let blank = ReportFilter {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&blank), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_status_filter() {
        for status in ReportStatus::ALL {
            let filter = ReportFilter {
                status: StatusFilter::Only(status),
                ..Default::default()
            };
            for report in sample().iter().filter(|r| filter.matches(r)) {
                assert_eq!(report.status, status);
            }
        }

        let all: StatusFilter = "all".parse().unwrap();
        assert_eq!(all, StatusFilter::All);
        assert!("closed".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_reporter_filter_matches_name_email_or_label() {
        let by_email = ReportFilter {
            reporter: ReporterFilter::from("ana@example.com"),
            ..Default::default()
        };
        assert_eq!(ids(&by_email), vec![1, 3]);

        let by_name = ReportFilter {
            reporter: ReporterFilter::from("Ana"),
            ..Default::default()
        };
        assert_eq!(ids(&by_name), vec![1]);

        let unknown = ReportFilter {
            reporter: ReporterFilter::from("Unknown User"),
            ..Default::default()
        };
        assert_eq!(ids(&unknown), vec![4]);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let filter = ReportFilter {
            search: Some("main".to_string()),
            status: StatusFilter::Only(ReportStatus::InProgress),
            reporter: ReporterFilter::from("ana@example.com"),
        };
        assert_eq!(ids(&filter), vec![3]);
    }
}
