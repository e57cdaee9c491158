use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRun {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>, // workflow name
    #[serde(default)]
    pub display_title: Option<String>,
    pub event: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>, // only set once status is "completed"
    pub head_sha: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// The /actions/runs endpoint wraps the runs in an object keyed by workflow_runs.
#[derive(Debug, Deserialize)]
pub struct WorkflowRunsListing {
    #[serde(default)]
    pub total_count: u64,
    pub workflow_runs: Vec<WorkflowRun>,
}

impl WorkflowRunsListing {
    pub fn parse(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Runs triggered for `sha`, or every run when no sha is given.
    pub fn runs_for_sha(self, sha: Option<&str>) -> Vec<WorkflowRun> {
        match sha {
            Some(sha) => self
                .workflow_runs
                .into_iter()
                .filter(|run| run.head_sha.eq_ignore_ascii_case(sha))
                .collect(),
            None => self.workflow_runs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"{
        "total_count": 3,
        "workflow_runs": [
            {
                "id": 1,
                "name": "CI",
                "display_title": "Bump deps",
                "event": "push",
                "status": "completed",
                "conclusion": "success",
                "head_sha": "abc123",
                "html_url": "https://github.com/acme/widgets/actions/runs/1",
                "created_at": "2024-05-01T10:00:00Z",
                "updated_at": "2024-05-01T10:05:00Z",
                "run_attempt": 1
            },
            {
                "id": 2,
                "name": "Release",
                "display_title": "Bump deps",
                "event": "push",
                "status": "in_progress",
                "conclusion": null,
                "head_sha": "ABC123",
                "html_url": "https://github.com/acme/widgets/actions/runs/2",
                "created_at": "2024-05-01T10:01:00Z",
                "updated_at": "2024-05-01T10:02:00Z"
            },
            {
                "id": 3,
                "name": "CI",
                "display_title": "Fix typo",
                "event": "pull_request",
                "status": "queued",
                "head_sha": "def456",
                "html_url": "https://github.com/acme/widgets/actions/runs/3",
                "created_at": "2024-04-30T09:00:00Z",
                "updated_at": "2024-04-30T09:00:00Z"
            }
        ]
    }"#;

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let listing = WorkflowRunsListing::parse(LISTING).unwrap();

        assert_eq!(listing.total_count, 3);
        assert_eq!(listing.workflow_runs.len(), 3);
        assert_eq!(listing.workflow_runs[0].conclusion.as_deref(), Some("success"));
        assert_eq!(listing.workflow_runs[1].conclusion, None);
        assert_eq!(
            listing.workflow_runs[0].created_at.to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
    }

    #[test]
    fn test_runs_for_sha_filters_case_insensitively() {
        let runs = WorkflowRunsListing::parse(LISTING)
            .unwrap()
            .runs_for_sha(Some("abc123"));

        let ids: Vec<u64> = runs.iter().map(|run| run.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_runs_for_sha_without_sha_keeps_everything() {
        let runs = WorkflowRunsListing::parse(LISTING).unwrap().runs_for_sha(None);
        assert_eq!(runs.len(), 3);
    }

    #[test]
    fn test_parse_rejects_error_bodies() {
        let body = r#"{"message":"Bad credentials","documentation_url":"https://docs.github.com/rest"}"#;
        assert!(WorkflowRunsListing::parse(body).is_err());
    }
}
