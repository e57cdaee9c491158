use crate::domain::external_apis::github::{FetchError, RunsFetcher};
use crate::domain::models::inputs::ActionInputs;
use crate::domain::models::run::{WorkflowRun, WorkflowRunsListing};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Value of the `status` output once the runs were fetched.
pub const SUCCESS_STATUS: &str = "success";

#[derive(Debug)]
pub struct ReportWorkflowRunsUseCaseInput {
    pub inputs: ActionInputs,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReportWorkflowRunsUseCaseOutput {
    pub status: &'static str,
    /// Response body exactly as GitHub sent it.
    pub response: String,
    /// Runs for the requested sha; empty when the body is not a runs listing.
    pub results: Vec<WorkflowRun>,
}

#[async_trait]
pub trait ReportWorkflowRunsUseCase {
    async fn execute(
        &self,
        input: ReportWorkflowRunsUseCaseInput,
    ) -> Result<ReportWorkflowRunsUseCaseOutput, FetchError>;
}

pub struct ReportWorkflowRunsInteractor<G: RunsFetcher + Send + Sync + 'static> {
    github_api: Arc<G>,
}

impl<G: RunsFetcher + Send + Sync + 'static> ReportWorkflowRunsInteractor<G> {
    pub fn new(github_api: Arc<G>) -> Self {
        Self { github_api }
    }
}

#[async_trait]
impl<G: RunsFetcher + Send + Sync + 'static> ReportWorkflowRunsUseCase
    for ReportWorkflowRunsInteractor<G>
{
    #[tracing::instrument(
        name = "ReportWorkflowRunsInteractor::execute",
        skip_all,
        fields(owner = %input.inputs.owner, repo = %input.inputs.repo, sha = ?input.inputs.sha)
    )]
    async fn execute(
        &self,
        input: ReportWorkflowRunsUseCaseInput,
    ) -> Result<ReportWorkflowRunsUseCaseOutput, FetchError> {
        let ActionInputs {
            owner,
            repo,
            token,
            sha,
        } = input.inputs;

        tracing::info!("Fetching workflow runs for {}/{}", owner, repo);
        let response = self.github_api.fetch_runs(&owner, &repo, &token).await?;

        let results = match WorkflowRunsListing::parse(&response) {
            Ok(listing) => {
                tracing::debug!("GitHub reported {} runs in total", listing.total_count);
                listing.runs_for_sha(sha.as_deref())
            }
            Err(e) => {
                tracing::warn!("Response is not a workflow runs listing: {}", e);
                Vec::new()
            }
        };
        tracing::info!("Selected {} workflow runs", results.len());

        Ok(ReportWorkflowRunsUseCaseOutput {
            status: SUCCESS_STATUS,
            response,
            results,
        })
    }
}
