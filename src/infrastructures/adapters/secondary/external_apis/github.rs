use crate::domain::external_apis::github::{FetchError, RunsFetcher};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const EVEREST_PREVIEW_ACCEPT: &str = "application/vnd.github.everest-preview+json";
const ACTION_USER_AGENT: &str = concat!("workflow-runs-action/", env!("CARGO_PKG_VERSION"));

pub fn runs_url(base_url: &str, owner: &str, repo: &str) -> String {
    format!(
        "{}/repos/{}/{}/actions/runs",
        base_url.trim_end_matches('/'),
        owner,
        repo
    )
}

/// `Basic` credentials for the owner/token pair.
pub fn basic_authorization(owner: &str, token: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{owner}:{token}")))
}

pub struct GitHubApiAdapter {
    client: Client,
    base_url: String,
}

impl GitHubApiAdapter {
    pub fn new(base_url: String) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl RunsFetcher for GitHubApiAdapter {
    #[tracing::instrument(name = "GitHubApiAdapter::fetch_runs", skip(self, token))]
    async fn fetch_runs(
        &self,
        owner: &str,
        repo: &str,
        token: &SecretString,
    ) -> Result<String, FetchError> {
        let url = runs_url(&self.base_url, owner, repo);

        let mut authorization =
            HeaderValue::from_str(&basic_authorization(owner, token.expose_secret()))
                .map_err(FetchError::transport)?;
        authorization.set_sensitive(true);

        tracing::info!("Requesting workflow runs from {}", url);
        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, EVEREST_PREVIEW_ACCEPT)
            .header(AUTHORIZATION, authorization)
            .header(USER_AGENT, ACTION_USER_AGENT)
            .send()
            .await
            .map_err(FetchError::transport)?;

        // The status is reported but never turned into an error.
        let status = response.status();
        if status.is_success() {
            tracing::debug!("GitHub responded with {}", status);
        } else {
            tracing::warn!("GitHub responded with {}, passing the body through", status);
        }

        let mut body = Vec::new();
        let mut chunks = response.bytes_stream();
        while let Some(chunk) = chunks.next().await {
            body.extend_from_slice(&chunk.map_err(FetchError::transport)?);
        }
        tracing::debug!("Read {} bytes of workflow runs", body.len());

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
