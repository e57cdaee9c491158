use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure (DNS, refused or reset connection, broken body stream).
    /// Displays as the underlying error's own message.
    #[error(transparent)]
    Transport(BoxError),
}

impl FetchError {
    pub fn transport(source: impl Into<BoxError>) -> Self {
        Self::Transport(source.into())
    }
}

#[async_trait]
pub trait RunsFetcher {
    /// Lists the workflow runs of `owner/repo` and returns the response body verbatim.
    ///
    /// Any response whose body is read to the end counts as success, whatever its status.
    async fn fetch_runs(
        &self,
        owner: &str,
        repo: &str,
        token: &SecretString,
    ) -> Result<String, FetchError>;
}
