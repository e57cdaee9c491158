use crate::application::use_cases::report_workflow_runs::{
    ReportWorkflowRunsUseCase, ReportWorkflowRunsUseCaseInput, ReportWorkflowRunsUseCaseOutput,
};
use crate::domain::external_apis::github::FetchError;
use crate::domain::models::inputs::ActionInputs;
use crate::infrastructures::adapters::secondary::external_apis::github::DEFAULT_API_URL;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("Input required and not supplied: {0}")]
    MissingInput(&'static str),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Unable to write action output: {0}")]
    Output(#[from] io::Error),
    #[error("Unable to serialize action output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Snapshot of the variables the runner hands to the action.
#[derive(Debug, Clone, Default)]
pub struct ActionEnvironment {
    vars: HashMap<String, String>,
}

impl ActionEnvironment {
    pub fn from_process() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Trimmed value of `INPUT_<NAME>`, `None` when unset or blank.
    pub fn input(&self, name: &str) -> Option<String> {
        let key = format!("INPUT_{}", name.replace(' ', "_").to_uppercase());
        self.var(&key)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }

    pub fn required_input(&self, name: &'static str) -> Result<String, ActionError> {
        self.input(name).ok_or(ActionError::MissingInput(name))
    }

    pub fn action_inputs(&self) -> Result<ActionInputs, ActionError> {
        let owner = self.required_input("owner")?;
        let repo = self.required_input("repo")?;
        let pat = self.required_input("pat")?;
        Ok(ActionInputs::new(owner, repo, pat, self.input("sha")))
    }

    pub fn api_url(&self) -> String {
        self.var("GITHUB_API_URL")
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .to_string()
    }

    pub fn output_file(&self) -> Option<PathBuf> {
        self.var("GITHUB_OUTPUT")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }

    /// Pretty-printed webhook payload of the triggering event, if the runner provided one.
    pub fn event_payload(&self) -> Option<String> {
        let path = self.var("GITHUB_EVENT_PATH")?;
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::debug!("Cannot read event payload at {}: {}", path, e);
                return None;
            }
        };
        serde_json::from_str::<serde_json::Value>(&raw)
            .and_then(|value| serde_json::to_string_pretty(&value))
            .inspect_err(|e| tracing::debug!("Event payload at {} is not JSON: {}", path, e))
            .ok()
    }
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// Writes workflow commands to `out` and outputs to the `GITHUB_OUTPUT` file when there is one.
pub struct WorkflowCommands<W: Write> {
    out: W,
    output_file: Option<PathBuf>,
}

impl<W: Write> WorkflowCommands<W> {
    pub fn new(out: W, output_file: Option<PathBuf>) -> Self {
        Self { out, output_file }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn add_mask(&mut self, secret: &str) -> io::Result<()> {
        writeln!(self.out, "::add-mask::{}", escape_data(secret))
    }

    pub fn set_failed(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "::error::{}", escape_data(message))
    }

    pub fn set_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        let Some(path) = &self.output_file else {
            return writeln!(
                self.out,
                "::set-output name={}::{}",
                escape_property(name),
                escape_data(value)
            );
        };

        let delimiter = format!("ghadelimiter_{:032x}", rand::random::<u128>());
        if name.contains(&delimiter) || value.contains(&delimiter) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("output {name} collides with its delimiter"),
            ));
        }

        let mut file = OpenOptions::new().append(true).create(true).open(path)?;
        write!(file, "{name}<<{delimiter}\n{value}\n{delimiter}\n")
    }

    pub fn publish(&mut self, output: &ReportWorkflowRunsUseCaseOutput) -> Result<(), ActionError> {
        self.set_output("status", output.status)?;
        self.set_output("response", &output.response)?;
        self.set_output("results", &serde_json::to_string(&output.results)?)?;
        Ok(())
    }
}

/// One action invocation: read inputs, fetch the runs, publish the outputs.
#[tracing::instrument(name = "action::run", skip_all)]
pub async fn run<U, W>(
    use_case: &U,
    environment: &ActionEnvironment,
    commands: &mut WorkflowCommands<W>,
) -> Result<(), ActionError>
where
    U: ReportWorkflowRunsUseCase + Sync,
    W: Write + Send,
{
    let inputs = environment.action_inputs()?;
    commands.add_mask(inputs.token.expose_secret())?;

    if let Some(payload) = environment.event_payload() {
        tracing::debug!("The event payload: {}", payload);
    }

    let output = use_case
        .execute(ReportWorkflowRunsUseCaseInput { inputs })
        .await?;
    commands.publish(&output)?;

    Ok(())
}
