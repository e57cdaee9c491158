use anyhow::Context;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::env;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use workflow_runs_action::application::use_cases::report_workflow_runs::ReportWorkflowRunsInteractor;
use workflow_runs_action::infrastructures::adapters::primary::action::{
    self, ActionEnvironment, WorkflowCommands,
};
use workflow_runs_action::infrastructures::adapters::secondary::external_apis::github::GitHubApiAdapter;

/// Spans are exported over OTLP only when a collector endpoint is configured.
fn init_tracing() -> anyhow::Result<Option<SdkTracerProvider>> {
    let provider = if env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT").is_some() {
        let otlp_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .build()
            .context("Failed to create OTLP exporter")?;
        Some(
            SdkTracerProvider::builder()
                .with_batch_exporter(otlp_exporter)
                .build(),
        )
    } else {
        None
    };

    let telemetry = provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer("workflow-runs-action"))
    });
    // stdout carries workflow commands, so logs go to stderr
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(telemetry)
        .with(fmt_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .context("Failed to initialize tracing")?;

    Ok(provider)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let provider = init_tracing()?;

    let invocation_span = info_span!("invocation");
    info!(parent: &invocation_span, "Action starting");

    let environment = ActionEnvironment::from_process();

    // Build dependencies
    let github_api_adapter = Arc::new(GitHubApiAdapter::new(environment.api_url()));
    let use_case = ReportWorkflowRunsInteractor::new(github_api_adapter);
    let mut commands = WorkflowCommands::new(io::stdout(), environment.output_file());

    let result = action::run(&use_case, &environment, &mut commands)
        .instrument(invocation_span)
        .await;
    let exit_code = match result {
        Ok(()) => {
            info!("Workflow runs reported");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Action failed: {}", e);
            commands
                .set_failed(&e.to_string())
                .context("Failed to report the failure to the runner")?;
            ExitCode::FAILURE
        }
    };

    if let Some(provider) = provider {
        provider
            .shutdown()
            .context("Failed to flush OTLP spans")?;
    }

    Ok(exit_code)
}
