use std::{
    future::Future,
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, AnonymousSession, AuthSession, ConfirmDeleteController, ConfirmOutcome,
    DeleteApi, DialogCopy, DirectoryApi, HttpDashboardClient, MutationError, Navigator, Notifier,
    Settings, StaticSession,
};
use shared::domain::{DeleteTarget, DietChartId, PatientId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "admin_cli", about = "Clinic dashboard administration from the terminal")]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print patients as JSON.
    ListPatients,
    /// Print diet charts as JSON.
    ListDietCharts,
    DeleteDietChart {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    DeletePatient {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        yes: bool,
    },
}

struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify_success(&self, text: &str) {
        println!("✓ {text}");
    }

    fn notify_error(&self, text: &str) {
        eprintln!("✗ {text}");
    }
}

struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(path, "returning to listing");
        println!("→ {path}");
    }
}

fn prompt_yes_no(question: String) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

async fn ask(question: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || prompt_yes_no(question))
        .await
        .context("prompt task failed")?
}

/// Drives one confirm-then-delete flow. `ask` answers yes/no questions.
///
/// A failed delete that is not retried to success is an error, so the exit
/// status reflects it.
async fn run_delete<F, Fut>(
    api: Arc<dyn DeleteApi>,
    settings: &Settings,
    target: DeleteTarget,
    assume_yes: bool,
    mut ask: F,
) -> Result<()>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let destination = match &target {
        DeleteTarget::Patient { .. } => settings.patient_return_route.clone(),
        DeleteTarget::DietChart { .. } => settings.diet_chart_return_route.clone(),
    };
    let copy = DialogCopy::for_target(&target);
    let controller = ConfirmDeleteController::new(
        api,
        Arc::new(TerminalNavigator),
        Arc::new(TerminalNotifier),
        destination,
    )
    .with_target(target)
    .with_request_timeout(settings.request_timeout());

    controller.trigger();
    println!("{}", copy.title);
    println!("{}", copy.description);

    let mut last_failure: Option<MutationError> = None;
    let mut proceed = assume_yes || ask(format!("{}?", copy.confirm_label)).await?;
    while proceed {
        match controller.confirm().await {
            ConfirmOutcome::Succeeded => return Ok(()),
            ConfirmOutcome::Ignored => bail!("a delete request is already in flight"),
            ConfirmOutcome::Failed(err) => {
                tracing::debug!("delete attempt failed: {err}");
                if assume_yes {
                    return Err(anyhow!("delete failed: {err}"));
                }
                last_failure = Some(err);
                proceed = ask("Retry?".to_string()).await?;
            }
        }
    }

    controller.cancel();
    match last_failure {
        Some(err) => Err(anyhow!("delete failed: {err}")),
        None => {
            println!("{}", copy.cancel_label);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
        settings.validate()?;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let session: Arc<dyn AuthSession> = match settings.access_token.clone() {
        Some(token) => Arc::new(StaticSession::new(None, Some(token))),
        None => Arc::new(AnonymousSession),
    };
    let client = Arc::new(HttpDashboardClient::new(
        &settings.api_base_url,
        settings.request_timeout(),
        session,
    )?);

    match args.command {
        Command::ListPatients => {
            let patients = client.list_patients().await?;
            println!("{}", serde_json::to_string_pretty(&patients)?);
        }
        Command::ListDietCharts => {
            let charts = client.list_diet_charts().await?;
            println!("{}", serde_json::to_string_pretty(&charts)?);
        }
        Command::DeleteDietChart { id, yes } => {
            let target = DeleteTarget::DietChart {
                id: DietChartId::parse(&id)?,
            };
            run_delete(client, &settings, target, yes, ask).await?;
        }
        Command::DeletePatient { id, name, yes } => {
            let target = DeleteTarget::Patient {
                id: PatientId::parse(&id)?,
                name,
            };
            run_delete(client, &settings, target, yes, ask).await?;
        }
    }

    Ok(())
}
