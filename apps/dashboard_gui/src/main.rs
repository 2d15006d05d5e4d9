use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client_core::{load_settings, AuthSession, HttpDashboardClient, StaticSession};
use crossbeam_channel::bounded;
use eframe::egui;
use shared::domain::CurrentUser;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{routes, DashboardApp};

#[derive(Parser, Debug)]
#[command(name = "dashboard_gui", about = "Clinic manager dashboard")]
struct Args {
    /// Settings file; defaults to ./dashboard.toml or the user config dir.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured API base URL.
    #[arg(long)]
    api_url: Option<String>,
    /// Route to open on startup.
    #[arg(long, default_value = routes::OVERVIEW)]
    route: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
        settings.validate()?;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    tracing::info!(api = %settings.api_base_url, "starting dashboard");

    let user = settings.display_name.clone().map(|display_name| CurrentUser {
        user_id: "manager".to_string(),
        display_name,
        role: Some("manager".to_string()),
    });
    let session: Arc<dyn AuthSession> =
        Arc::new(StaticSession::new(user, settings.access_token.clone()));
    let client = Arc::new(
        HttpDashboardClient::new(
            &settings.api_base_url,
            settings.request_timeout(),
            session.clone(),
        )
        .context("failed to build dashboard API client")?,
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx.clone(), client.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Clinic Dashboard")
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([760.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Clinic Dashboard",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(DashboardApp::new(
                cmd_tx,
                ui_rx,
                ui_tx,
                client,
                session,
                settings,
                &args.route,
            )))
        }),
    )
    .map_err(|err| anyhow!("dashboard window failed: {err}"))
}
