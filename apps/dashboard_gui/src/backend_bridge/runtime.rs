//! Runtime bridge between the UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ConfirmOutcome, DirectoryApi};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    directory: Arc<dyn DirectoryApi>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build backend runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::LoadPatients => {
                        let directory = directory.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let event = match directory.list_patients().await {
                                Ok(patients) => UiEvent::PatientsLoaded(patients),
                                Err(err) => UiEvent::Error(UiError::from_message(
                                    UiErrorContext::LoadPatients,
                                    format!("{err:#}"),
                                )),
                            };
                            let _ = ui_tx.try_send(event);
                        });
                    }
                    BackendCommand::LoadDietCharts => {
                        let directory = directory.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let event = match directory.list_diet_charts().await {
                                Ok(charts) => UiEvent::DietChartsLoaded(charts),
                                Err(err) => UiEvent::Error(UiError::from_message(
                                    UiErrorContext::LoadDietCharts,
                                    format!("{err:#}"),
                                )),
                            };
                            let _ = ui_tx.try_send(event);
                        });
                    }
                    BackendCommand::SubmitDelete { controller } => {
                        tokio::spawn(async move {
                            match controller.confirm().await {
                                ConfirmOutcome::Succeeded => {
                                    tracing::debug!("delete flow finished")
                                }
                                ConfirmOutcome::Failed(err) => {
                                    tracing::debug!("delete flow failed: {err}")
                                }
                                ConfirmOutcome::Ignored => {
                                    tracing::debug!("duplicate confirm ignored")
                                }
                            }
                        });
                    }
                }
            }

            tracing::info!("UI command queue closed; backend worker exiting");
        });
    });
}
