//! Backend commands queued from UI to backend worker.

use std::sync::Arc;

use client_core::ConfirmDeleteController;

pub enum BackendCommand {
    LoadPatients,
    LoadDietCharts,
    /// Runs the confirm step of a page's delete flow off the UI thread.
    SubmitDelete {
        controller: Arc<ConfirmDeleteController>,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadPatients => "load_patients",
            BackendCommand::LoadDietCharts => "load_diet_charts",
            BackendCommand::SubmitDelete { .. } => "submit_delete",
        }
    }
}
