//! Page bodies. Each returns the action the user took this frame; the app
//! shell owns state and delete controllers.

use client_core::DialogCopy;
use eframe::egui;
use shared::{
    domain::{DeleteTarget, DietChartId},
    protocol::{DietChartSummary, PatientSummary},
};

use crate::ui::routes::{self, Route};

pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

pub enum PageAction {
    Navigate(String),
    /// Select the target and open its confirmation dialog.
    Delete(DeleteTarget),
    /// Open the confirmation dialog for the page's own target.
    TriggerDelete,
    Reload,
}

fn show_load_state<'a, T>(
    ui: &mut egui::Ui,
    state: &'a LoadState<T>,
    action: &mut Option<PageAction>,
) -> Option<&'a T> {
    match state {
        LoadState::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading…");
            });
            None
        }
        LoadState::Failed(reason) => {
            ui.colored_label(egui::Color32::from_rgb(235, 110, 110), reason);
            if ui.button("Retry").clicked() {
                *action = Some(PageAction::Reload);
            }
            None
        }
        LoadState::Loaded(value) => Some(value),
    }
}

pub fn show_overview(ui: &mut egui::Ui) -> Option<PageAction> {
    let mut action = None;
    ui.heading("Manager overview");
    ui.label("Manage patients and their diet plans.");
    ui.add_space(12.0);
    ui.horizontal(|ui| {
        if ui.button("Patients").clicked() {
            action = Some(PageAction::Navigate(routes::PATIENTS.to_string()));
        }
        if ui.button("Diet Charts").clicked() {
            action = Some(PageAction::Navigate(routes::DIET_CHARTS.to_string()));
        }
    });
    action
}

pub fn show_patients(
    ui: &mut egui::Ui,
    rows: &LoadState<Vec<PatientSummary>>,
    dialog_open: bool,
) -> Option<PageAction> {
    let mut action = None;
    ui.heading("Patients");
    ui.add_space(8.0);
    let Some(rows) = show_load_state(ui, rows, &mut action) else {
        return action;
    };
    if rows.is_empty() {
        ui.label(egui::RichText::new("No patients yet.").weak());
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("patients_grid")
            .striped(true)
            .num_columns(3)
            .spacing([24.0, 8.0])
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Name").strong());
                ui.label(egui::RichText::new("Email").strong());
                ui.label("");
                ui.end_row();

                for row in rows {
                    ui.label(&row.name);
                    ui.label(row.email.as_deref().unwrap_or("—"));
                    let target = DeleteTarget::Patient {
                        id: row.id.clone(),
                        name: row.name.clone(),
                    };
                    let label = DialogCopy::for_target(&target).trigger_label;
                    if ui.add_enabled(!dialog_open, egui::Button::new(label)).clicked() {
                        action = Some(PageAction::Delete(target));
                    }
                    ui.end_row();
                }
            });
    });
    action
}

pub fn show_diet_charts(
    ui: &mut egui::Ui,
    rows: &LoadState<Vec<DietChartSummary>>,
) -> Option<PageAction> {
    let mut action = None;
    ui.heading("Diet Charts");
    ui.add_space(8.0);
    let Some(rows) = show_load_state(ui, rows, &mut action) else {
        return action;
    };
    if rows.is_empty() {
        ui.label(egui::RichText::new("No diet charts yet.").weak());
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        for row in rows {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&row.title).strong());
                if let Some(patient) = &row.patient_name {
                    ui.label(egui::RichText::new(patient).weak());
                }
                if ui.button("Open").clicked() {
                    action = Some(PageAction::Navigate(
                        Route::DietChart(row.id.clone()).path(),
                    ));
                }
            });
        }
    });
    action
}

pub fn show_diet_chart(
    ui: &mut egui::Ui,
    id: &DietChartId,
    summary: Option<&DietChartSummary>,
    dialog_open: bool,
) -> Option<PageAction> {
    let mut action = None;
    match summary {
        Some(chart) => {
            ui.heading(&chart.title);
            if let Some(patient) = &chart.patient_name {
                ui.label(format!("Patient: {patient}"));
            }
        }
        None => {
            ui.heading(format!("Diet chart {id}"));
        }
    }
    ui.label(egui::RichText::new(format!("id: {id}")).weak());
    ui.add_space(12.0);

    let copy = DialogCopy::for_target(&DeleteTarget::DietChart { id: id.clone() });
    let trigger = egui::Button::new(
        egui::RichText::new(copy.trigger_label).color(egui::Color32::WHITE),
    )
    .fill(egui::Color32::from_rgb(190, 45, 45));
    if ui.add_enabled(!dialog_open, trigger).clicked() {
        action = Some(PageAction::TriggerDelete);
    }
    action
}

pub fn show_not_found(ui: &mut egui::Ui, path: &str) -> Option<PageAction> {
    ui.heading("Page not found");
    ui.label(format!("Nothing lives at {path}."));
    if ui.button("Back to overview").clicked() {
        return Some(PageAction::Navigate(routes::OVERVIEW.to_string()));
    }
    None
}
