//! egui rendering of the confirmation dialog view.

use client_core::{DialogAction, DialogView};
use eframe::egui;

const DESTRUCTIVE_FILL: egui::Color32 = egui::Color32::from_rgb(190, 45, 45);
const ERROR_TEXT: egui::Color32 = egui::Color32::from_rgb(235, 110, 110);

/// Draws `view` as a centered window and returns the control activated this frame.
///
/// Closing the window or pressing Escape counts as cancel.
pub fn show_confirm_dialog(ctx: &egui::Context, view: &DialogView) -> Option<DialogAction> {
    let mut open = true;
    let mut action = None;

    egui::Window::new(view.title)
        .id(egui::Id::new("confirm_delete_dialog"))
        .collapsible(false)
        .resizable(false)
        .open(&mut open)
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .show(ctx, |ui| {
            ui.set_max_width(420.0);
            ui.label(&view.description);
            if let Some(error) = &view.error {
                ui.add_space(6.0);
                ui.colored_label(ERROR_TEXT, error);
            }
            ui.add_space(10.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let confirm = egui::Button::new(
                    egui::RichText::new(view.confirm_label).color(egui::Color32::WHITE),
                )
                .fill(DESTRUCTIVE_FILL);
                if ui.add_enabled(view.confirm_enabled, confirm).clicked() {
                    action = Some(DialogAction::Confirm);
                }
                if ui.button(view.cancel_label).clicked() {
                    action = Some(DialogAction::Cancel);
                }
                if view.busy {
                    ui.spinner();
                }
            });
        });

    if action.is_none() && (!open || ctx.input(|i| i.key_pressed(egui::Key::Escape))) {
        action = Some(DialogAction::Cancel);
    }
    action
}
