//! Authenticated layout chrome: navbar, sidebar navigation, and the toast tray.

use std::time::{Duration, Instant};

use eframe::egui;
use shared::domain::CurrentUser;

use crate::controller::events::{Toast, ToastKind};
use crate::ui::routes::{self, Route};

const TOAST_TTL: Duration = Duration::from_secs(4);
const MAX_VISIBLE_TOASTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavbarAction {
    ToggleSidebar,
    Logout,
}

pub fn show_navbar(ctx: &egui::Context, user: Option<&CurrentUser>) -> Option<NavbarAction> {
    let mut action = None;
    egui::TopBottomPanel::top("navbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("☰").on_hover_text("Toggle sidebar").clicked() {
                action = Some(NavbarAction::ToggleSidebar);
            }
            ui.heading("Clinic Dashboard");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| match user {
                Some(user) => {
                    if ui.button("Log out").clicked() {
                        action = Some(NavbarAction::Logout);
                    }
                    ui.label(egui::RichText::new(&user.display_name).strong());
                    if let Some(role) = &user.role {
                        ui.label(egui::RichText::new(role).weak());
                    }
                }
                None => {
                    ui.label(egui::RichText::new("Not signed in").weak());
                }
            });
        });
    });
    action
}

/// Returns the path the user picked in the sidebar, if any.
///
/// Links are greyed out when `enabled` is false.
pub fn show_sidebar(ctx: &egui::Context, current: &Route, enabled: bool) -> Option<String> {
    let mut picked = None;
    egui::SidePanel::left("sidebar")
        .resizable(false)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.add_space(8.0);
            for (label, path) in [
                ("Overview", routes::OVERVIEW),
                ("Patients", routes::PATIENTS),
                ("Diet Charts", routes::DIET_CHARTS),
            ] {
                let active = current.path().starts_with(path)
                    && (path != routes::OVERVIEW || *current == Route::Overview);
                let text = if active {
                    egui::RichText::new(label).strong()
                } else {
                    egui::RichText::new(label)
                };
                if ui
                    .add_enabled(enabled, egui::Button::new(text).frame(active))
                    .clicked()
                {
                    picked = Some(path.to_string());
                }
            }
        });
    picked
}

#[derive(Default)]
pub struct ToastTray {
    toasts: Vec<(Toast, Instant)>,
}

impl ToastTray {
    pub fn push(&mut self, toast: Toast, now: Instant) {
        self.toasts.push((toast, now));
        if self.toasts.len() > MAX_VISIBLE_TOASTS {
            let overflow = self.toasts.len() - MAX_VISIBLE_TOASTS;
            self.toasts.drain(..overflow);
        }
    }

    pub fn expire(&mut self, now: Instant) {
        self.toasts
            .retain(|(_, shown_at)| now.saturating_duration_since(*shown_at) < TOAST_TTL);
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().map(|(toast, _)| toast)
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn show(&self, ctx: &egui::Context) {
        if self.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toast_tray"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .show(ctx, |ui| {
                for toast in self.visible() {
                    let fill = match toast.kind {
                        ToastKind::Success => egui::Color32::from_rgb(38, 110, 64),
                        ToastKind::Error => egui::Color32::from_rgb(140, 45, 45),
                    };
                    egui::Frame::NONE
                        .fill(fill)
                        .corner_radius(6.0)
                        .inner_margin(egui::Margin::symmetric(10, 8))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(&toast.text).color(egui::Color32::WHITE),
                            );
                        });
                    ui.add_space(6.0);
                }
            });
    }
}
