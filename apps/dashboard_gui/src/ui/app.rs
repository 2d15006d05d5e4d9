use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use client_core::{
    is_busy, AuthSession, ConfirmDeleteController, ConfirmDialog, DeleteApi, DialogAction,
    Settings,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    domain::{DeleteTarget, DietChartId},
    protocol::{DietChartSummary, PatientSummary},
};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiErrorContext, UiEvent},
    orchestration::{dispatch_backend_command, ChannelNavigator, ChannelNotifier},
};
use crate::ui::{
    dialog::show_confirm_dialog,
    layout::{show_navbar, show_sidebar, NavbarAction, ToastTray},
    pages::{self, LoadState, PageAction},
    routes::Route,
};

enum Page {
    Overview,
    Patients {
        rows: LoadState<Vec<PatientSummary>>,
        delete: Arc<ConfirmDeleteController>,
    },
    DietCharts {
        rows: LoadState<Vec<DietChartSummary>>,
    },
    DietChart {
        id: DietChartId,
        delete: Arc<ConfirmDeleteController>,
    },
    NotFound(String),
}

pub struct DashboardApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    ui_tx: Sender<UiEvent>,
    api: Arc<dyn DeleteApi>,
    session: Arc<dyn AuthSession>,
    settings: Settings,
    route: Route,
    page: Page,
    diet_charts: Vec<DietChartSummary>,
    toasts: ToastTray,
    sidebar_open: bool,
    status: String,
}

impl DashboardApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        ui_tx: Sender<UiEvent>,
        api: Arc<dyn DeleteApi>,
        session: Arc<dyn AuthSession>,
        settings: Settings,
        initial_route: &str,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            ui_tx,
            api,
            session,
            settings,
            route: Route::Overview,
            page: Page::Overview,
            diet_charts: Vec::new(),
            toasts: ToastTray::default(),
            sidebar_open: true,
            status: "Starting backend worker…".to_string(),
        };
        app.navigate(initial_route);
        app
    }

    fn queue(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn delete_controller(
        &self,
        destination: &str,
        target: Option<DeleteTarget>,
    ) -> Arc<ConfirmDeleteController> {
        let mut controller = ConfirmDeleteController::new(
            self.api.clone(),
            Arc::new(ChannelNavigator::new(self.ui_tx.clone())),
            Arc::new(ChannelNotifier::new(self.ui_tx.clone())),
            destination,
        )
        .with_request_timeout(self.settings.request_timeout());
        if let Some(target) = target {
            controller = controller.with_target(target);
        }
        Arc::new(controller)
    }

    /// Unmounts the current page and mounts the one at `path`.
    fn navigate(&mut self, path: &str) {
        let route = Route::parse(path);
        tracing::info!(path = %route.path(), "navigate");
        self.page = self.mount(&route);
        self.route = route;
    }

    fn mount(&mut self, route: &Route) -> Page {
        match route {
            Route::Overview => Page::Overview,
            Route::Patients => {
                self.queue(BackendCommand::LoadPatients);
                let destination = self.settings.patient_return_route.clone();
                Page::Patients {
                    rows: LoadState::Loading,
                    delete: self.delete_controller(&destination, None),
                }
            }
            Route::DietCharts => {
                self.queue(BackendCommand::LoadDietCharts);
                Page::DietCharts {
                    rows: LoadState::Loading,
                }
            }
            Route::DietChart(id) => {
                if self.diet_charts.is_empty() {
                    self.queue(BackendCommand::LoadDietCharts);
                }
                let destination = self.settings.diet_chart_return_route.clone();
                Page::DietChart {
                    id: id.clone(),
                    delete: self.delete_controller(
                        &destination,
                        Some(DeleteTarget::DietChart { id: id.clone() }),
                    ),
                }
            }
            Route::NotFound(path) => Page::NotFound(path.clone()),
        }
    }

    fn page_controller(&self) -> Option<Arc<ConfirmDeleteController>> {
        match &self.page {
            Page::Patients { delete, .. } | Page::DietChart { delete, .. } => Some(delete.clone()),
            _ => None,
        }
    }

    /// True while the mounted page has a delete in flight; its completion
    /// navigates, so user navigation waits for it.
    fn navigation_locked(&self) -> bool {
        self.page_controller()
            .is_some_and(|controller| is_busy(&controller.snapshot()))
    }

    fn pick_sidebar_route(&mut self, path: &str) {
        if self.navigation_locked() {
            tracing::debug!(path, "sidebar navigation ignored while a delete is in flight");
            return;
        }
        self.navigate(path);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Toast(toast) => {
                    self.toasts.push(toast, Instant::now());
                }
                UiEvent::Navigate(path) => {
                    self.navigate(&path);
                }
                UiEvent::PatientsLoaded(patients) => {
                    if let Page::Patients { rows, .. } = &mut self.page {
                        *rows = LoadState::Loaded(patients);
                    }
                }
                UiEvent::DietChartsLoaded(charts) => {
                    if let Page::DietCharts { rows } = &mut self.page {
                        *rows = LoadState::Loaded(charts.clone());
                    }
                    self.diet_charts = charts;
                }
                UiEvent::Error(err) => {
                    tracing::warn!(
                        context = ?err.context(),
                        category = ?err.category(),
                        reauth = err.requires_reauth(),
                        "{}",
                        err.message()
                    );
                    let summary = err.summary();
                    match (err.context(), &mut self.page) {
                        (UiErrorContext::LoadPatients, Page::Patients { rows, .. }) => {
                            *rows = LoadState::Failed(summary.clone());
                        }
                        (UiErrorContext::LoadDietCharts, Page::DietCharts { rows }) => {
                            *rows = LoadState::Failed(summary.clone());
                        }
                        _ => {}
                    }
                    self.status = summary;
                }
            }
        }
    }

    fn handle_page_action(&mut self, action: PageAction) {
        match action {
            PageAction::Navigate(path) => self.navigate(&path),
            PageAction::Reload => {
                let route = self.route.clone();
                self.page = self.mount(&route);
            }
            PageAction::Delete(target) => {
                if let Some(controller) = self.page_controller() {
                    if let Err(err) = controller.trigger_for(target) {
                        self.status = err.to_string();
                    }
                }
            }
            PageAction::TriggerDelete => {
                if let Some(controller) = self.page_controller() {
                    controller.trigger();
                }
            }
        }
    }

    fn apply_dialog_action(&mut self, action: DialogAction) {
        let Some(controller) = self.page_controller() else {
            return;
        };
        let Some(view) = ConfirmDialog::from_state(&controller.snapshot()) else {
            return;
        };
        let cmd_tx = &self.cmd_tx;
        let status = &mut self.status;
        view.dispatch(
            action,
            || {
                controller.cancel();
            },
            || {
                dispatch_backend_command(
                    cmd_tx,
                    BackendCommand::SubmitDelete {
                        controller: controller.clone(),
                    },
                    status,
                )
            },
        );
    }

    fn show_page(&self, ui: &mut egui::Ui) -> Option<PageAction> {
        match &self.page {
            Page::Overview => pages::show_overview(ui),
            Page::Patients { rows, delete } => {
                pages::show_patients(ui, rows, delete.snapshot().is_dialog_open())
            }
            Page::DietCharts { rows } => pages::show_diet_charts(ui, rows),
            Page::DietChart { id, delete } => pages::show_diet_chart(
                ui,
                id,
                self.diet_charts.iter().find(|chart| &chart.id == id),
                delete.snapshot().is_dialog_open(),
            ),
            Page::NotFound(path) => pages::show_not_found(ui, path),
        }
    }

    fn show_delete_dialog(&mut self, ctx: &egui::Context) {
        let Some(controller) = self.page_controller() else {
            return;
        };
        let Some(view) = ConfirmDialog::from_state(&controller.snapshot()) else {
            return;
        };
        if let Some(action) = show_confirm_dialog(ctx, &view) {
            self.apply_dialog_action(action);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.toasts.expire(Instant::now());

        let user = self.session.current_user();
        match show_navbar(ctx, user.as_ref()) {
            Some(NavbarAction::ToggleSidebar) => self.sidebar_open = !self.sidebar_open,
            Some(NavbarAction::Logout) => {
                self.session.logout();
                self.status = "Signed out".to_string();
            }
            None => {}
        }

        if self.sidebar_open {
            if let Some(path) = show_sidebar(ctx, &self.route, !self.navigation_locked()) {
                self.pick_sidebar_route(&path);
            }
        }

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(egui::RichText::new(self.route.title()).strong());
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });

        let action = egui::CentralPanel::default()
            .show(ctx, |ui| self.show_page(ui))
            .inner;
        if let Some(action) = action {
            self.handle_page_action(action);
        }

        self.show_delete_dialog(ctx);
        self.toasts.show(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
