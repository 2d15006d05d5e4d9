//! Command orchestration from UI actions to the backend queue, plus the
//! channel-backed router and toast service handed to delete controllers.

use client_core::{Navigator, Notifier};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{Toast, UiEvent};

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend command processor disconnected (possible startup/runtime failure); restart the dashboard"
                    .to_string();
        }
    }
}

pub struct ChannelNavigator {
    ui_tx: Sender<UiEvent>,
}

impl ChannelNavigator {
    pub fn new(ui_tx: Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, path: &str) {
        if self
            .ui_tx
            .try_send(UiEvent::Navigate(path.to_string()))
            .is_err()
        {
            tracing::warn!(path, "dropped navigation: UI event queue unavailable");
        }
    }
}

pub struct ChannelNotifier {
    ui_tx: Sender<UiEvent>,
}

impl ChannelNotifier {
    pub fn new(ui_tx: Sender<UiEvent>) -> Self {
        Self { ui_tx }
    }

    fn push(&self, toast: Toast) {
        if let Err(err) = self.ui_tx.try_send(UiEvent::Toast(toast)) {
            let toast = match err {
                TrySendError::Full(UiEvent::Toast(toast))
                | TrySendError::Disconnected(UiEvent::Toast(toast)) => toast.text,
                _ => String::new(),
            };
            tracing::warn!(toast = %toast, "dropped notification: UI event queue unavailable");
        }
    }
}

impl Notifier for ChannelNotifier {
    fn notify_success(&self, text: &str) {
        self.push(Toast::success(text));
    }

    fn notify_error(&self, text: &str) {
        self.push(Toast::error(text));
    }
}
