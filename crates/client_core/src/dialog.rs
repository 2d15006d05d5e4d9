//! Controlled confirmation dialog: copy, view model, and action dispatch.
//!
//! The dialog never performs the delete itself; it only reports which of its
//! two controls was activated.

use shared::domain::DeleteTarget;

use crate::confirm::{ConfirmPhase, ConfirmState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogCopy {
    pub trigger_label: &'static str,
    pub title: &'static str,
    pub description: String,
    pub cancel_label: &'static str,
    pub confirm_label: &'static str,
}

impl DialogCopy {
    pub fn for_target(target: &DeleteTarget) -> Self {
        let subject = target.subject_label();
        match target {
            DeleteTarget::Patient { .. } => Self {
                trigger_label: "Delete Patient",
                title: "Delete Patient",
                description: format!(
                    "Are you sure you want to delete the patient \"{subject}\"? This action cannot be undone."
                ),
                cancel_label: "Cancel",
                confirm_label: "Delete",
            },
            DeleteTarget::DietChart { .. } => Self {
                trigger_label: "Delete Plan",
                title: "Are you absolutely sure?",
                description: format!(
                    "This action cannot be undone. This will permanently delete the diet chart \"{subject}\" and remove its data from our servers."
                ),
                cancel_label: "Cancel",
                confirm_label: "OK",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Cancel,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub title: &'static str,
    pub description: String,
    pub cancel_label: &'static str,
    pub confirm_label: &'static str,
    pub confirm_enabled: bool,
    /// A request is in flight; renderers show progress next to the controls.
    pub busy: bool,
    pub error: Option<String>,
}

impl DialogView {
    /// Routes an activated control to the matching callback.
    ///
    /// A confirm on a disabled control is swallowed.
    pub fn dispatch(
        &self,
        action: DialogAction,
        on_close: impl FnOnce(),
        on_confirm: impl FnOnce(),
    ) -> bool {
        match action {
            DialogAction::Cancel => {
                on_close();
                true
            }
            DialogAction::Confirm if self.confirm_enabled => {
                on_confirm();
                true
            }
            DialogAction::Confirm => false,
        }
    }
}

pub struct ConfirmDialog;

impl ConfirmDialog {
    /// Returns `None` when closed, so no confirm control exists to activate.
    pub fn view(is_open: bool, copy: &DialogCopy, confirm_enabled: bool) -> Option<DialogView> {
        if !is_open {
            return None;
        }
        Some(DialogView {
            title: copy.title,
            description: copy.description.clone(),
            cancel_label: copy.cancel_label,
            confirm_label: copy.confirm_label,
            confirm_enabled,
            busy: false,
            error: None,
        })
    }

    pub fn from_state(state: &ConfirmState) -> Option<DialogView> {
        let target = state.target.as_ref()?;
        let copy = DialogCopy::for_target(target);
        let mut view = Self::view(
            state.is_dialog_open(),
            &copy,
            state.phase.accepts_confirm(),
        )?;
        view.busy = is_busy(state);
        view.error = state.last_error.clone();
        Some(view)
    }
}

pub fn is_busy(state: &ConfirmState) -> bool {
    state.phase == ConfirmPhase::Submitting
}
