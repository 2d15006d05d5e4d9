//! Confirm-then-delete flow: a pure phase machine plus the controller that drives it.
//!
//! The phase machine knows nothing about HTTP or rendering. It maps an input to
//! the next phase and a list of effects; [`ConfirmDeleteController`] performs
//! those effects against injected collaborators and publishes every state
//! change on a `watch` channel so renderers can read it without awaiting.
//!
//! # Invariants
//! - The dialog is only open while a target is set.
//! - At most one delete request is in flight per controller.
//! - A failed delete leaves the dialog open so the user can retry or cancel.

use std::{sync::Arc, time::Duration};

use shared::domain::DeleteTarget;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    collaborators::{Navigator, Notifier},
    error::MutationError,
    DeleteApi, DEFAULT_REQUEST_TIMEOUT,
};

const FALLBACK_SUCCESS_MESSAGE: &str = "Successfully deleted!";
const INTERRUPTED_MESSAGE: &str = "The delete request was interrupted before it finished; try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmPhase {
    #[default]
    Idle,
    Confirming,
    Submitting,
    Succeeded,
}

impl ConfirmPhase {
    pub fn is_dialog_open(self) -> bool {
        matches!(self, ConfirmPhase::Confirming | ConfirmPhase::Submitting)
    }

    pub fn accepts_confirm(self) -> bool {
        self == ConfirmPhase::Confirming
    }

    pub fn transition(
        self,
        input: ConfirmInput,
        target: Option<&DeleteTarget>,
        destination: &str,
    ) -> Transition {
        match (self, input) {
            (ConfirmPhase::Idle | ConfirmPhase::Succeeded, ConfirmInput::Trigger)
                if target.is_some() =>
            {
                Transition::to(ConfirmPhase::Confirming)
            }
            (ConfirmPhase::Confirming, ConfirmInput::Cancel) => Transition::to(ConfirmPhase::Idle),
            (ConfirmPhase::Confirming, ConfirmInput::Confirm) if target.is_some() => {
                Transition::with(ConfirmPhase::Submitting, vec![ConfirmEffect::IssueDelete])
            }
            (ConfirmPhase::Submitting, ConfirmInput::Completed(Ok(()))) => {
                let text = target.map_or(FALLBACK_SUCCESS_MESSAGE, DeleteTarget::success_message);
                Transition::with(
                    ConfirmPhase::Succeeded,
                    vec![
                        ConfirmEffect::NotifySuccess(text.to_string()),
                        ConfirmEffect::Navigate(destination.to_string()),
                    ],
                )
            }
            (ConfirmPhase::Submitting, ConfirmInput::Completed(Err(message))) => Transition::with(
                ConfirmPhase::Confirming,
                vec![ConfirmEffect::NotifyError(message)],
            ),
            (phase, _) => Transition::to(phase),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmInput {
    Trigger,
    Cancel,
    Confirm,
    /// Result of the delete request; the error carries the user-facing text.
    Completed(Result<(), String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmEffect {
    IssueDelete,
    NotifySuccess(String),
    NotifyError(String),
    Navigate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: ConfirmPhase,
    pub effects: Vec<ConfirmEffect>,
}

impl Transition {
    fn to(next: ConfirmPhase) -> Self {
        Self {
            next,
            effects: Vec::new(),
        }
    }

    fn with(next: ConfirmPhase, effects: Vec<ConfirmEffect>) -> Self {
        Self { next, effects }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmState {
    pub phase: ConfirmPhase,
    pub target: Option<DeleteTarget>,
    pub last_error: Option<String>,
}

impl ConfirmState {
    pub fn is_dialog_open(&self) -> bool {
        self.target.is_some() && self.phase.is_dialog_open()
    }
}

#[derive(Debug)]
pub enum ConfirmOutcome {
    Succeeded,
    Failed(MutationError),
    /// Confirm arrived while no confirmation was pending, e.g. a second click
    /// during submission.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("delete target cannot change while its confirmation dialog is open")]
pub struct TargetLocked;

/// Puts a controller left in `Submitting` back into `Confirming` when the
/// confirm future is dropped before its completion transition ran.
struct SubmitGuard<'a> {
    state: &'a watch::Sender<ConfirmState>,
    armed: bool,
}

impl<'a> SubmitGuard<'a> {
    fn arm(state: &'a watch::Sender<ConfirmState>) -> Self {
        Self { state, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let reset = self.state.send_if_modified(|state| {
            if state.phase != ConfirmPhase::Submitting {
                return false;
            }
            state.phase = ConfirmPhase::Confirming;
            state.last_error = Some(INTERRUPTED_MESSAGE.to_string());
            true
        });
        if reset {
            warn!("delete request dropped mid-flight; dialog reopened for retry");
        }
    }
}

struct Applied {
    effects: Vec<ConfirmEffect>,
    target: Option<DeleteTarget>,
}

pub struct ConfirmDeleteController {
    api: Arc<dyn DeleteApi>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    destination: String,
    request_timeout: Duration,
    state: watch::Sender<ConfirmState>,
}

impl ConfirmDeleteController {
    pub fn new(
        api: Arc<dyn DeleteApi>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        destination: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(ConfirmState::default());
        Self {
            api,
            navigator,
            notifier,
            destination: destination.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            state,
        }
    }

    pub fn with_target(self, target: DeleteTarget) -> Self {
        self.state.send_modify(|state| state.target = Some(target));
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn snapshot(&self) -> ConfirmState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConfirmState> {
        self.state.subscribe()
    }

    pub fn set_target(&self, target: Option<DeleteTarget>) -> Result<(), TargetLocked> {
        let mut locked = false;
        self.state.send_if_modified(|state| {
            if state.phase.is_dialog_open() {
                locked = state.target != target;
                return false;
            }
            if state.target == target {
                return false;
            }
            state.target = target;
            state.last_error = None;
            if state.phase == ConfirmPhase::Succeeded {
                state.phase = ConfirmPhase::Idle;
            }
            true
        });
        if locked {
            Err(TargetLocked)
        } else {
            Ok(())
        }
    }

    /// Opens the dialog. Returns whether the dialog is now open.
    pub fn trigger(&self) -> bool {
        self.apply(ConfirmInput::Trigger);
        let opened = self.state.borrow().is_dialog_open();
        if !opened {
            debug!("trigger ignored: no delete target selected");
        }
        opened
    }

    /// Selects `target` and opens the dialog for it in one step.
    pub fn trigger_for(&self, target: DeleteTarget) -> Result<bool, TargetLocked> {
        self.set_target(Some(target))?;
        Ok(self.trigger())
    }

    /// Closes the dialog without issuing a request. Ignored while submitting.
    pub fn cancel(&self) -> bool {
        self.apply(ConfirmInput::Cancel);
        self.state.borrow().phase == ConfirmPhase::Idle
    }

    pub async fn confirm(&self) -> ConfirmOutcome {
        let applied = self.apply(ConfirmInput::Confirm);
        if !applied.effects.contains(&ConfirmEffect::IssueDelete) {
            debug!("confirm ignored: no confirmation pending");
            return ConfirmOutcome::Ignored;
        }
        let Some(target) = applied.target else {
            return ConfirmOutcome::Ignored;
        };

        info!(
            target_kind = target.kind().as_str(),
            target_id = target.id(),
            "submitting delete"
        );
        let mut guard = SubmitGuard::arm(&self.state);
        let result = match tokio::time::timeout(self.request_timeout, self.api.delete(&target))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(MutationError::Timeout(self.request_timeout)),
        };

        let input = match &result {
            Ok(()) => ConfirmInput::Completed(Ok(())),
            Err(err) => {
                warn!(
                    target_kind = target.kind().as_str(),
                    target_id = target.id(),
                    status = err.status(),
                    "delete failed: {err}"
                );
                ConfirmInput::Completed(Err(err.user_message(&target)))
            }
        };
        guard.disarm();
        let applied = self.apply(input);
        self.run_effects(applied.effects);

        match result {
            Ok(()) => ConfirmOutcome::Succeeded,
            Err(err) => ConfirmOutcome::Failed(err),
        }
    }

    fn apply(&self, input: ConfirmInput) -> Applied {
        let mut applied = Applied {
            effects: Vec::new(),
            target: None,
        };
        self.state.send_if_modified(|state| {
            let clears_error = matches!(
                input,
                ConfirmInput::Trigger | ConfirmInput::Cancel | ConfirmInput::Confirm
            );
            let transition =
                state
                    .phase
                    .transition(input, state.target.as_ref(), &self.destination);
            let mut changed = transition.next != state.phase;
            if changed {
                debug!(from = ?state.phase, to = ?transition.next, "confirm phase change");
                if clears_error {
                    state.last_error = None;
                }
            }
            for effect in &transition.effects {
                if let ConfirmEffect::NotifyError(text) = effect {
                    state.last_error = Some(text.clone());
                    changed = true;
                }
            }
            state.phase = transition.next;
            applied.target = state.target.clone();
            applied.effects = transition.effects;
            changed
        });
        applied
    }

    fn run_effects(&self, effects: Vec<ConfirmEffect>) {
        for effect in effects {
            match effect {
                ConfirmEffect::NotifySuccess(text) => self.notifier.notify_success(&text),
                ConfirmEffect::NotifyError(text) => self.notifier.notify_error(&text),
                ConfirmEffect::Navigate(path) => self.navigator.navigate(&path),
                ConfirmEffect::IssueDelete => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/confirm_tests.rs"]
mod tests;
