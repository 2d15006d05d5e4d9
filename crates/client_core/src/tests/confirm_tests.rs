use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Toast {
    Success(String),
    Error(String),
}

#[derive(Default)]
struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().expect("toasts").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_success(&self, text: &str) {
        self.toasts
            .lock()
            .expect("toasts")
            .push(Toast::Success(text.to_string()));
    }

    fn notify_error(&self, text: &str) {
        self.toasts
            .lock()
            .expect("toasts")
            .push(Toast::Error(text.to_string()));
    }
}

#[derive(Default)]
struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn visits(&self) -> Vec<String> {
        self.visits.lock().expect("visits").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.lock().expect("visits").push(path.to_string());
    }
}

struct ScriptedApi {
    result: Result<(), MutationError>,
    calls: AtomicUsize,
    seen: Mutex<Vec<DeleteTarget>>,
    gate: Option<Gate>,
}

struct Gate {
    started: Notify,
    release: Notify,
}

impl ScriptedApi {
    fn ok() -> Self {
        Self::returning(Ok(()))
    }

    fn returning(result: Result<(), MutationError>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    fn gated() -> Self {
        let mut api = Self::ok();
        api.gate = Some(Gate {
            started: Notify::new(),
            release: Notify::new(),
        });
        api
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeleteApi for ScriptedApi {
    async fn delete(&self, target: &DeleteTarget) -> Result<(), MutationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().expect("seen").push(target.clone());
        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }
        self.result.clone()
    }
}

struct NeverApi;

#[async_trait]
impl DeleteApi for NeverApi {
    async fn delete(&self, _target: &DeleteTarget) -> Result<(), MutationError> {
        std::future::pending().await
    }
}

struct Harness {
    controller: Arc<ConfirmDeleteController>,
    notifier: Arc<RecordingNotifier>,
    navigator: Arc<RecordingNavigator>,
}

fn harness(api: Arc<dyn DeleteApi>, target: Option<DeleteTarget>) -> Harness {
    let notifier = Arc::new(RecordingNotifier::default());
    let navigator = Arc::new(RecordingNavigator::default());
    let mut controller =
        ConfirmDeleteController::new(api, navigator.clone(), notifier.clone(), "/dashboard");
    if let Some(target) = target {
        controller = controller.with_target(target);
    }
    Harness {
        controller: Arc::new(controller),
        notifier,
        navigator,
    }
}

fn chart() -> DeleteTarget {
    DeleteTarget::diet_chart("abc123").expect("target")
}

#[test]
fn trigger_only_opens_the_dialog() {
    let target = chart();
    let t = ConfirmPhase::Idle.transition(ConfirmInput::Trigger, Some(&target), "/dashboard");
    assert_eq!(t.next, ConfirmPhase::Confirming);
    assert!(t.effects.is_empty());
}

#[test]
fn trigger_without_target_stays_idle() {
    let t = ConfirmPhase::Idle.transition(ConfirmInput::Trigger, None, "/dashboard");
    assert_eq!(t.next, ConfirmPhase::Idle);
    assert!(!t.next.is_dialog_open());
}

#[test]
fn confirm_from_idle_is_a_no_op() {
    let target = chart();
    let t = ConfirmPhase::Idle.transition(ConfirmInput::Confirm, Some(&target), "/dashboard");
    assert_eq!(t.next, ConfirmPhase::Idle);
    assert!(t.effects.is_empty());
}

#[test]
fn submitting_ignores_everything_but_completion() {
    let target = chart();
    for input in [
        ConfirmInput::Trigger,
        ConfirmInput::Confirm,
        ConfirmInput::Cancel,
    ] {
        let t = ConfirmPhase::Submitting.transition(input, Some(&target), "/dashboard");
        assert_eq!(t.next, ConfirmPhase::Submitting);
        assert!(t.effects.is_empty());
    }
}

#[test]
fn completion_effects_carry_text_and_destination() {
    let target = chart();
    let ok = ConfirmPhase::Submitting.transition(
        ConfirmInput::Completed(Ok(())),
        Some(&target),
        "/dashboard",
    );
    assert_eq!(ok.next, ConfirmPhase::Succeeded);
    assert_eq!(
        ok.effects,
        vec![
            ConfirmEffect::NotifySuccess("Diet Chart successfully deleted!".to_string()),
            ConfirmEffect::Navigate("/dashboard".to_string()),
        ]
    );

    let failed = ConfirmPhase::Submitting.transition(
        ConfirmInput::Completed(Err("DB error".to_string())),
        Some(&target),
        "/dashboard",
    );
    assert_eq!(failed.next, ConfirmPhase::Confirming);
    assert_eq!(
        failed.effects,
        vec![ConfirmEffect::NotifyError("DB error".to_string())]
    );
}

#[tokio::test]
async fn successful_delete_notifies_and_navigates_once() {
    let api = Arc::new(ScriptedApi::ok());
    let h = harness(api.clone(), Some(chart()));
    let mut phases = h.controller.subscribe();

    assert!(h.controller.trigger());
    assert_eq!(h.controller.snapshot().phase, ConfirmPhase::Confirming);
    let _ = phases.borrow_and_update();

    let outcome = h.controller.confirm().await;

    assert!(matches!(outcome, ConfirmOutcome::Succeeded));
    assert_eq!(api.calls(), 1);
    assert_eq!(api.seen.lock().expect("seen")[0].id(), "abc123");
    assert_eq!(
        h.notifier.toasts(),
        vec![Toast::Success("Diet Chart successfully deleted!".to_string())]
    );
    assert_eq!(h.navigator.visits(), vec!["/dashboard".to_string()]);

    let state = h.controller.snapshot();
    assert_eq!(state.phase, ConfirmPhase::Succeeded);
    assert!(!state.is_dialog_open());
    assert!(phases.has_changed().expect("sender alive"));
}

#[tokio::test]
async fn failed_delete_keeps_dialog_open_without_navigation() {
    let api = Arc::new(ScriptedApi::returning(Err(MutationError::Rejected {
        status: 500,
        message: Some("DB error".to_string()),
    })));
    let h = harness(api.clone(), Some(chart()));

    h.controller.trigger();
    let outcome = h.controller.confirm().await;

    assert!(matches!(
        outcome,
        ConfirmOutcome::Failed(MutationError::Rejected { status: 500, .. })
    ));
    assert_eq!(h.notifier.toasts(), vec![Toast::Error("DB error".to_string())]);
    assert!(h.navigator.visits().is_empty());

    let state = h.controller.snapshot();
    assert_eq!(state.phase, ConfirmPhase::Confirming);
    assert!(state.is_dialog_open());
    assert_eq!(state.last_error.as_deref(), Some("DB error"));
}

#[tokio::test]
async fn retry_after_failure_issues_a_fresh_request() {
    let api = Arc::new(ScriptedApi::returning(Err(MutationError::Transport(
        "connection refused".to_string(),
    ))));
    let h = harness(api.clone(), Some(chart()));

    h.controller.trigger();
    h.controller.confirm().await;
    h.controller.confirm().await;

    assert_eq!(api.calls(), 2);
    assert_eq!(h.notifier.toasts().len(), 2);
    assert_eq!(h.controller.snapshot().phase, ConfirmPhase::Confirming);
}

#[tokio::test]
async fn cancel_closes_dialog_without_request() {
    let api = Arc::new(ScriptedApi::ok());
    let h = harness(api.clone(), Some(chart()));

    h.controller.trigger();
    assert!(h.controller.cancel());

    assert_eq!(api.calls(), 0);
    assert!(h.notifier.toasts().is_empty());
    assert!(!h.controller.snapshot().is_dialog_open());
    assert!(matches!(
        h.controller.confirm().await,
        ConfirmOutcome::Ignored
    ));
    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn second_confirm_while_submitting_is_ignored() {
    let api = Arc::new(ScriptedApi::gated());
    let h = harness(api.clone(), Some(chart()));
    h.controller.trigger();

    let first = tokio::spawn({
        let controller = h.controller.clone();
        async move { controller.confirm().await }
    });
    let gate = api.gate.as_ref().expect("gate");
    gate.started.notified().await;

    assert_eq!(h.controller.snapshot().phase, ConfirmPhase::Submitting);
    assert!(matches!(
        h.controller.confirm().await,
        ConfirmOutcome::Ignored
    ));
    assert!(!h.controller.cancel());
    assert!(h.controller.snapshot().is_dialog_open());

    gate.release.notify_one();
    let outcome = first.await.expect("join");

    assert!(matches!(outcome, ConfirmOutcome::Succeeded));
    assert_eq!(api.calls(), 1);
    assert_eq!(h.navigator.visits().len(), 1);
}

#[tokio::test]
async fn hung_request_times_out_into_failure() {
    let h = harness(Arc::new(NeverApi), Some(chart()));
    let controller = Arc::try_unwrap(h.controller)
        .ok()
        .expect("sole owner")
        .with_request_timeout(Duration::from_millis(50));

    controller.trigger();
    let outcome = controller.confirm().await;

    assert!(matches!(
        outcome,
        ConfirmOutcome::Failed(MutationError::Timeout(_))
    ));
    let toasts = h.notifier.toasts();
    assert_eq!(toasts.len(), 1);
    assert!(matches!(&toasts[0], Toast::Error(text) if text.contains("did not respond")));
    assert_eq!(controller.snapshot().phase, ConfirmPhase::Confirming);
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn target_is_required_and_locked_while_open() {
    let api = Arc::new(ScriptedApi::ok());
    let h = harness(api.clone(), None);

    assert!(!h.controller.trigger());
    assert!(!h.controller.snapshot().is_dialog_open());

    let patient = DeleteTarget::patient("p-7", "Jane Doe").expect("target");
    assert_eq!(h.controller.trigger_for(patient.clone()), Ok(true));
    assert_eq!(h.controller.set_target(Some(chart())), Err(TargetLocked));
    assert_eq!(h.controller.set_target(Some(patient.clone())), Ok(()));

    h.controller.confirm().await;
    assert_eq!(
        h.notifier.toasts(),
        vec![Toast::Success("Patient successfully deleted!".to_string())]
    );
    assert_eq!(api.seen.lock().expect("seen")[0], patient);

    assert_eq!(h.controller.set_target(Some(chart())), Ok(()));
    assert_eq!(h.controller.snapshot().phase, ConfirmPhase::Idle);
}

#[tokio::test]
async fn aborted_submission_reopens_dialog_for_retry() {
    let api = Arc::new(ScriptedApi::gated());
    let h = harness(api.clone(), Some(chart()));
    h.controller.trigger();

    let submit = tokio::spawn({
        let controller = h.controller.clone();
        async move { controller.confirm().await }
    });
    let gate = api.gate.as_ref().expect("gate");
    gate.started.notified().await;
    assert_eq!(h.controller.snapshot().phase, ConfirmPhase::Submitting);

    submit.abort();
    let joined = submit.await;
    assert!(joined.expect_err("aborted").is_cancelled());

    let state = h.controller.snapshot();
    assert_eq!(state.phase, ConfirmPhase::Confirming);
    assert!(state.is_dialog_open());
    assert!(state
        .last_error
        .as_deref()
        .is_some_and(|text| text.contains("interrupted")));
    assert!(h.notifier.toasts().is_empty());
    assert!(h.navigator.visits().is_empty());

    assert!(h.controller.cancel());
    assert!(h.controller.trigger());
    gate.release.notify_one();
    assert!(matches!(
        h.controller.confirm().await,
        ConfirmOutcome::Succeeded
    ));
    assert_eq!(api.calls(), 2);
}
