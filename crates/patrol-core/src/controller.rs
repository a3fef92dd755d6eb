// ── Controller abstraction ──
//
// Owns the shared panel state (status snapshot, result set, in-flight
// flags) and the two self-rescheduling poll loops. Consumers observe state
// through watch channels and trigger control actions through async methods.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use futures::future::BoxFuture;
use strum::Display;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use patrol_api::transport::{TlsMode, TransportConfig};
use patrol_api::{Ack, PatrolClient};

use crate::backend::PatrolBackend;
use crate::busy::BusyFlag;
use crate::config::{ControllerConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{ResultSet, StatusSnapshot};
use crate::notify::{NotificationKind, Notifier};
use crate::parse::parse_float_prefix;
use crate::request::RequestClient;
use crate::scheduler::PollTimer;
use crate::view::StatusView;

/// Smallest detection interval the service accepts, in seconds.
pub const MIN_DETECTION_INTERVAL: f64 = 0.1;

const INVALID_INTERVAL: &str = "Please enter a valid detection interval";
const INTERVAL_TOO_SMALL: &str = "Minimum detection interval is 0.1 seconds";
const INTERVAL_REJECTED: &str = "Configuration failed, please try again";

/// Callback run once a forced status refresh has finished.
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

/// How a control action ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The service accepted the request.
    Completed { message: Option<String> },
    /// The same action was already in flight; nothing was sent.
    Busy,
}

/// The guarded user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ControlAction {
    SetInterval,
    Start,
    End,
}

/// Parse and check a detection interval typed by the user.
pub fn validate_interval(raw: &str) -> Result<f64, CoreError> {
    match parse_float_prefix(raw) {
        Some(step) if step > 0.0 && step < MIN_DETECTION_INTERVAL => Err(CoreError::Validation {
            message: INTERVAL_TOO_SMALL.into(),
        }),
        Some(step) if step > 0.0 => Ok(step),
        _ => Err(CoreError::Validation {
            message: INVALID_INTERVAL.into(),
        }),
    }
}

// ── Controller ───────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<ControllerInner>`. Nothing is fetched until
/// [`start()`](Self::start) kicks off the poll loops, or a one-shot
/// `refresh_*` / action method is called.
#[derive(Clone)]
pub struct Controller {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    config: ControllerConfig,
    client: RequestClient,
    status: watch::Sender<Option<StatusSnapshot>>,
    results: watch::Sender<Arc<ResultSet>>,
    patrol_active: AtomicBool,
    interval_busy: BusyFlag,
    start_busy: BusyFlag,
    end_busy: BusyFlag,
    status_timer: PollTimer,
    results_timer: PollTimer,
    started: AtomicBool,
    cancel: CancellationToken,
}

impl Controller {
    /// Build a controller talking HTTP to `config.url`.
    pub fn new(config: ControllerConfig, notifier: Arc<dyn Notifier>) -> Result<Self, CoreError> {
        let client = PatrolClient::new(config.url.clone(), &build_transport(&config))?;
        Ok(Self::with_backend(config, Arc::new(client), notifier))
    }

    /// Build a controller over any backend.
    pub fn with_backend(
        config: ControllerConfig,
        backend: Arc<dyn PatrolBackend>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (status, _) = watch::channel(None);
        let (results, _) = watch::channel(Arc::new(ResultSet::default()));

        Self {
            inner: Arc::new(ControllerInner {
                config,
                client: RequestClient::new(backend, notifier),
                status,
                results,
                patrol_active: AtomicBool::new(false),
                interval_busy: BusyFlag::default(),
                start_busy: BusyFlag::default(),
                end_busy: BusyFlag::default(),
                status_timer: PollTimer::new(),
                results_timer: PollTimer::new(),
                started: AtomicBool::new(false),
                cancel: CancellationToken::new(),
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Start both poll loops. Calling it again is a no-op.
    pub fn start(&self) {
        if self.inner.started.swap(true, Ordering::AcqRel) {
            return;
        }
        info!(url = %self.inner.config.url, "starting status and results polling");
        tokio::spawn(self.poll_status(None));
        tokio::spawn(self.poll_results());
    }

    /// Stop rescheduling and drop pending timers. In-flight requests finish normally.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.inner.status_timer.cancel();
        self.inner.results_timer.cancel();
        debug!("polling stopped");
    }

    /// Resolves once [`shutdown()`](Self::shutdown) has been called.
    pub async fn stopped(&self) {
        self.inner.cancel.cancelled().await;
    }

    fn polling(&self) -> bool {
        self.inner.started.load(Ordering::Acquire) && !self.inner.cancel.is_cancelled()
    }

    pub fn status_poll_pending(&self) -> bool {
        self.inner.status_timer.is_pending()
    }

    pub fn results_poll_pending(&self) -> bool {
        self.inner.results_timer.is_pending()
    }

    // ── State access ─────────────────────────────────────────────

    /// Subscribe to status snapshots (`None` until the first successful poll).
    pub fn status(&self) -> watch::Receiver<Option<StatusSnapshot>> {
        self.inner.status.subscribe()
    }

    pub fn status_snapshot(&self) -> Option<StatusSnapshot> {
        self.inner.status.borrow().clone()
    }

    pub fn status_view(&self) -> StatusView {
        StatusView::from_snapshot(self.inner.status.borrow().as_ref())
    }

    /// Subscribe to result sets, newest first.
    pub fn results(&self) -> watch::Receiver<Arc<ResultSet>> {
        self.inner.results.subscribe()
    }

    pub fn results_snapshot(&self) -> Arc<ResultSet> {
        Arc::clone(&self.inner.results.borrow())
    }

    /// Local patrol flag: set by start/end, resynced by every status poll.
    pub fn is_active(&self) -> bool {
        self.inner.patrol_active.load(Ordering::Acquire)
    }

    pub fn is_busy(&self, action: ControlAction) -> bool {
        self.busy_flag(action).is_busy()
    }

    fn busy_flag(&self, action: ControlAction) -> &BusyFlag {
        match action {
            ControlAction::SetInterval => &self.inner.interval_busy,
            ControlAction::Start => &self.inner.start_busy,
            ControlAction::End => &self.inner.end_busy,
        }
    }

    // ── One-shot fetches ─────────────────────────────────────────

    /// Fetch status once and publish it. Never reschedules.
    ///
    /// A reply without a usable `det_step` keeps the last known interval.
    pub async fn refresh_status(&self) -> Result<StatusSnapshot, CoreError> {
        let mut snapshot = StatusSnapshot::from(self.inner.client.get_status().await?);
        if snapshot.detection_interval.is_none() {
            snapshot.detection_interval = self
                .inner
                .status
                .borrow()
                .as_ref()
                .and_then(|previous| previous.detection_interval);
        }
        self.inner
            .patrol_active
            .store(snapshot.is_active(), Ordering::Release);
        self.inner.status.send_replace(Some(snapshot.clone()));
        Ok(snapshot)
    }

    /// Fetch results once, reverse to newest-first, and publish. Never reschedules.
    pub async fn refresh_results(&self) -> Result<Arc<ResultSet>, CoreError> {
        let results = Arc::new(ResultSet::from(self.inner.client.get_results().await?));
        self.inner.results.send_replace(Arc::clone(&results));
        Ok(results)
    }

    // ── Poll loops ───────────────────────────────────────────────

    /// One status poll tick.
    ///
    /// Drops any pending status timer, fetches, then (while polling is
    /// running) schedules the next tick after `status_interval`, and
    /// finally runs `on_complete`. A failed fetch only logs.
    pub fn poll_status(&self, on_complete: Option<Completion>) -> BoxFuture<'static, ()> {
        let ctrl = self.clone();
        async move {
            ctrl.inner.status_timer.cancel();

            if let Err(e) = ctrl.refresh_status().await {
                warn!(error = %e, "status poll failed");
            }

            if ctrl.polling() {
                let next = ctrl.poll_status(None);
                ctrl.inner
                    .status_timer
                    .schedule(ctrl.inner.config.status_interval, next);
            }

            if let Some(done) = on_complete {
                done();
            }
        }
        .boxed()
    }

    /// One results poll tick. Same cancel-then-reschedule discipline as
    /// [`poll_status`](Self::poll_status); a failure keeps the stale set.
    pub fn poll_results(&self) -> BoxFuture<'static, ()> {
        let ctrl = self.clone();
        async move {
            ctrl.inner.results_timer.cancel();

            match ctrl.refresh_results().await {
                Ok(results) => debug!(count = results.len(), "results refreshed"),
                Err(e) => warn!(error = %e, "results poll failed"),
            }

            if ctrl.polling() {
                let next = ctrl.poll_results();
                ctrl.inner
                    .results_timer
                    .schedule(ctrl.inner.config.results_interval, next);
            }
        }
        .boxed()
    }

    fn spawn_status_refresh(&self, on_complete: Option<Completion>) {
        tokio::spawn(self.poll_status(on_complete));
    }

    // ── Control actions ──────────────────────────────────────────

    /// Validate `raw` and send it as the new detection interval.
    ///
    /// On success the user is notified and a status refresh is started;
    /// `on_refreshed` runs when that refresh finishes (the TUI clears its
    /// input there). Validation failures never reach the network.
    pub async fn set_detection_interval(
        &self,
        raw: &str,
        on_refreshed: Option<Completion>,
    ) -> Result<ActionOutcome, CoreError> {
        let Some(_guard) = self.inner.interval_busy.try_acquire() else {
            debug!("detection interval update already in flight");
            return Ok(ActionOutcome::Busy);
        };

        let step = validate_interval(raw).inspect_err(|e| {
            self.notify(&e.to_string(), NotificationKind::Error);
        })?;

        let resp = self
            .inner
            .client
            .set_det_step(step)
            .await
            .inspect_err(|e| warn!(error = %e, step, "setting detection interval failed"))?;

        if resp.is_success() {
            let message = format!("Detection interval set to {step} seconds");
            info!(step, "detection interval updated");
            self.notify(&message, NotificationKind::Success);
            self.spawn_status_refresh(on_refreshed);
            Ok(ActionOutcome::Completed {
                message: Some(message),
            })
        } else {
            let message = resp
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| INTERVAL_REJECTED.into());
            self.notify(&message, NotificationKind::Error);
            Err(CoreError::Rejected { message })
        }
    }

    /// Ask the service to begin patrolling.
    pub async fn start_inspection(&self) -> Result<ActionOutcome, CoreError> {
        let call = self.inner.client.start_patrol();
        self.toggle_patrol(ControlAction::Start, true, call).await
    }

    /// Ask the service to stop patrolling.
    pub async fn end_inspection(&self) -> Result<ActionOutcome, CoreError> {
        let call = self.inner.client.end_patrol();
        self.toggle_patrol(ControlAction::End, false, call).await
    }

    /// Shared body of start/end: guard, call, flip the local flag, refresh.
    async fn toggle_patrol(
        &self,
        action: ControlAction,
        active: bool,
        call: impl Future<Output = Result<Ack, CoreError>>,
    ) -> Result<ActionOutcome, CoreError> {
        let Some(_guard) = self.busy_flag(action).try_acquire() else {
            debug!(%action, "action already in flight");
            return Ok(ActionOutcome::Busy);
        };

        let ack = call
            .await
            .inspect_err(|e| warn!(error = %e, %action, "patrol control failed"))?;

        self.inner.patrol_active.store(active, Ordering::Release);
        info!(%action, active, "patrol control accepted");
        self.spawn_status_refresh(None);

        Ok(ActionOutcome::Completed {
            message: ack.message,
        })
    }

    fn notify(&self, message: &str, kind: NotificationKind) {
        self.inner.client.notifier().notify(message, kind);
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("url", &self.inner.config.url.as_str())
            .field("polling", &self.polling())
            .finish_non_exhaustive()
    }
}

// ── Helpers ──────────────────────────────────────────────────────

/// Build a [`TransportConfig`] from the controller configuration.
fn build_transport(config: &ControllerConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use patrol_api::{ResultEntry, StatusResponse, StepResponse};
    use pretty_assertions::assert_eq;
    use tokio::sync::{Notify, oneshot};
    use url::Url;

    use super::*;
    use crate::model::PatrolStatus;

    // ── Fakes ────────────────────────────────────────────────────

    #[derive(Default)]
    struct FakeBackend {
        active: AtomicBool,
        fail_status: AtomicBool,
        fail_results: AtomicBool,
        fail_control: AtomicBool,
        omit_det_step: AtomicBool,
        /// How long each status request takes.
        status_delay: Option<Duration>,
        step_reply: Mutex<Option<StepResponse>>,
        results: Mutex<Vec<ResultEntry>>,
        /// When set, set_det_step and start_patrol wait for a permit.
        gate: Option<Arc<Notify>>,
        status_calls: AtomicUsize,
        step_calls: AtomicUsize,
        start_calls: AtomicUsize,
        end_calls: AtomicUsize,
        results_calls: AtomicUsize,
    }

    fn server_error() -> patrol_api::Error {
        patrol_api::Error::Server {
            status: 500,
            message: "Request failed: 500 Internal Server Error".into(),
        }
    }

    impl FakeBackend {
        async fn wait_gate(&self) {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
        }
    }

    impl PatrolBackend for FakeBackend {
        fn get_status(&self) -> BoxFuture<'_, Result<StatusResponse, patrol_api::Error>> {
            async move {
                self.status_calls.fetch_add(1, Ordering::SeqCst);
                if let Some(delay) = self.status_delay {
                    tokio::time::sleep(delay).await;
                }
                if self.fail_status.load(Ordering::SeqCst) {
                    return Err(server_error());
                }
                let active = self.active.load(Ordering::SeqCst);
                Ok(StatusResponse {
                    patrol_status: if active { "Active" } else { "Inactive" }.into(),
                    det_step: (!self.omit_det_step.load(Ordering::SeqCst)).then_some(4.0),
                })
            }
            .boxed()
        }

        fn set_det_step(&self, _step: f64) -> BoxFuture<'_, Result<StepResponse, patrol_api::Error>> {
            async move {
                self.step_calls.fetch_add(1, Ordering::SeqCst);
                self.wait_gate().await;
                Ok(self.step_reply.lock().unwrap().clone().unwrap_or(StepResponse {
                    status: "success".into(),
                    message: None,
                }))
            }
            .boxed()
        }

        fn start_patrol(&self) -> BoxFuture<'_, Result<Ack, patrol_api::Error>> {
            async move {
                self.start_calls.fetch_add(1, Ordering::SeqCst);
                self.wait_gate().await;
                if self.fail_control.load(Ordering::SeqCst) {
                    return Err(server_error());
                }
                self.active.store(true, Ordering::SeqCst);
                Ok(Ack {
                    message: Some("Patrol started".into()),
                })
            }
            .boxed()
        }

        fn end_patrol(&self) -> BoxFuture<'_, Result<Ack, patrol_api::Error>> {
            async move {
                self.end_calls.fetch_add(1, Ordering::SeqCst);
                self.active.store(false, Ordering::SeqCst);
                Ok(Ack::default())
            }
            .boxed()
        }

        fn get_results(&self) -> BoxFuture<'_, Result<Vec<ResultEntry>, patrol_api::Error>> {
            async move {
                self.results_calls.fetch_add(1, Ordering::SeqCst);
                if self.fail_results.load(Ordering::SeqCst) {
                    return Err(server_error());
                }
                Ok(self.results.lock().unwrap().clone())
            }
            .boxed()
        }
    }

    type Notes = Arc<Mutex<Vec<(String, NotificationKind)>>>;

    fn controller(backend: &Arc<FakeBackend>) -> (Controller, Notes) {
        let notes: Notes = Arc::default();
        let sink = Arc::clone(&notes);
        let notifier: Arc<dyn Notifier> = Arc::new(move |msg: &str, kind: NotificationKind| {
            sink.lock().unwrap().push((msg.to_owned(), kind));
        });
        let config = ControllerConfig::new(Url::parse("http://127.0.0.1:3333").unwrap());
        let ctrl = Controller::with_backend(config, Arc::clone(backend) as Arc<dyn PatrolBackend>, notifier);
        (ctrl, notes)
    }

    fn entry(name: &str) -> ResultEntry {
        ResultEntry {
            path: format!("/result_files/{name}.jpg"),
            time: name.into(),
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // ── Polling ──────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn start_polls_and_leaves_one_pending_timer_each() {
        let backend = Arc::new(FakeBackend::default());
        backend.active.store(true, Ordering::SeqCst);
        let (ctrl, _) = controller(&backend);

        ctrl.start();
        settle().await;

        assert_eq!(backend.status_calls.load(Ordering::SeqCst), 1);
        assert_eq!(backend.results_calls.load(Ordering::SeqCst), 1);
        assert!(ctrl.status_poll_pending());
        assert!(ctrl.results_poll_pending());

        let snapshot = ctrl.status_snapshot().unwrap();
        assert_eq!(snapshot.status, PatrolStatus::Active);
        assert_eq!(snapshot.detection_interval, Some(4.0));
        assert!(ctrl.is_active());
        assert_eq!(ctrl.status_view().label, "ACTIVE");
    }

    #[tokio::test(start_paused = true)]
    async fn loops_run_at_fixed_cadence_until_shutdown() {
        let backend = Arc::new(FakeBackend::default());
        let (ctrl, _) = controller(&backend);

        ctrl.start();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(backend.status_calls.load(Ordering::SeqCst), 3);
        assert_eq!(backend.results_calls.load(Ordering::SeqCst), 3);

        ctrl.shutdown();
        assert!(!ctrl.status_poll_pending());
        assert!(!ctrl.results_poll_pending());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(backend.status_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_status_responses_stretch_the_period() {
        let backend = Arc::new(FakeBackend {
            status_delay: Some(Duration::from_millis(1500)),
            ..FakeBackend::default()
        });
        let (ctrl, _) = controller(&backend);

        // Ticks start at 0, 2.5 and 5.0 s: the next timer is armed only
        // once the previous response is in.
        ctrl.start();
        tokio::time::sleep(Duration::from_millis(5100)).await;
        assert_eq!(backend.status_calls.load(Ordering::SeqCst), 3);
        assert_eq!(backend.results_calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn forced_refresh_during_a_tick_keeps_one_timer_chain() {
        let backend = Arc::new(FakeBackend {
            status_delay: Some(Duration::from_millis(1500)),
            ..FakeBackend::default()
        });
        let (ctrl, _) = controller(&backend);

        ctrl.start();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(backend.status_calls.load(Ordering::SeqCst), 1);

        // The tick from 0 s is still waiting on its response.
        ctrl.start_inspection().await.unwrap();
        settle().await;
        assert_eq!(backend.status_calls.load(Ordering::SeqCst), 2);

        // Both finish (1.5 s and 2.0 s); the later one's timer replaces the
        // earlier, so ticks follow at 3.0, 5.5 and 8.0 s only.
        tokio::time::sleep(Duration::from_millis(9890)).await;
        assert_eq!(backend.status_calls.load(Ordering::SeqCst), 5);
        assert!(ctrl.status_poll_pending());

        ctrl.shutdown();
        assert!(!ctrl.status_poll_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_det_step_keeps_the_last_interval() {
        let backend = Arc::new(FakeBackend::default());
        let (ctrl, _) = controller(&backend);

        ctrl.refresh_status().await.unwrap();
        assert_eq!(ctrl.status_view().interval_placeholder.as_deref(), Some("4"));

        backend.omit_det_step.store(true, Ordering::SeqCst);
        let snapshot = ctrl.refresh_status().await.unwrap();
        assert_eq!(snapshot.detection_interval, Some(4.0));
        assert_eq!(ctrl.status_view().interval_placeholder.as_deref(), Some("4"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_status_poll_notifies_once_and_still_reschedules() {
        let backend = Arc::new(FakeBackend::default());
        backend.fail_status.store(true, Ordering::SeqCst);
        let (ctrl, notes) = controller(&backend);

        ctrl.start();
        settle().await;

        assert!(ctrl.status_snapshot().is_none());
        assert!(ctrl.status_poll_pending());
        let status_errors = notes
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, kind)| *kind == NotificationKind::Error)
            .count();
        assert_eq!(status_errors, 1);

        backend.fail_status.store(false, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(ctrl.status_snapshot().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn results_are_newest_first_and_survive_failures() {
        let backend = Arc::new(FakeBackend::default());
        *backend.results.lock().unwrap() = vec![entry("a"), entry("b"), entry("c")];
        let (ctrl, notes) = controller(&backend);

        ctrl.start();
        settle().await;

        let times: Vec<_> = ctrl
            .results_snapshot()
            .iter()
            .map(|r| r.time.clone())
            .collect();
        assert_eq!(times, vec!["c", "b", "a"]);

        backend.fail_results.store(true, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(ctrl.results_snapshot().len(), 3);
        assert_eq!(notes.lock().unwrap().len(), 1);
        assert!(ctrl.results_poll_pending());
    }

    // ── Detection interval ───────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn invalid_intervals_never_reach_the_network() {
        let backend = Arc::new(FakeBackend::default());
        let (ctrl, notes) = controller(&backend);

        for (raw, expected) in [
            ("0", INVALID_INTERVAL),
            ("-1", INVALID_INTERVAL),
            ("abc", INVALID_INTERVAL),
            ("0.05", INTERVAL_TOO_SMALL),
        ] {
            let err = ctrl.set_detection_interval(raw, None).await.unwrap_err();
            assert!(matches!(err, CoreError::Validation { .. }), "{raw}");
            assert_eq!(err.to_string(), expected, "{raw}");
        }

        assert_eq!(backend.step_calls.load(Ordering::SeqCst), 0);
        assert_eq!(notes.lock().unwrap().len(), 4);
        assert!(!ctrl.is_busy(ControlAction::SetInterval));
    }

    #[tokio::test(start_paused = true)]
    async fn valid_intervals_are_sent() {
        let backend = Arc::new(FakeBackend::default());
        let (ctrl, notes) = controller(&backend);

        for raw in ["0.1", "5.5"] {
            let outcome = ctrl.set_detection_interval(raw, None).await.unwrap();
            assert!(matches!(outcome, ActionOutcome::Completed { .. }), "{raw}");
        }

        assert_eq!(backend.step_calls.load(Ordering::SeqCst), 2);
        let last = notes.lock().unwrap().last().cloned().unwrap();
        assert_eq!(
            last,
            (
                "Detection interval set to 5.5 seconds".to_owned(),
                NotificationKind::Success
            )
        );
    }

    #[tokio::test(start_paused = true)]
    async fn interval_success_refreshes_status_then_runs_completion() {
        let backend = Arc::new(FakeBackend::default());
        let (ctrl, _) = controller(&backend);
        let (tx, rx) = oneshot::channel();

        ctrl.set_detection_interval(
            "2",
            Some(Box::new(move || {
                let _ = tx.send(());
            })),
        )
        .await
        .unwrap();

        rx.await.unwrap();
        assert_eq!(backend.status_calls.load(Ordering::SeqCst), 1);
        assert!(ctrl.status_snapshot().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_interval_uses_server_message_or_generic() {
        let backend = Arc::new(FakeBackend::default());
        *backend.step_reply.lock().unwrap() = Some(StepResponse {
            status: "failure".into(),
            message: None,
        });
        let (ctrl, notes) = controller(&backend);

        let err = ctrl.set_detection_interval("1", None).await.unwrap_err();
        assert!(matches!(err, CoreError::Rejected { .. }));
        assert_eq!(
            notes.lock().unwrap().last().cloned().unwrap(),
            (INTERVAL_REJECTED.to_owned(), NotificationKind::Error)
        );

        *backend.step_reply.lock().unwrap() = Some(StepResponse {
            status: "failure".into(),
            message: Some("Detector busy".into()),
        });
        ctrl.set_detection_interval("1", None).await.unwrap_err();
        assert_eq!(notes.lock().unwrap().last().unwrap().0, "Detector busy");
        assert!(!ctrl.is_busy(ControlAction::SetInterval));
    }

    #[tokio::test(start_paused = true)]
    async fn second_interval_submit_while_pending_is_dropped() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(FakeBackend {
            gate: Some(Arc::clone(&gate)),
            ..FakeBackend::default()
        });
        let (ctrl, _) = controller(&backend);

        let first = tokio::spawn({
            let ctrl = ctrl.clone();
            async move { ctrl.set_detection_interval("2", None).await }
        });
        while backend.step_calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(ctrl.is_busy(ControlAction::SetInterval));

        let second = ctrl.set_detection_interval("3", None).await.unwrap();
        assert_eq!(second, ActionOutcome::Busy);
        assert_eq!(backend.step_calls.load(Ordering::SeqCst), 1);

        gate.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert!(matches!(outcome, ActionOutcome::Completed { .. }));
        assert!(!ctrl.is_busy(ControlAction::SetInterval));
    }

    // ── Start / end ──────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn start_then_end_flip_flag_and_refresh() {
        let backend = Arc::new(FakeBackend::default());
        let (ctrl, _) = controller(&backend);

        let outcome = ctrl.start_inspection().await.unwrap();
        assert_eq!(
            outcome,
            ActionOutcome::Completed {
                message: Some("Patrol started".into())
            }
        );
        assert!(ctrl.is_active());
        settle().await;
        assert_eq!(backend.status_calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctrl.status_view().label, "ACTIVE");

        ctrl.end_inspection().await.unwrap();
        assert!(!ctrl.is_active());
        settle().await;
        assert_eq!(backend.status_calls.load(Ordering::SeqCst), 2);
        assert_eq!(ctrl.status_view().label, "IDLE");
    }

    #[tokio::test(start_paused = true)]
    async fn failed_start_keeps_state_and_releases_guard() {
        let backend = Arc::new(FakeBackend::default());
        backend.fail_control.store(true, Ordering::SeqCst);
        let (ctrl, notes) = controller(&backend);

        let err = ctrl.start_inspection().await.unwrap_err();
        assert!(matches!(err, CoreError::Server { status: 500, .. }));
        assert!(!ctrl.is_active());
        assert!(!ctrl.is_busy(ControlAction::Start));
        assert_eq!(notes.lock().unwrap().len(), 1);

        settle().await;
        assert_eq!(backend.status_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_sends_one_request() {
        let gate = Arc::new(Notify::new());
        let backend = Arc::new(FakeBackend {
            gate: Some(Arc::clone(&gate)),
            ..FakeBackend::default()
        });
        let (ctrl, _) = controller(&backend);

        let first = tokio::spawn({
            let ctrl = ctrl.clone();
            async move { ctrl.start_inspection().await }
        });
        while backend.start_calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }

        assert_eq!(ctrl.start_inspection().await.unwrap(), ActionOutcome::Busy);
        gate.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(backend.start_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn interval_validation_table() {
        assert_eq!(validate_interval("0.1").unwrap(), 0.1);
        assert_eq!(validate_interval("5.5").unwrap(), 5.5);
        assert!(validate_interval("0").is_err());
        assert!(validate_interval("-1").is_err());
        assert!(validate_interval("0.05").is_err());
        assert!(validate_interval("abc").is_err());
        assert!(validate_interval("").is_err());
    }
}
