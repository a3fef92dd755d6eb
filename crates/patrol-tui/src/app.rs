//! Application core — event loop, overlays, action dispatch.

use std::sync::Arc;
use std::time::Instant;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use patrol_core::{
    ActionOutcome, Completion, ControlAction, Controller, ControllerConfig, NotificationKind,
};

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge::{ChannelNotifier, spawn_data_bridge};
use crate::event::{TerminalEvent, TerminalInput};
use crate::screens::dashboard::DashboardScreen;
use crate::theme;
use crate::tui::TerminalSession;
use crate::widgets::toast::Toast;
use crate::widgets::viewer::Viewer;

/// What woke the event loop.
enum Wake {
    Terminal(Option<std::io::Result<TerminalEvent>>),
    Action(Action),
    ToastExpired,
}

/// Top-level application state and event loop.
pub struct App {
    controller: Controller,
    dashboard: DashboardScreen,
    viewer: Viewer,
    toast: Toast,
    /// Whether the app should keep running.
    running: bool,
    /// Help overlay visibility.
    help_visible: bool,
    /// Action sender — the controller's notifier and spawned tasks use it too.
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Stops the data bridge.
    cancel: CancellationToken,
}

impl App {
    /// Build the controller, wiring its notifications into the action loop.
    pub fn new(config: ControllerConfig, page_size: usize) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let notifier = Arc::new(ChannelNotifier::new(action_tx.clone()));
        let controller = Controller::new(config, notifier)?;
        Ok(Self::with_controller(
            controller, page_size, action_tx, action_rx,
        ))
    }

    /// `controller` is expected to notify through a [`ChannelNotifier`] on `action_tx`.
    fn with_controller(
        controller: Controller,
        page_size: usize,
        action_tx: mpsc::UnboundedSender<Action>,
        action_rx: mpsc::UnboundedReceiver<Action>,
    ) -> Self {
        Self {
            controller,
            dashboard: DashboardScreen::new(page_size),
            viewer: Viewer::default(),
            toast: Toast::default(),
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            cancel: CancellationToken::new(),
        }
    }

    /// Run until the user quits, then stop polling.
    pub async fn run(&mut self) -> Result<()> {
        let mut session = TerminalSession::start()?;
        let mut input = TerminalInput::new();

        let bridge = tokio::spawn(spawn_data_bridge(
            self.controller.clone(),
            self.action_tx.clone(),
            self.cancel.clone(),
        ));
        info!(server = %self.controller.config().url, "TUI event loop started");

        let outcome = self.event_loop(&mut session, &mut input).await;

        self.cancel.cancel();
        if let Err(e) = bridge.await {
            debug!(error = %e, "data bridge task failed");
        }
        info!("TUI event loop ended");
        outcome
    }

    /// Redraw, then sleep until a key, a controller update or the toast
    /// deadline, whichever comes first.
    async fn event_loop(
        &mut self,
        session: &mut TerminalSession,
        input: &mut TerminalInput,
    ) -> Result<()> {
        while self.running {
            session.draw(|frame| self.render(frame))?;

            let wake = tokio::select! {
                event = input.next() => Wake::Terminal(event),
                Some(action) = self.action_rx.recv() => Wake::Action(action),
                () = sleep_until(self.toast.deadline()) => Wake::ToastExpired,
            };

            match wake {
                Wake::Terminal(None) => break,
                Wake::Terminal(Some(event)) => match event? {
                    TerminalEvent::Key(key) => {
                        if let Some(action) = self.handle_key_event(key) {
                            self.process_action(&action);
                        }
                    }
                    TerminalEvent::Resize(cols, rows) => debug!(cols, rows, "terminal resized"),
                },
                Wake::Action(action) => self.process_action(&action),
                Wake::ToastExpired => self.toast.expire(Instant::now()),
            }

            // Both pollers tend to land together; one redraw covers them.
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action);
            }
        }
        Ok(())
    }

    /// Map a key event to an action. The viewer gets first pick, then the
    /// help overlay, then global keys, then the dashboard.
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        if self.viewer.captures_input() {
            return self.viewer.handle_key_event(key);
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            };
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        // Text fields swallow printable keys.
        if !self.dashboard.captures_input() {
            match key.code {
                KeyCode::Char('q') => return Some(Action::Quit),
                KeyCode::Char('?') => return Some(Action::ToggleHelp),
                _ => {}
            }
        }

        self.dashboard.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Notify(notification) => {
                self.toast.show(notification.clone(), Instant::now());
            }

            Action::StartPatrol => self.spawn_toggle(true),
            Action::EndPatrol => self.spawn_toggle(false),
            Action::SubmitInterval(raw) => self.spawn_set_interval(raw.clone()),
            Action::ControlSettled(action) => debug!(%action, "control request settled"),

            other => {
                self.viewer.update(other);
                self.dashboard.update(other);
            }
        }
    }

    /// Start or end the patrol in the background; acceptance becomes a toast.
    fn spawn_toggle(&self, start: bool) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let (action, result) = if start {
                (ControlAction::Start, controller.start_inspection().await)
            } else {
                (ControlAction::End, controller.end_inspection().await)
            };
            match result {
                Ok(ActionOutcome::Completed { message }) => {
                    let message = toggle_message(start, message);
                    let _ = tx.send(Action::notify(message, NotificationKind::Success));
                }
                Ok(ActionOutcome::Busy) => debug!(%action, "ignored, already in flight"),
                // Already surfaced through the notifier.
                Err(e) => debug!(%action, error = %e, "control action failed"),
            }
            let _ = tx.send(Action::ControlSettled(action));
        });
    }

    fn spawn_set_interval(&self, raw: String) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let applied_tx = tx.clone();
            let done: Completion = Box::new(move || {
                let _ = applied_tx.send(Action::IntervalApplied);
            });
            if let Err(e) = controller.set_detection_interval(&raw, Some(done)).await {
                debug!(error = %e, raw = %raw, "detection interval not applied");
            }
            let _ = tx.send(Action::ControlSettled(ControlAction::SetInterval));
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        self.dashboard.render(frame, content);
        self.render_status_bar(frame, status);

        self.viewer.render(frame, area);
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
        self.toast.render(frame, area);
    }

    /// Bottom bar: server and in-flight actions.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::raw(" "),
            Span::styled(
                self.controller.config().url.to_string(),
                Style::default().fg(theme::NEON_CYAN),
            ),
        ];

        for action in [
            ControlAction::SetInterval,
            ControlAction::Start,
            ControlAction::End,
        ] {
            if self.controller.is_busy(action) {
                spans.push(Span::styled(
                    format!("  ◐ {action}"),
                    Style::default().fg(theme::ELECTRIC_YELLOW),
                ));
            }
        }
        spans.push(Span::styled(" │ ? help  q quit", theme::key_hint()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Render the help overlay centered on screen.
    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_width = 56u16.min(area.width.saturating_sub(4));
        let help_height = 20u16.min(area.height.saturating_sub(4));

        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;
        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(Clear, help_area);
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let row = |key: &'static str, label: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(label, theme::key_hint()),
            ])
        };
        let heading =
            |label: &'static str| Line::from(Span::styled(label, Style::default().fg(theme::NEON_CYAN)));

        let help_text = vec![
            Line::from(""),
            heading("  Patrol"),
            row("s", "Start inspection (when idle)"),
            row("x", "Stop inspection (when active)"),
            row("i", "Edit detection interval, Enter to apply"),
            Line::from(""),
            heading("  Results"),
            row("←/h →/l", "Previous / next page"),
            row("g", "Go to page"),
            row("z", "Cycle page size"),
            row("j/k ↑/↓", "Move selection"),
            row("Enter", "Open image viewer"),
            row("+/- 0", "Zoom in viewer / reset"),
            Line::from(""),
            heading("  Global"),
            row("?", "This help"),
            row("q", "Quit"),
            Line::from(Span::styled(
                "                     Esc or ? to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }
}

/// Toast text for an accepted start/end: the service's message, else a fixed line.
fn toggle_message(start: bool, ack: Option<String>) -> String {
    ack.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| {
        if start {
            "Inspection started"
        } else {
            "Inspection ended"
        }
        .to_owned()
    })
}

/// Sleep until `deadline`, or forever when there is none.
async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at.into()).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::FutureExt;
    use futures::future::BoxFuture;
    use patrol_api::{Ack, ResultEntry, StatusResponse, StepResponse};
    use patrol_core::PatrolBackend;
    use pretty_assertions::assert_eq;

    use super::*;

    /// Counts start/end calls; everything else answers idle and empty.
    #[derive(Default)]
    struct Recorder {
        starts: AtomicUsize,
        ends: AtomicUsize,
    }

    impl PatrolBackend for Recorder {
        fn get_status(&self) -> BoxFuture<'_, Result<StatusResponse, patrol_api::Error>> {
            async {
                Ok(StatusResponse {
                    patrol_status: "Inactive".into(),
                    det_step: Some(2.0),
                })
            }
            .boxed()
        }

        fn set_det_step(&self, _step: f64) -> BoxFuture<'_, Result<StepResponse, patrol_api::Error>> {
            async {
                Ok(StepResponse {
                    status: "success".into(),
                    message: None,
                })
            }
            .boxed()
        }

        fn start_patrol(&self) -> BoxFuture<'_, Result<Ack, patrol_api::Error>> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            async {
                Ok(Ack {
                    message: Some("Patrol started".into()),
                })
            }
            .boxed()
        }

        fn end_patrol(&self) -> BoxFuture<'_, Result<Ack, patrol_api::Error>> {
            self.ends.fetch_add(1, Ordering::SeqCst);
            async { Ok(Ack::default()) }.boxed()
        }

        fn get_results(&self) -> BoxFuture<'_, Result<Vec<ResultEntry>, patrol_api::Error>> {
            async { Ok(Vec::new()) }.boxed()
        }
    }

    fn config() -> ControllerConfig {
        ControllerConfig::new(patrol_config::parse_server("http://127.0.0.1:9").unwrap())
    }

    fn app() -> App {
        App::new(config(), 20).unwrap()
    }

    fn app_with(backend: &Arc<Recorder>) -> App {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Controller::with_backend(
            config(),
            Arc::clone(backend) as Arc<dyn PatrolBackend>,
            Arc::new(ChannelNotifier::new(tx.clone())),
        );
        App::with_controller(controller, 20, tx, rx)
    }

    /// Drain actions until `action` settles; returns the toast texts seen.
    async fn toasts_until_settled(app: &mut App, action: ControlAction) -> Vec<String> {
        let mut toasts = Vec::new();
        while let Some(next) = app.action_rx.recv().await {
            match next {
                Action::Notify(n) => toasts.push(n.message),
                Action::ControlSettled(done) if done == action => break,
                _ => {}
            }
        }
        toasts
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn q_quits_unless_typing() {
        let mut app = app();
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('q'))),
            Some(Action::Quit)
        ));

        app.handle_key_event(key(KeyCode::Char('i')));
        assert!(app.handle_key_event(key(KeyCode::Char('q'))).is_none());

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(app.handle_key_event(ctrl_c), Some(Action::Quit)));
    }

    #[test]
    fn viewer_takes_keys_while_open() {
        let mut app = app();
        app.process_action(&Action::OpenViewer {
            path: "/result_files/1.jpg".into(),
            time: "12:00:01".into(),
        });
        assert!(app.viewer.is_open());

        // `q` closes the popup instead of quitting.
        let close = app.handle_key_event(key(KeyCode::Char('q'))).unwrap();
        assert!(matches!(close, Action::CloseViewer));
        app.process_action(&close);
        assert!(!app.viewer.is_open());
        assert!(app.running);
    }

    #[test]
    fn help_overlay_toggles() {
        let mut app = app();
        let toggle = app.handle_key_event(key(KeyCode::Char('?'))).unwrap();
        app.process_action(&toggle);
        assert!(app.help_visible);

        // Other keys are swallowed while help is up.
        assert!(app.handle_key_event(key(KeyCode::Char('q'))).is_none());
        let close = app.handle_key_event(key(KeyCode::Esc)).unwrap();
        app.process_action(&close);
        assert!(!app.help_visible);
    }

    #[test]
    fn notifications_become_toasts() {
        let mut app = app();
        app.process_action(&Action::notify(
            "Detection interval set to 2 seconds",
            NotificationKind::Success,
        ));
        assert_eq!(
            app.toast.current().map(|n| n.message.as_str()),
            Some("Detection interval set to 2 seconds")
        );
        assert!(app.toast.deadline().is_some());
    }

    #[test]
    fn toggle_message_prefers_service_text() {
        assert_eq!(toggle_message(true, None), "Inspection started");
        assert_eq!(toggle_message(false, Some("  ".into())), "Inspection ended");
        assert_eq!(
            toggle_message(false, Some("Patrol stopped".into())),
            "Patrol stopped"
        );
    }

    #[tokio::test]
    async fn stop_sends_end_and_never_start() {
        let backend = Arc::new(Recorder::default());
        let mut app = app_with(&backend);

        app.process_action(&Action::EndPatrol);
        let toasts = toasts_until_settled(&mut app, ControlAction::End).await;

        assert_eq!(backend.ends.load(Ordering::SeqCst), 1);
        assert_eq!(backend.starts.load(Ordering::SeqCst), 0);
        assert_eq!(toasts, ["Inspection ended"]);
    }

    #[tokio::test]
    async fn start_sends_start_and_shows_acknowledgement() {
        let backend = Arc::new(Recorder::default());
        let mut app = app_with(&backend);

        app.process_action(&Action::StartPatrol);
        let toasts = toasts_until_settled(&mut app, ControlAction::Start).await;

        assert_eq!(backend.starts.load(Ordering::SeqCst), 1);
        assert_eq!(backend.ends.load(Ordering::SeqCst), 0);
        assert_eq!(toasts, ["Patrol started"]);
    }
}
