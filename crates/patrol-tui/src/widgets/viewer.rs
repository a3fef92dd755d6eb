//! Detection image viewer popup with zoom.
//!
//! The terminal cannot draw the image itself, so the popup shows the image
//! reference, the detection time, and a frame scaled by the zoom level.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

const ZOOM_STEP: f64 = 0.2;
const ZOOM_MIN: f64 = 0.1;
const ZOOM_MAX: f64 = 10.0;

/// Zoom factor, 1.0 = 100 %.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLevel(f64);

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(1.0)
    }
}

impl ZoomLevel {
    pub fn factor(self) -> f64 {
        self.0
    }

    pub fn zoom_in(&mut self) {
        self.0 = (self.0 + ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.0 = (self.0 - ZOOM_STEP).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// `120%`, `10%`, ...
    pub fn label(self) -> String {
        format!("{}%", (self.0 * 100.0).round())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    path: String,
    time: String,
}

/// Popup state. Closed until a card is opened.
#[derive(Debug, Default)]
pub struct Viewer {
    target: Option<Target>,
    zoom: ZoomLevel,
}

impl Viewer {
    pub fn show(&mut self, path: String, time: String) {
        self.target = Some(Target { path, time });
        self.zoom.reset();
    }

    /// Closing also resets the zoom.
    pub fn close(&mut self) {
        self.target = None;
        self.zoom.reset();
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }
}

impl Component for Viewer {
    /// Viewer keys; ignored while closed.
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        if !self.is_open() {
            return None;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Some(Action::CloseViewer),
            KeyCode::Char('+' | '=') => self.zoom.zoom_in(),
            KeyCode::Char('-' | '_') => self.zoom.zoom_out(),
            KeyCode::Char('0') => self.zoom.reset(),
            _ => {}
        }
        None
    }

    fn update(&mut self, action: &Action) {
        match action {
            Action::OpenViewer { path, time } => self.show(path.clone(), time.clone()),
            Action::CloseViewer => self.close(),
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(target) = &self.target else {
            return;
        };

        let popup = centered(area, 80, 80);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(format!(" Detection Time: {} ", target.time))
            .title_style(theme::title_style())
            .title_bottom(Line::from(vec![
                Span::styled(" +/- ", theme::key_hint_key()),
                Span::styled("zoom  ", theme::key_hint()),
                Span::styled("0 ", theme::key_hint_key()),
                Span::styled("reset  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("close ", theme::key_hint()),
            ]))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [info, canvas] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(inner);
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(target.path.clone(), theme::card_text())),
                Line::from(Span::styled(
                    format!("Zoom {}", self.zoom().label()),
                    theme::key_hint_key(),
                )),
            ]),
            info,
        );

        // Base frame is half the canvas at 100 %.
        let pct = scaled_percent(self.zoom().factor());
        let frame_area = centered(canvas, pct, pct);
        frame.render_widget(
            Paragraph::new(target.path.rsplit('/').next().unwrap_or_default())
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(theme::border_default()),
                ),
            frame_area,
        );
    }

    fn captures_input(&self) -> bool {
        self.is_open()
    }
}

/// Percentage of the canvas the image frame covers at a given zoom.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn scaled_percent(zoom: f64) -> u16 {
    (zoom * 50.0).round().clamp(5.0, 100.0) as u16
}

/// A rect of `pct_x` × `pct_y` percent centered inside `area`.
fn centered(area: Rect, pct_x: u16, pct_y: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - pct_y) / 2),
        Constraint::Percentage(pct_y),
        Constraint::Percentage((100 - pct_y) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - pct_x) / 2),
        Constraint::Percentage(pct_x),
        Constraint::Percentage((100 - pct_x) / 2),
    ])
    .areas(mid);
    center
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn zoom_steps_by_twenty_percent() {
        let mut zoom = ZoomLevel::default();
        assert_eq!(zoom.label(), "100%");
        zoom.zoom_in();
        assert_eq!(zoom.label(), "120%");
        zoom.zoom_out();
        zoom.zoom_out();
        assert_eq!(zoom.label(), "80%");
        zoom.reset();
        assert_eq!(zoom.factor(), 1.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut zoom = ZoomLevel::default();
        for _ in 0..100 {
            zoom.zoom_in();
        }
        assert_eq!(zoom.factor(), ZOOM_MAX);
        assert_eq!(zoom.label(), "1000%");

        for _ in 0..100 {
            zoom.zoom_out();
        }
        assert_eq!(zoom.factor(), ZOOM_MIN);
        assert_eq!(zoom.label(), "10%");
        zoom.zoom_in();
        assert_eq!(zoom.label(), "30%");
    }

    #[test]
    fn keys_are_ignored_while_closed() {
        let mut viewer = Viewer::default();
        assert!(viewer.handle_key_event(key('+')).is_none());
        assert_eq!(viewer.zoom().label(), "100%");
    }

    #[test]
    fn closing_resets_zoom() {
        let mut viewer = Viewer::default();
        viewer.show("/result_files/7.jpg".into(), "10:00:07".into());
        viewer.handle_key_event(key('='));
        viewer.handle_key_event(key('+'));
        assert_eq!(viewer.zoom().label(), "140%");
        viewer.handle_key_event(key('_'));
        assert_eq!(viewer.zoom().label(), "120%");

        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(
            viewer.handle_key_event(esc),
            Some(Action::CloseViewer)
        ));
        viewer.close();
        assert!(!viewer.is_open());
        assert_eq!(viewer.zoom().label(), "100%");
    }

    #[test]
    fn reset_key_restores_full_size() {
        let mut viewer = Viewer::default();
        viewer.show("a.jpg".into(), "t".into());
        viewer.handle_key_event(key('-'));
        viewer.handle_key_event(key('0'));
        assert_eq!(viewer.zoom().factor(), 1.0);
    }

    #[test]
    fn open_and_close_actions_drive_the_popup() {
        let mut viewer = Viewer::default();
        assert!(!viewer.captures_input());

        viewer.update(&Action::OpenViewer {
            path: "/result_files/3.jpg".into(),
            time: "10:00:03".into(),
        });
        assert!(viewer.captures_input());
        viewer.handle_key_event(key('+'));

        viewer.update(&Action::CloseViewer);
        assert!(!viewer.captures_input());
        assert_eq!(viewer.zoom().label(), "100%");
    }
}
