//! Single-slot toast overlay. A new toast replaces the current one.

use std::time::{Duration, Instant};

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use patrol_core::NotificationKind;

use crate::action::Notification;
use crate::theme;

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Default)]
pub struct Toast {
    current: Option<(Notification, Instant)>,
}

impl Toast {
    pub fn show(&mut self, notification: Notification, now: Instant) {
        self.current = Some((notification, now));
    }

    /// When the current toast is due to disappear.
    pub fn deadline(&self) -> Option<Instant> {
        self.current
            .as_ref()
            .map(|(_, shown)| *shown + TOAST_DURATION)
    }

    /// Hide the toast once it has been visible for [`TOAST_DURATION`].
    pub fn expire(&mut self, now: Instant) {
        if self
            .current
            .as_ref()
            .is_some_and(|(_, shown)| now.saturating_duration_since(*shown) >= TOAST_DURATION)
        {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|(n, _)| n)
    }

    /// Draw in the top-right corner of `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(notification) = self.current() else {
            return;
        };

        let width = 48u16.min(area.width);
        let height = 3u16.min(area.height);
        let rect = Rect::new(
            area.x + area.width.saturating_sub(width + 1),
            area.y + 1u16.min(area.height.saturating_sub(height)),
            width,
            height,
        );

        let style = theme::toast(notification.kind);
        let icon = match notification.kind {
            NotificationKind::Success => "✓ ",
            NotificationKind::Error => "✗ ",
        };

        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(icon, style),
                Span::styled(notification.message.clone(), theme::card_text()),
            ]))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(style),
            ),
            rect,
        );
    }
}
