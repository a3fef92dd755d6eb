//! Terminal input for the panel.
//!
//! Wraps crossterm's event stream and keeps only what the panel reacts to:
//! key presses and resizes. Redraws are driven by the app loop after every
//! input, controller update or toast expiry, so there is no frame timer.

use std::io;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    Key(KeyEvent),
    /// New size as (cols, rows).
    Resize(u16, u16),
}

/// Keep key presses and resizes. Key releases and repeats (reported by
/// some terminals), mouse, focus and paste events are dropped.
pub fn translate(event: CrosstermEvent) -> Option<TerminalEvent> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
            Some(TerminalEvent::Key(key))
        }
        CrosstermEvent::Resize(cols, rows) => Some(TerminalEvent::Resize(cols, rows)),
        _ => None,
    }
}

pub struct TerminalInput {
    stream: EventStream,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self {
            stream: EventStream::new(),
        }
    }

    /// Next relevant event, or `None` once the terminal stream has ended.
    pub async fn next(&mut self) -> Option<io::Result<TerminalEvent>> {
        loop {
            match self.stream.next().await? {
                Ok(event) => {
                    if let Some(event) = translate(event) {
                        return Some(Ok(event));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
