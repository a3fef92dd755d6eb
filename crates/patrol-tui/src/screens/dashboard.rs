//! Dashboard screen — the single patrol control panel.
//!
//! Layout:
//! ┌─ Patrol ─────────────────────────────────────────────┐
//! │ ● ACTIVE   interval 2.5s   results (45)   [x] Stop   │
//! └──────────────────────────────────────────────────────┘
//! ┌─ Detection interval ─┐ ┌─ Go to page ─┐
//! └──────────────────────┘ └──────────────┘
//! ┌─ Detection Results ──────────────────────────────────┐
//! │ card card card ...                                    │
//! └──────────────────────────────────────────────────────┘
//!  ◀ Prev   Page 1 / 3   Next ▶   20 per page

use std::cell::RefCell;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use tui_input::{Input, InputRequest};

use patrol_core::{
    Gallery, GalleryView, JumpOutcome, PageDirection, PageView, ResultCard, StatusView,
};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

const CARD_WIDTH: u16 = 30;
const CARD_HEIGHT: u16 = 4;

/// Which text field has the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Interval,
    Jump,
}

pub struct DashboardScreen {
    gallery: Gallery,
    status: StatusView,
    /// Card slot on the current page.
    selected: usize,
    editing: Option<Field>,
    interval: Input,
    jump: Input,
}

impl DashboardScreen {
    pub fn new(page_size: usize) -> Self {
        Self {
            gallery: Gallery::new(page_size),
            status: StatusView::from_snapshot(None),
            selected: 0,
            editing: None,
            interval: Input::default(),
            jump: Input::default(),
        }
    }

    fn page_len(&mut self) -> usize {
        self.gallery.render().cards().len()
    }

    fn clamp_selection(&mut self) {
        let len = self.page_len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Keys while a text field is open.
    fn handle_field_key(&mut self, field: Field, key: KeyEvent) -> Option<Action> {
        let input = match field {
            Field::Interval => &mut self.interval,
            Field::Jump => &mut self.jump,
        };

        let request = match key.code {
            KeyCode::Enter => {
                self.editing = None;
                return self.submit(field);
            }
            KeyCode::Esc => {
                input.reset();
                self.editing = None;
                return None;
            }
            KeyCode::Char(c) => InputRequest::InsertChar(c),
            KeyCode::Backspace => InputRequest::DeletePrevChar,
            KeyCode::Delete => InputRequest::DeleteNextChar,
            KeyCode::Left => InputRequest::GoToPrevChar,
            KeyCode::Right => InputRequest::GoToNextChar,
            KeyCode::Home => InputRequest::GoToStart,
            KeyCode::End => InputRequest::GoToEnd,
            _ => return None,
        };
        input.handle(request);
        None
    }

    fn submit(&mut self, field: Field) -> Option<Action> {
        match field {
            // Cleared once the follow-up status refresh lands.
            Field::Interval => Some(Action::SubmitInterval(self.interval.value().to_owned())),
            Field::Jump => {
                if let JumpOutcome::Navigated(page) = self.gallery.jump_to_page(self.jump.value()) {
                    tracing::debug!(page, "jumped to page");
                    self.selected = 0;
                }
                self.jump.reset();
                None
            }
        }
    }

    /// Ask the gallery to open the selected card in the viewer.
    fn open_selected(&self) -> Option<Action> {
        let opened = RefCell::new(None);
        self.gallery.open(self.selected, &|path: &str, time: &str| {
            *opened.borrow_mut() = Some(Action::OpenViewer {
                path: path.to_owned(),
                time: time.to_owned(),
            });
        });
        opened.into_inner()
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Patrol ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let interval = self
            .status
            .interval_placeholder
            .as_ref()
            .map_or_else(|| "-".to_owned(), |secs| format!("{secs}s"));

        let mut spans = vec![
            Span::styled(" ● ", theme::status(self.status.status)),
            Span::styled(self.status.label, theme::status(self.status.status)),
            Span::styled("   interval ", theme::key_hint()),
            Span::styled(interval, theme::card_text()),
            Span::styled("   results ", theme::key_hint()),
            Span::styled(
                patrol_core::gallery::count_badge(self.gallery.results().len()),
                theme::card_text(),
            ),
            Span::raw("   "),
        ];
        if self.status.show_start {
            spans.push(Span::styled("[s]", theme::key_hint_key()));
            spans.push(Span::styled(" Start inspection", theme::card_text()));
        }
        if self.status.show_end {
            spans.push(Span::styled("[x]", theme::key_hint_key()));
            spans.push(Span::styled(" Stop inspection", theme::card_text()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }

    fn render_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        field: Field,
        title: &str,
        placeholder: &str,
    ) {
        let input = match field {
            Field::Interval => &self.interval,
            Field::Jump => &self.jump,
        };
        let focused = self.editing == Some(field);
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let width = usize::from(inner.width.max(1));
        let scroll = input.visual_scroll(width);
        let text = if input.value().is_empty() && !focused {
            Line::from(Span::styled(placeholder.to_owned(), theme::key_hint()))
        } else {
            Line::from(Span::styled(input.value().to_owned(), theme::card_text()))
        };
        frame.render_widget(
            Paragraph::new(text).scroll((0, u16::try_from(scroll).unwrap_or(0))),
            inner,
        );

        if focused {
            let cursor = input.visual_cursor().saturating_sub(scroll);
            let x = inner.x + u16::try_from(cursor).unwrap_or(inner.width);
            frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
        }
    }

    fn render_gallery(&self, frame: &mut Frame, area: Rect, view: &GalleryView) {
        let title = match view {
            GalleryView::Page(page) => format!(" Detection Results {} ", page.count_badge),
            GalleryView::Empty { .. } => " Detection Results ".to_owned(),
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.editing.is_none() {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match view {
            GalleryView::Empty { message } => {
                let y = inner.y + inner.height / 2;
                frame.render_widget(
                    Paragraph::new(*message)
                        .style(theme::key_hint())
                        .alignment(Alignment::Center),
                    Rect::new(inner.x, y, inner.width, 1u16.min(inner.height)),
                );
            }
            GalleryView::Page(page) => self.render_cards(frame, inner, &page.cards),
        }
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect, cards: &[ResultCard]) {
        let columns = usize::from((area.width / CARD_WIDTH).max(1));
        let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
        let selected_row = self.selected / columns;
        let first_row = selected_row.saturating_sub(visible_rows - 1);

        let card_width = area.width / u16::try_from(columns).unwrap_or(1);

        for (slot, card) in cards.iter().enumerate().skip(first_row * columns) {
            let row = slot / columns - first_row;
            if row >= visible_rows {
                break;
            }
            let col = slot % columns;
            let (Ok(row), Ok(col)) = (u16::try_from(row), u16::try_from(col)) else {
                break;
            };
            let rect = Rect::new(
                area.x + col * card_width,
                area.y + row * CARD_HEIGHT,
                card_width,
                CARD_HEIGHT,
            );

            let style = if slot == self.selected {
                theme::card_selected()
            } else {
                theme::card_text()
            };
            let block = Block::default()
                .title(card.title())
                .title_style(style)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if slot == self.selected {
                    theme::border_focused()
                } else {
                    theme::border_default()
                });
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(Span::styled(format!("#{}", card.index + 1), theme::key_hint())),
                    Line::from(Span::styled(card.path.clone(), style)),
                ])
                .block(block),
                rect,
            );
        }
    }

    fn render_pagination(frame: &mut Frame, area: Rect, page: &PageView) {
        let control = |label: &'static str, disabled: bool| {
            Span::styled(
                label,
                if disabled {
                    theme::disabled()
                } else {
                    theme::key_hint_key()
                },
            )
        };

        let line = Line::from(vec![
            Span::raw(" "),
            control("◀ Prev", page.prev_disabled),
            Span::raw("   "),
            Span::styled(page.page_label.clone(), theme::title_style()),
            Span::raw("   "),
            control("Next ▶", page.next_disabled),
            Span::styled(
                format!("   {} per page ", page.items_per_page),
                theme::card_text(),
            ),
            Span::styled("(z)", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_hints(frame: &mut Frame, area: Rect) {
        let hint = |key: &'static str, label: &'static str| {
            [
                Span::styled(key, theme::key_hint_key()),
                Span::styled(label, theme::key_hint()),
            ]
        };
        let spans: Vec<Span> = [
            hint(" s/x ", "start/stop  "),
            hint("i ", "interval  "),
            hint("g ", "go to page  "),
            hint("←/→ ", "page  "),
            hint("Enter ", "view  "),
            hint("? ", "help  "),
            hint("q ", "quit"),
        ]
        .into_iter()
        .flatten()
        .collect();
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        if let Some(field) = self.editing {
            return self.handle_field_key(field, key);
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return None;
        }

        match key.code {
            KeyCode::Char('s') if self.status.show_start => Some(Action::StartPatrol),
            KeyCode::Char('x') if self.status.show_end => Some(Action::EndPatrol),
            KeyCode::Char('i') => {
                self.editing = Some(Field::Interval);
                None
            }
            KeyCode::Char('g') => {
                self.jump.reset();
                self.editing = Some(Field::Jump);
                None
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if self.gallery.change_page(PageDirection::Previous) {
                    self.selected = 0;
                }
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.gallery.change_page(PageDirection::Next) {
                    self.selected = 0;
                }
                None
            }
            KeyCode::Char('z') => {
                let size = self.gallery.cycle_page_size();
                tracing::debug!(size, "page size changed");
                self.selected = 0;
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.page_len();
                if self.selected + 1 < len {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Enter => self.open_selected(),
            _ => None,
        }
    }

    fn update(&mut self, action: &Action) {
        match action {
            Action::StatusUpdated(snapshot) => {
                self.status = StatusView::from_snapshot(Some(snapshot));
            }
            Action::ResultsUpdated(results) => {
                self.gallery.set_results(Arc::clone(results));
                self.clamp_selection();
            }
            Action::IntervalApplied => {
                if self.editing != Some(Field::Interval) {
                    self.interval.reset();
                }
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        // Rendering clamps the page; work on a copy so `render` stays `&self`.
        let view = self.gallery.clone().render();

        let [header, fields, grid, pager, hints] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(CARD_HEIGHT + 2),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_header(frame, header);

        let [interval_area, jump_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(fields);
        let placeholder = self
            .status
            .interval_placeholder
            .as_deref()
            .map_or_else(|| "seconds, min 0.1".to_owned(), |secs| format!("{secs} (press i)"));
        self.render_field(
            frame,
            interval_area,
            Field::Interval,
            "Detection interval (s)",
            &placeholder,
        );
        self.render_field(frame, jump_area, Field::Jump, "Go to page", "press g");

        self.render_gallery(frame, grid, &view);
        if let GalleryView::Page(page) = &view {
            Self::render_pagination(frame, pager, page);
        }
        Self::render_hints(frame, hints);
    }

    fn captures_input(&self) -> bool {
        self.editing.is_some()
    }
}
