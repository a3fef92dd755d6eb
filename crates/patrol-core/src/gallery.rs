// ── Pagination & render engine ──
//
// `Gallery` owns the paged view over the current result set. Rendering is
// a pure function of (results, pagination); every mutation keeps the
// current page inside [1, total_pages].

use std::sync::Arc;

use serde::Serialize;

use crate::model::{DetectionResult, ResultSet};
use crate::notify::ImageViewer;
use crate::parse::parse_int_prefix;

pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Choices offered by the page-size selector.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [10, 20, 50, 100];

/// Placeholder shown instead of cards and pagination when there are no results.
pub const EMPTY_MESSAGE: &str = "No detection results yet";

/// `max(1, ceil(len / per_page))`.
pub fn total_pages(len: usize, per_page: usize) -> usize {
    len.div_ceil(per_page.max(1)).max(1)
}

/// Result count badge: `"(n)"`, or empty when there are no results.
pub fn count_badge(len: usize) -> String {
    if len > 0 {
        format!("({len})")
    } else {
        String::new()
    }
}

// ── Pagination state ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    items_per_page: usize,
    current_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            items_per_page: items_per_page.max(1),
            current_page: 1,
        }
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    fn clamp(&mut self, len: usize) {
        self.current_page = self
            .current_page
            .clamp(1, total_pages(len, self.items_per_page));
    }
}

/// Previous/next navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

/// Outcome of [`Gallery::jump_to_page`]. The input field is cleared either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    Navigated(usize),
    Ignored,
}

// ── Views ────────────────────────────────────────────────────────

/// One rendered card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultCard {
    /// Position in the full (newest-first) result set.
    pub index: usize,
    pub path: String,
    pub time: String,
}

impl ResultCard {
    pub fn title(&self) -> String {
        format!("Time: {}", self.time)
    }
}

/// A rendered page plus its pagination controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView {
    pub cards: Vec<ResultCard>,
    pub current_page: usize,
    pub total_pages: usize,
    pub items_per_page: usize,
    pub total_items: usize,
    /// `Page {current} / {total}`.
    pub page_label: String,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub count_badge: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum GalleryView {
    /// No results: placeholder only, pagination hidden.
    Empty { message: &'static str },
    Page(PageView),
}

impl GalleryView {
    pub fn cards(&self) -> &[ResultCard] {
        match self {
            Self::Empty { .. } => &[],
            Self::Page(page) => &page.cards,
        }
    }
}

// ── Gallery ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Gallery {
    results: Arc<ResultSet>,
    pagination: Pagination,
}

impl Gallery {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            results: Arc::default(),
            pagination: Pagination::new(items_per_page),
        }
    }

    pub fn results(&self) -> &Arc<ResultSet> {
        &self.results
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.results.len(), self.pagination.items_per_page)
    }

    /// Replace the result set. The current page survives unless it no longer exists.
    pub fn set_results(&mut self, results: Arc<ResultSet>) {
        self.results = results;
        self.pagination.clamp(self.results.len());
    }

    /// Materialize the current page.
    pub fn render(&mut self) -> GalleryView {
        let len = self.results.len();
        self.pagination.clamp(len);
        if len == 0 {
            return GalleryView::Empty {
                message: EMPTY_MESSAGE,
            };
        }

        let per_page = self.pagination.items_per_page;
        let current = self.pagination.current_page;
        let total = self.total_pages();
        let start = (current - 1) * per_page;

        let cards = self
            .results
            .iter()
            .enumerate()
            .skip(start)
            .take(per_page)
            .map(|(index, DetectionResult { path, time })| ResultCard {
                index,
                path: path.clone(),
                time: time.clone(),
            })
            .collect();

        GalleryView::Page(PageView {
            cards,
            current_page: current,
            total_pages: total,
            items_per_page: per_page,
            total_items: len,
            page_label: format!("Page {current} / {total}"),
            prev_disabled: current <= 1,
            next_disabled: current >= total,
            count_badge: count_badge(len),
        })
    }

    /// Move one page. Returns `false`, leaving state untouched, when the target is out of range.
    pub fn change_page(&mut self, direction: PageDirection) -> bool {
        let current = self.pagination.current_page;
        let target = match direction {
            PageDirection::Previous => current.checked_sub(1),
            PageDirection::Next => current.checked_add(1),
        };
        match target {
            Some(page) if (1..=self.total_pages()).contains(&page) => {
                self.pagination.current_page = page;
                true
            }
            _ => false,
        }
    }

    /// Set the page size and go back to page 1.
    pub fn change_page_size(&mut self, items_per_page: usize) {
        self.pagination.items_per_page = items_per_page.max(1);
        self.pagination.current_page = 1;
    }

    /// Step through [`PAGE_SIZE_OPTIONS`], wrapping around.
    pub fn cycle_page_size(&mut self) -> usize {
        let current = self.pagination.items_per_page;
        let next = PAGE_SIZE_OPTIONS
            .iter()
            .copied()
            .find(|&size| size > current)
            .unwrap_or(PAGE_SIZE_OPTIONS[0]);
        self.change_page_size(next);
        next
    }

    /// Navigate to the page typed by the user, clamped into range.
    pub fn jump_to_page(&mut self, raw: &str) -> JumpOutcome {
        let Some(requested) = parse_int_prefix(raw) else {
            return JumpOutcome::Ignored;
        };
        let total = i64::try_from(self.total_pages()).unwrap_or(i64::MAX);
        let page = usize::try_from(requested.clamp(1, total)).unwrap_or(1);
        self.pagination.current_page = page;
        JumpOutcome::Navigated(page)
    }

    /// Open the detail viewer for the `slot`-th card on the current page.
    pub fn open(&self, slot: usize, viewer: &dyn ImageViewer) -> bool {
        if slot >= self.pagination.items_per_page {
            return false;
        }
        let index = (self.pagination.current_page - 1) * self.pagination.items_per_page + slot;
        let Some(result) = self.results.get(index) else {
            return false;
        };
        viewer.open(&result.path, &result.time);
        true
    }
}
