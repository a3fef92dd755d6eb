// patrol-core: Polling, control actions, and pagination between patrol-api and consumers (CLI/TUI).

pub mod backend;
pub mod busy;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod gallery;
pub mod model;
pub mod notify;
pub mod parse;
pub mod request;
pub mod scheduler;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::PatrolBackend;
pub use config::{ControllerConfig, TlsVerification};
pub use controller::{ActionOutcome, Completion, ControlAction, Controller};
pub use error::CoreError;
pub use gallery::{
    EMPTY_MESSAGE, Gallery, GalleryView, JumpOutcome, PAGE_SIZE_OPTIONS, PageDirection, PageView,
    Pagination, ResultCard,
};
pub use model::{DetectionResult, PatrolStatus, ResultSet, StatusSnapshot};
pub use notify::{ImageViewer, NotificationKind, Notifier};
pub use request::RequestClient;
pub use view::StatusView;
