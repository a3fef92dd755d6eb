//! Reusable widgets shared by the dashboard.

pub mod toast;
pub mod viewer;
