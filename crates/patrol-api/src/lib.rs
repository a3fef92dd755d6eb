// patrol-api: Async Rust client for the inspection patrol control service

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod control;
mod results;
mod status;

pub use client::PatrolClient;
pub use error::Error;
pub use models::{Ack, Payload, ResultEntry, StatusResponse, StepResponse};
pub use transport::{TlsMode, TransportConfig};
