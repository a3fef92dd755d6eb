// ── Request client ──
//
// Every call to the service goes through here. A failure is reported to
// the notifier exactly once, then handed back to the caller, so callers
// log but never notify again.

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use patrol_api::{Ack, ResultEntry, StatusResponse, StepResponse};

use crate::backend::PatrolBackend;
use crate::error::CoreError;
use crate::notify::{NotificationKind, Notifier};

#[derive(Clone)]
pub struct RequestClient {
    backend: Arc<dyn PatrolBackend>,
    notifier: Arc<dyn Notifier>,
}

impl RequestClient {
    pub fn new(backend: Arc<dyn PatrolBackend>, notifier: Arc<dyn Notifier>) -> Self {
        Self { backend, notifier }
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub async fn get_status(&self) -> Result<StatusResponse, CoreError> {
        self.surface(self.backend.get_status()).await
    }

    pub async fn set_det_step(&self, step: f64) -> Result<StepResponse, CoreError> {
        self.surface(self.backend.set_det_step(step)).await
    }

    pub async fn start_patrol(&self) -> Result<Ack, CoreError> {
        self.surface(self.backend.start_patrol()).await
    }

    pub async fn end_patrol(&self) -> Result<Ack, CoreError> {
        self.surface(self.backend.end_patrol()).await
    }

    pub async fn get_results(&self) -> Result<Vec<ResultEntry>, CoreError> {
        self.surface(self.backend.get_results()).await
    }

    /// Await `call`; on failure notify with the error text, then propagate.
    async fn surface<T>(
        &self,
        call: impl Future<Output = Result<T, patrol_api::Error>>,
    ) -> Result<T, CoreError> {
        match call.await {
            Ok(value) => Ok(value),
            Err(err) => {
                debug!(error = %err, "request failed");
                self.notifier
                    .notify(&err.to_string(), NotificationKind::Error);
                Err(err.into())
            }
        }
    }
}

impl std::fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestClient").finish_non_exhaustive()
    }
}
