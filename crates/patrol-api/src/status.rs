// Status and detection-interval endpoints

use tracing::debug;

use crate::client::PatrolClient;
use crate::error::Error;
use crate::models::{StatusResponse, StepRequest, StepResponse};

impl PatrolClient {
    /// Fetch the current patrol state and detection interval.
    ///
    /// `GET /get_status`
    pub async fn get_status(&self) -> Result<StatusResponse, Error> {
        self.get("get_status").await?.decode()
    }

    /// Set the detection interval, in seconds.
    ///
    /// The value is sent in its string form, e.g. `{"step": "2.5"}`.
    /// A 2xx response can still carry `status: "failure"`; callers check
    /// [`StepResponse::is_success`].
    ///
    /// `POST /set_det_step`
    pub async fn set_det_step(&self, step: f64) -> Result<StepResponse, Error> {
        debug!(step, "setting detection interval");
        let body = StepRequest {
            step: step.to_string(),
        };
        self.post("set_det_step", Some(&body)).await?.decode()
    }
}
