// ── Service backend seam ──
//
// The five calls the panel makes, as an object-safe trait so the
// controller can run against `PatrolClient` or an in-process stand-in.

use futures::FutureExt;
use futures::future::BoxFuture;

use patrol_api::{Ack, Error, PatrolClient, ResultEntry, StatusResponse, StepResponse};

pub trait PatrolBackend: Send + Sync {
    fn get_status(&self) -> BoxFuture<'_, Result<StatusResponse, Error>>;
    fn set_det_step(&self, step: f64) -> BoxFuture<'_, Result<StepResponse, Error>>;
    fn start_patrol(&self) -> BoxFuture<'_, Result<Ack, Error>>;
    fn end_patrol(&self) -> BoxFuture<'_, Result<Ack, Error>>;
    fn get_results(&self) -> BoxFuture<'_, Result<Vec<ResultEntry>, Error>>;
}

impl PatrolBackend for PatrolClient {
    fn get_status(&self) -> BoxFuture<'_, Result<StatusResponse, Error>> {
        PatrolClient::get_status(self).boxed()
    }

    fn set_det_step(&self, step: f64) -> BoxFuture<'_, Result<StepResponse, Error>> {
        PatrolClient::set_det_step(self, step).boxed()
    }

    fn start_patrol(&self) -> BoxFuture<'_, Result<Ack, Error>> {
        PatrolClient::start_patrol(self).boxed()
    }

    fn end_patrol(&self) -> BoxFuture<'_, Result<Ack, Error>> {
        PatrolClient::end_patrol(self).boxed()
    }

    fn get_results(&self) -> BoxFuture<'_, Result<Vec<ResultEntry>, Error>> {
        PatrolClient::get_results(self).boxed()
    }
}
