// Patrol start/end endpoints

use serde_json::Value;

use crate::client::PatrolClient;
use crate::error::Error;
use crate::models::Ack;

impl PatrolClient {
    /// Begin patrolling.
    ///
    /// `POST /start_patrol`
    pub async fn start_patrol(&self) -> Result<Ack, Error> {
        Ok(self.post("start_patrol", None::<&Value>).await?.into())
    }

    /// Stop patrolling.
    ///
    /// `POST /end_patrol`
    pub async fn end_patrol(&self) -> Result<Ack, Error> {
        Ok(self.post("end_patrol", None::<&Value>).await?.into())
    }
}
