// Detection result endpoint

use crate::client::PatrolClient;
use crate::error::Error;
use crate::models::ResultEntry;

impl PatrolClient {
    /// Fetch every detection result, in server order (oldest first).
    ///
    /// `GET /get_result`
    pub async fn get_results(&self) -> Result<Vec<ResultEntry>, Error> {
        self.get("get_result").await?.decode()
    }
}
