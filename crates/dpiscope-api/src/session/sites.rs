// Site inventory endpoints.

use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::session::SessionClient;

impl SessionClient {
    /// List all sites visible to the authenticated account.
    ///
    /// `GET /api/self/sites`
    pub async fn list_sites(&self) -> Result<Value, Error> {
        let url = self.api_url("self/sites")?;
        debug!("listing sites");
        self.get_json("list sites", url).await
    }
}
