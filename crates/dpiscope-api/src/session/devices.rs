// Device inventory endpoints.

use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::session::SessionClient;

impl SessionClient {
    /// List managed devices for a site.
    ///
    /// `GET /api/s/{site}/stat/device`
    pub async fn list_devices(&self, site: &str) -> Result<Value, Error> {
        let url = self.site_url(site, "stat/device")?;
        debug!(site, "listing devices");
        self.get_json("list devices", url).await
    }

    /// List managed devices for the `default` site.
    pub async fn list_devices_default(&self) -> Result<Value, Error> {
        self.list_devices("default").await
    }
}
