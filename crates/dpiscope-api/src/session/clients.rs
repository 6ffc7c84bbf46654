// Client (station) and dynamic DNS endpoints.

use serde_json::Value;
use tracing::debug;

use crate::error::Error;
use crate::session::SessionClient;

impl SessionClient {
    /// List currently connected clients (stations) for a site.
    ///
    /// `GET /api/s/{site}/stat/sta`
    pub async fn list_active_clients(&self, site: &str) -> Result<Value, Error> {
        let url = self.site_url(site, "stat/sta")?;
        debug!(site, "listing active clients");
        self.get_json("list active clients", url).await
    }

    /// List all clients the controller has ever seen for a site.
    ///
    /// `GET /api/s/{site}/rest/user`
    pub async fn list_known_clients(&self, site: &str) -> Result<Value, Error> {
        let url = self.site_url(site, "rest/user")?;
        debug!(site, "listing known clients");
        self.get_json("list known clients", url).await
    }

    /// Fetch dynamic DNS state for a site.
    ///
    /// `GET /api/s/{site}/stat/dynamicdns`
    pub async fn get_ddns_info(&self, site: &str) -> Result<Value, Error> {
        let url = self.site_url(site, "stat/dynamicdns")?;
        debug!(site, "fetching dynamic dns info");
        self.get_json("get ddns info", url).await
    }
}
