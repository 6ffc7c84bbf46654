// Session-scoped HTTP client for the controller's legacy API.
//
// Wraps `reqwest::Client` with controller URL construction and a uniform
// endpoint contract: only HTTP 200 is success, and bodies are returned as
// verbatim JSON (no envelope stripping, no schema validation -- the latter
// is deliberately deferred). Endpoint families (sites, devices, clients,
// stats, DPI) are implemented as inherent methods in separate files to
// keep this module focused on transport mechanics.

mod clients;
mod devices;
mod dpi;
mod sites;
mod stats;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::config::ControllerConfig;
use crate::error::Error;
use crate::transport::TransportConfig;

pub use dpi::DpiGroupBy;
pub use stats::{ElementType, Interval, STAT_ATTRIBUTES, StatRequest};
pub use stats::{one_hour_window, thirty_min_window};

/// One authenticated session against one controller.
///
/// Construction performs the login exchange; a value of this type only
/// exists after the controller accepted the credentials. The cookie jar
/// inside the underlying `reqwest::Client` is the single mutable resource
/// the client owns -- it holds the session token for all later requests.
///
/// The session is single-owner: `SessionClient` is not `Clone` and is not
/// designed for concurrent use. There is no explicit logout; the session
/// ends when the value is dropped.
pub struct SessionClient {
    http: reqwest::Client,
    base_url: Url,
}

// Skips the reqwest client: the cookie jar holds the session token and
// must never reach debug output.
impl std::fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl SessionClient {
    /// Authenticate against the controller and return a live session.
    ///
    /// `POST {base}/api/login` with the credentials as JSON. Any status
    /// other than 200 is a fatal construction failure
    /// ([`Error::Authentication`]); no client value is returned.
    ///
    /// If the transport config has no cookie jar, one is attached
    /// automatically (session auth requires cookies).
    pub async fn connect(
        config: &ControllerConfig,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let transport = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = transport.build_client()?;

        let url = config.base_url.join("api/login")?;
        debug!(%url, "logging in to controller");

        let body = json!({
            "username": config.username,
            "password": config.password.expose_secret(),
        });

        let resp = http
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Authentication {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        debug!("logged in to controller");
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// The controller base URL this session is bound to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a controller-level URL: `{base}/api/{path}`
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("api/{path}"))?)
    }

    /// Build a site-scoped URL: `{base}/api/s/{site}/{path}`
    ///
    /// The site id is the only caller-supplied URL component; it must be
    /// non-empty. This check runs before any network I/O.
    pub(crate) fn site_url(&self, site: &str, path: &str) -> Result<Url, Error> {
        if site.is_empty() {
            return Err(Error::Validation {
                message: "site id must be a non-empty string".into(),
            });
        }
        Ok(self.base_url.join(&format!("api/s/{site}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and return the JSON body verbatim.
    ///
    /// Only HTTP 200 is success; anything else raises [`Error::Endpoint`]
    /// carrying the operation label, endpoint URL, and observed status.
    pub(crate) async fn get_json(
        &self,
        operation: &'static str,
        url: Url,
    ) -> Result<Value, Error> {
        debug!(%url, operation, "GET");

        let resp = self
            .http
            .get(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        self.accept_only_ok(operation, url, resp).await
    }

    /// Send a POST request with a JSON parameter object and return the
    /// JSON body verbatim. Same success contract as [`Self::get_json`].
    pub(crate) async fn post_json(
        &self,
        operation: &'static str,
        url: Url,
        body: &Value,
    ) -> Result<Value, Error> {
        debug!(%url, operation, "POST");

        let resp = self.http.post(url.clone()).json(body).send().await?;

        self.accept_only_ok(operation, url, resp).await
    }

    /// Enforce the uniform endpoint contract: 200 or [`Error::Endpoint`].
    async fn accept_only_ok(
        &self,
        operation: &'static str,
        url: Url,
        resp: reqwest::Response,
    ) -> Result<Value, Error> {
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::Endpoint {
                operation,
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        let value = resp.json::<Value>().await?;
        debug!(%url, operation, "ok");
        Ok(value)
    }
}
