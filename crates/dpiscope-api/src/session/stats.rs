// Historical report endpoints (stat/report).
//
// The report endpoint is a POST with an attribute-selection body. The
// attribute vocabulary is fixed; requests are validated locally before
// anything touches the wire, so a malformed call never reaches the
// controller.

use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::Error;
use crate::session::SessionClient;

/// Every stat attribute the report endpoint accepts.
pub const STAT_ATTRIBUTES: [&str; 10] = [
    "bytes",
    "wan-tx_bytes",
    "wan-rx_bytes",
    "wlan_bytes",
    "num_sta",
    "lan-num_sta",
    "wlan-num_sta",
    "time",
    "rx_bytes",
    "tx_bytes",
];

/// Report aggregation interval.
///
/// This is the complete set the controller validates. There is no monthly
/// interval -- the report endpoint rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    FiveMinutes,
    Hourly,
    Daily,
}

impl Interval {
    /// Wire name used in the endpoint path.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FiveMinutes => "5minutes",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
        }
    }
}

/// What the report rows describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Site,
    User,
    Ap,
}

impl ElementType {
    /// Wire name used in the endpoint path.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::User => "user",
            Self::Ap => "ap",
        }
    }
}

/// Parameter object for a stat report request.
///
/// `attrs` must be non-empty and drawn from [`STAT_ATTRIBUTES`]. The
/// optional window bounds are epoch milliseconds; the optional MAC list
/// narrows the result to those stations (omitted from the body when empty).
#[derive(Debug, Clone, Default)]
pub struct StatRequest {
    pub attrs: Vec<String>,
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
    pub macs: Vec<String>,
}

impl StatRequest {
    /// A request selecting every known attribute.
    pub fn all_attributes() -> Self {
        Self {
            attrs: STAT_ATTRIBUTES.iter().map(|a| (*a).to_owned()).collect(),
            ..Self::default()
        }
    }

    /// Restrict the report to an epoch-millisecond window.
    pub fn with_window(mut self, start_ms: i64, end_ms: i64) -> Self {
        self.start_ms = Some(start_ms);
        self.end_ms = Some(end_ms);
        self
    }

    /// Restrict the report to the given station MACs.
    pub fn with_macs(mut self, macs: Vec<String>) -> Self {
        self.macs = macs;
        self
    }

    /// Argument-shape checks. Runs before any network request.
    fn validate(&self) -> Result<(), Error> {
        if self.attrs.is_empty() {
            return Err(Error::Validation {
                message: "stat request must select at least one attribute".into(),
            });
        }
        for attr in &self.attrs {
            if !STAT_ATTRIBUTES.contains(&attr.as_str()) {
                return Err(Error::Validation {
                    message: format!(
                        "unsupported stat attribute {attr:?}: must be one of {STAT_ATTRIBUTES:?}"
                    ),
                });
            }
        }
        Ok(())
    }

    fn to_body(&self) -> Value {
        let mut body = json!({ "attrs": self.attrs });
        if let Some(start) = self.start_ms {
            body["start"] = json!(start);
        }
        if let Some(end) = self.end_ms {
            body["end"] = json!(end);
        }
        if !self.macs.is_empty() {
            body["macs"] = json!(self.macs);
        }
        body
    }
}

impl SessionClient {
    /// Fetch a historical stat report for a site.
    ///
    /// `POST /api/s/{site}/stat/report/{interval}.{element}`
    ///
    /// The request is validated locally first; a bad attribute set fails
    /// with [`Error::Validation`] and never reaches the controller.
    pub async fn get_site_stats(
        &self,
        site: &str,
        interval: Interval,
        element: ElementType,
        request: &StatRequest,
    ) -> Result<Value, Error> {
        request.validate()?;
        let path = format!("stat/report/{}.{}", interval.as_str(), element.as_str());
        let url = self.site_url(site, &path)?;
        debug!(
            site,
            interval = interval.as_str(),
            element = element.as_str(),
            "fetching stat report"
        );
        self.post_json("get site stats", url, &request.to_body())
            .await
    }

    // ── All-attribute convenience wrappers ───────────────────────────

    /// 5-minute site report with every attribute.
    pub async fn five_min_site_all_stats(
        &self,
        site: &str,
        window: Option<(i64, i64)>,
    ) -> Result<Value, Error> {
        self.all_stats(site, Interval::FiveMinutes, ElementType::Site, window)
            .await
    }

    /// 5-minute access-point report with every attribute.
    pub async fn five_min_ap_all_stats(
        &self,
        site: &str,
        window: Option<(i64, i64)>,
    ) -> Result<Value, Error> {
        self.all_stats(site, Interval::FiveMinutes, ElementType::Ap, window)
            .await
    }

    /// 5-minute per-client report with every attribute.
    pub async fn five_min_user_all_stats(
        &self,
        site: &str,
        window: Option<(i64, i64)>,
    ) -> Result<Value, Error> {
        self.all_stats(site, Interval::FiveMinutes, ElementType::User, window)
            .await
    }

    /// Hourly site report with every attribute.
    pub async fn hourly_site_all_stats(
        &self,
        site: &str,
        window: Option<(i64, i64)>,
    ) -> Result<Value, Error> {
        self.all_stats(site, Interval::Hourly, ElementType::Site, window)
            .await
    }

    /// Hourly access-point report with every attribute.
    pub async fn hourly_ap_all_stats(
        &self,
        site: &str,
        window: Option<(i64, i64)>,
    ) -> Result<Value, Error> {
        self.all_stats(site, Interval::Hourly, ElementType::Ap, window)
            .await
    }

    /// Hourly per-client report with every attribute.
    pub async fn hourly_user_all_stats(
        &self,
        site: &str,
        window: Option<(i64, i64)>,
    ) -> Result<Value, Error> {
        self.all_stats(site, Interval::Hourly, ElementType::User, window)
            .await
    }

    /// Daily site report with every attribute.
    pub async fn daily_site_all_stats(
        &self,
        site: &str,
        window: Option<(i64, i64)>,
    ) -> Result<Value, Error> {
        self.all_stats(site, Interval::Daily, ElementType::Site, window)
            .await
    }

    /// Daily access-point report with every attribute.
    pub async fn daily_ap_all_stats(
        &self,
        site: &str,
        window: Option<(i64, i64)>,
    ) -> Result<Value, Error> {
        self.all_stats(site, Interval::Daily, ElementType::Ap, window)
            .await
    }

    /// Daily per-client report with every attribute.
    pub async fn daily_user_all_stats(
        &self,
        site: &str,
        window: Option<(i64, i64)>,
    ) -> Result<Value, Error> {
        self.all_stats(site, Interval::Daily, ElementType::User, window)
            .await
    }

    async fn all_stats(
        &self,
        site: &str,
        interval: Interval,
        element: ElementType,
        window: Option<(i64, i64)>,
    ) -> Result<Value, Error> {
        let mut request = StatRequest::all_attributes();
        if let Some((start, end)) = window {
            request = request.with_window(start, end);
        }
        self.get_site_stats(site, interval, element, &request).await
    }
}

// ── Window helpers ────────────────────────────────────────────────────

/// `(start_ms, end_ms)` covering the last thirty minutes.
pub fn thirty_min_window() -> (i64, i64) {
    window_ending_now(Duration::minutes(30))
}

/// `(start_ms, end_ms)` covering the last hour.
pub fn one_hour_window() -> (i64, i64) {
    window_ending_now(Duration::hours(1))
}

fn window_ending_now(span: Duration) -> (i64, i64) {
    let now = Utc::now();
    // Second resolution, expressed in milliseconds (what the API expects).
    ((now - span).timestamp() * 1000, now.timestamp() * 1000)
}
