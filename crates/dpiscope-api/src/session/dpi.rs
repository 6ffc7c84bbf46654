// Deep packet inspection stat endpoints.
//
// Both endpoints are POSTs whose body carries a `type` discriminator
// selecting the grouping mode. Filter lists are optional and omitted from
// the body entirely when empty; the controller treats a missing filter as
// "everything".

use serde_json::{Value, json};
use tracing::debug;

use crate::error::Error;
use crate::session::SessionClient;

/// Grouping mode for DPI stat queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DpiGroupBy {
    /// One row per application.
    ByApp,
    /// One row per traffic category.
    ByCat,
}

impl DpiGroupBy {
    /// Wire value of the `type` discriminator.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ByApp => "by_app",
            Self::ByCat => "by_cat",
        }
    }
}

impl SessionClient {
    /// Fetch site-wide DPI stats.
    ///
    /// `POST /api/s/{site}/stat/sitedpi`
    ///
    /// `cats` narrows per-app results to the given category ids. By-category
    /// queries take no filter, so it is only sent for [`DpiGroupBy::ByApp`]
    /// -- where the controller has been observed to ignore it anyway.
    pub async fn get_site_dpi(
        &self,
        site: &str,
        group_by: DpiGroupBy,
        cats: Option<&[u32]>,
    ) -> Result<Value, Error> {
        let url = self.site_url(site, "stat/sitedpi")?;
        debug!(site, group_by = group_by.as_str(), "fetching site dpi");
        let body = dpi_body(group_by, None, cats);
        self.post_json("get site dpi", url, &body).await
    }

    /// Fetch per-station DPI stats.
    ///
    /// `POST /api/s/{site}/stat/stadpi`
    ///
    /// `macs` narrows the result to the given stations; with no filter the
    /// controller returns every station it has DPI data for. `cats` behaves
    /// as in [`Self::get_site_dpi`].
    pub async fn get_station_dpi(
        &self,
        site: &str,
        group_by: DpiGroupBy,
        macs: Option<&[String]>,
        cats: Option<&[u32]>,
    ) -> Result<Value, Error> {
        let url = self.site_url(site, "stat/stadpi")?;
        debug!(site, group_by = group_by.as_str(), "fetching station dpi");
        let body = dpi_body(group_by, macs, cats);
        self.post_json("get station dpi", url, &body).await
    }
}

fn dpi_body(group_by: DpiGroupBy, macs: Option<&[String]>, cats: Option<&[u32]>) -> Value {
    let mut body = json!({ "type": group_by.as_str() });
    match macs {
        Some(macs) if !macs.is_empty() => body["macs"] = json!(macs),
        _ => {}
    }
    if group_by == DpiGroupBy::ByApp {
        match cats {
            Some(cats) if !cats.is_empty() => body["cats"] = json!(cats),
            _ => {}
        }
    }
    body
}
