//! DPI statistics command handler.
//!
//! By default this resolves category and application names by extracting
//! the console's name maps, then annotates each stat entry in place.
//! `--raw` skips the asset fetch entirely; `--by-cat` responses carry no
//! application ids, so they are printed raw as well.

use dpiscope_api::{DpiGroupBy, SessionClient, TrafficMapExtractor, TransportConfig, enrich_dpi_stats};

use crate::cli::{DpiArgs, GlobalOpts};
use crate::error::CliError;

use super::util;

pub async fn handle(
    client: &SessionClient,
    transport: &TransportConfig,
    args: DpiArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let group_by = if args.by_cat {
        DpiGroupBy::ByCat
    } else {
        DpiGroupBy::ByApp
    };
    let cats = (!args.cats.is_empty()).then_some(args.cats.as_slice());

    let mut stats = if args.site_wide {
        client.get_site_dpi(&global.site, group_by, cats).await?
    } else {
        let macs = (!args.macs.is_empty()).then_some(args.macs.as_slice());
        client
            .get_station_dpi(&global.site, group_by, macs, cats)
            .await?
    };

    if !args.raw && group_by == DpiGroupBy::ByApp {
        let mut extractor = TrafficMapExtractor::new(client.base_url().clone(), transport)?;
        if let Some(build_id) = args.build_id {
            extractor = extractor.with_build_id(build_id);
        }
        let (categories, applications) = extractor.fetch_maps().await?;
        enrich_dpi_stats(&mut stats, &categories, &applications);
    }

    util::print_json(&stats)
}
