//! Stat report command handler.

use dpiscope_api::session::{one_hour_window, thirty_min_window};
use dpiscope_api::{SessionClient, StatRequest};

use crate::cli::{GlobalOpts, StatsArgs};
use crate::error::CliError;

use super::util;

pub async fn handle(
    client: &SessionClient,
    args: StatsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut request = if args.attrs.is_empty() {
        StatRequest::all_attributes()
    } else {
        StatRequest {
            attrs: args.attrs,
            ..StatRequest::default()
        }
    };

    if args.last_30m {
        let (start, end) = thirty_min_window();
        request = request.with_window(start, end);
    } else if args.last_1h {
        let (start, end) = one_hour_window();
        request = request.with_window(start, end);
    }
    if !args.macs.is_empty() {
        request = request.with_macs(args.macs);
    }

    let report = client
        .get_site_stats(
            &global.site,
            args.interval.into(),
            args.element.into(),
            &request,
        )
        .await?;
    util::print_json(&report)
}
