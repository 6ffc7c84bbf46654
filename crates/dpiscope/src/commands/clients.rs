//! Client (station) listing command handler.

use dpiscope_api::SessionClient;

use crate::cli::{ClientsArgs, GlobalOpts};
use crate::error::CliError;

use super::util;

pub async fn handle(
    client: &SessionClient,
    args: ClientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let stations = if args.known {
        client.list_known_clients(&global.site).await?
    } else {
        client.list_active_clients(&global.site).await?
    };
    util::print_json(&stations)
}
