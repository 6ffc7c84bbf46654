//! Dynamic DNS command handler.

use dpiscope_api::SessionClient;

use crate::cli::GlobalOpts;
use crate::error::CliError;

use super::util;

pub async fn handle(client: &SessionClient, global: &GlobalOpts) -> Result<(), CliError> {
    let info = client.get_ddns_info(&global.site).await?;
    util::print_json(&info)
}
