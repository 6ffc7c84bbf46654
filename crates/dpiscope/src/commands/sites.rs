//! Site listing command handler.

use dpiscope_api::SessionClient;

use crate::error::CliError;

use super::util;

pub async fn handle(client: &SessionClient) -> Result<(), CliError> {
    let sites = client.list_sites().await?;
    util::print_json(&sites)
}
