//! Command dispatch: bridges CLI args to API calls and output printing.

pub mod clients;
pub mod ddns;
pub mod devices;
pub mod dpi;
pub mod sites;
pub mod stats;
pub mod util;

use dpiscope_api::{SessionClient, TransportConfig};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command to the appropriate handler. The session is already
/// established; the transport config is forwarded for the commands that
/// make unauthenticated fetches of their own.
pub async fn dispatch(
    cmd: Command,
    client: &SessionClient,
    transport: &TransportConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Sites => sites::handle(client).await,
        Command::Devices => devices::handle(client, global).await,
        Command::Clients(args) => clients::handle(client, args, global).await,
        Command::Ddns => ddns::handle(client, global).await,
        Command::Stats(args) => stats::handle(client, args, global).await,
        Command::Dpi(args) => dpi::handle(client, transport, args, global).await,
    }
}
