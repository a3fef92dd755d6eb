//! Command dispatch: bridges CLI args -> controller calls -> output formatting.

pub mod config_cmd;
pub mod control;
pub mod results;
pub mod status;
pub mod watch;

use patrol_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    page_size: usize,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(controller, global).await,
        Command::Start => control::start(controller, global).await,
        Command::Stop => control::stop(controller, global).await,
        Command::Interval(args) => control::interval(controller, &args, global).await,
        Command::Results(args) => results::handle(controller, &args, page_size, global).await,
        Command::Watch(args) => watch::handle(controller, &args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need the patrol service".into(),
        )),
    }
}
