//! Command dispatch and handler modules.

mod resolve;
mod versions;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve {
            request,
            repo,
            state,
            json,
            budget_secs,
        } => resolve::exec(&request, &repo, state.as_deref(), json, budget_secs),
        Command::Versions {
            name,
            request,
            repo,
            json,
        } => versions::exec(&name, &request, &repo, json),
    }
}
