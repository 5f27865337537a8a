//! Handler for `dargo resolve`.

use std::path::Path;
use std::time::Duration;

use miette::Result;

use dargo_core::errors::DargoError;
use dargo_core::repository::Repository;
use dargo_core::request::InstallRequest;
use dargo_core::state::InstalledState;
use dargo_resolver::resolve::{resolve_request_with_budget, Resolution, DEFAULT_SEARCH_BUDGET};

pub fn exec(
    token: &str,
    repo_path: &Path,
    state_path: Option<&Path>,
    json: bool,
    budget_secs: Option<u64>,
) -> Result<()> {
    let repo = Repository::from_path(repo_path)?;
    let state = match state_path {
        Some(path) => InstalledState::from_path(path)?,
        None => InstalledState::new(),
    };
    let request = InstallRequest::parse(token)?;
    let budget = budget_secs
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_SEARCH_BUDGET);

    let resolution = resolve_request_with_budget(&request, &repo, &state, budget);

    if json {
        let rendered = serde_json::to_string_pretty(&resolution).map_err(|e| {
            DargoError::Generic {
                message: format!("Failed to render resolution: {e}"),
            }
        })?;
        println!("{rendered}");
    } else {
        match &resolution {
            Resolution::Resolved(plan) => {
                println!("Resolved {request}:");
                for (name, version) in &plan.assignment {
                    println!("  {name} {version}");
                }
            }
            Resolution::Unresolved(failure) => {
                eprintln!("Could not resolve {request}:");
                eprintln!("{}", failure.message);
            }
        }
    }

    if !resolution.is_resolved() {
        std::process::exit(1);
    }
    Ok(())
}
