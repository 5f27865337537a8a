//! Handler for `dargo versions`.

use std::path::Path;

use miette::Result;

use dargo_core::errors::DargoError;
use dargo_core::repository::Repository;
use dargo_resolver::versions::resolve_version_set;

pub fn exec(name: &str, request: &str, repo_path: &Path, json: bool) -> Result<()> {
    let repo = Repository::from_path(repo_path)?;
    let set = resolve_version_set(&repo, name, request)?;

    if json {
        let rendered = serde_json::to_string_pretty(&set).map_err(|e| DargoError::Generic {
            message: format!("Failed to render version set: {e}"),
        })?;
        println!("{rendered}");
    } else if set.is_empty() {
        println!("No versions of {name} match {request}");
    } else {
        for (version, locator) in &set {
            println!("{version}  {locator}");
        }
    }
    Ok(())
}
