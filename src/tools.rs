// ABOUTME: Environment check for the reveal-deck application
// ABOUTME: Verifies the templating tool is installed and the presentation submodule is checked out

use crate::config::Config;
use crate::errors::{DeckError, Result};
use crate::utils;
use log::{info, warn};
use std::env;
use std::path::PathBuf;

/// Outcome of a successful tool check
#[derive(Debug, Clone)]
pub struct ToolCheck {
    /// Where the templating executable was found
    pub tool_path: PathBuf,
    /// Whether the submodule manifest was present
    pub submodule_found: bool,
}

/// Check that the templating tool and the presentation submodule are available.
///
/// A missing tool is always an error. A missing submodule is reported on
/// stderr and only becomes an error when `config.strict_submodule` is set;
/// otherwise the check succeeds with `submodule_found == false`.
pub fn check_tools(config: &Config) -> Result<ToolCheck> {
    let tool_path = utils::find_executable(&config.tool).ok_or_else(|| DeckError::ToolMissing {
        tool: config.tool.clone(),
    })?;
    info!("Using {} at {:?}", config.tool, tool_path);

    let submodule_found = check_submodule(config)?;

    Ok(ToolCheck {
        tool_path,
        submodule_found,
    })
}

/// Probe the submodule manifest; returns whether it exists
fn check_submodule(config: &Config) -> Result<bool> {
    let manifest = config.manifest_path();
    if manifest.exists() {
        return Ok(true);
    }

    let err = DeckError::SubmoduleMissing {
        submodule: config.submodule_name(),
        manifest,
    };
    if config.strict_submodule {
        return Err(err);
    }

    // Reported but not fatal: the deck still builds, it just renders without the framework
    eprintln!("{}", err);
    warn!(
        "Continuing without {}; pass --strict-submodule to make this fatal",
        config.submodule_name()
    );
    Ok(false)
}

/// Path used to launch the tool from another working directory.
///
/// Relative names such as `./bin/staticjinja` are made absolute first, since
/// they would otherwise be looked up relative to the child's directory.
/// Symlinks are left alone so launchers that dispatch on argv[0] keep working.
pub fn resolve_program(config: &Config) -> PathBuf {
    match utils::find_executable(&config.tool) {
        Some(found) if found.is_absolute() => found,
        Some(found) => match env::current_dir() {
            Ok(cwd) => cwd.join(found),
            Err(_) => found,
        },
        None => PathBuf::from(&config.tool),
    }
}
