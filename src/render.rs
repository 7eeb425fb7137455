// ABOUTME: Build module for the reveal-deck application
// ABOUTME: Renders slide templates to static HTML by running the templating tool once

use crate::config::Config;
use crate::errors::{DeckError, Result};
use crate::tools;
use crate::utils;
use log::{debug, info};
use std::process::{Command, Stdio};

/// Render the slide templates by running `<tool> build` inside the slides directory.
///
/// The tool runs with the slides directory as *its* working directory; the
/// current process never changes directory, so the caller's working directory
/// is the same afterwards whether the build succeeds or fails.
pub fn build_presentations(config: &Config) -> Result<()> {
    let slides = config.slides_path();
    println!("Building presentation for {}", config.slides_dir.display());

    utils::validate_directory_exists(&slides)?;

    debug!("Running {} build in {:?}", config.tool, slides);
    let output = Command::new(tools::resolve_program(config))
        .arg("build")
        .current_dir(&slides)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| DeckError::Spawn {
            program: config.tool.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(DeckError::BuildFailed {
            program: config.tool.clone(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    info!("Presentation built in {:?}", slides);
    Ok(())
}
