// ABOUTME: Watch module for re-rendering slides when templates change
// ABOUTME: Starts the templating tool's own watcher as a detached background process

use crate::config::Config;
use crate::errors::{DeckError, Result};
use crate::tools;
use crate::utils;
use log::info;
use std::process::{Child, Command, Stdio};

/// Handle to a background watcher.
///
/// The watcher is fire-and-forget: dropping this value does not stop the
/// child, and nothing in this crate waits on or kills it. Stop it externally,
/// for example by terminating the process group.
#[derive(Debug)]
pub struct WatchProcess {
    child: Child,
}

impl WatchProcess {
    /// OS process id of the watcher
    pub fn id(&self) -> u32 {
        self.child.id()
    }
}

/// Launch `<tool> watch` in the slides directory with all output discarded
pub fn spawn_watcher(config: &Config) -> Result<WatchProcess> {
    let slides = config.slides_path();
    println!(
        "\x1b[32mStaticjinja watch for {}\x1b[0m",
        config.slides_dir.display()
    );

    utils::validate_directory_exists(&slides)?;

    let child = Command::new(tools::resolve_program(config))
        .arg("watch")
        .current_dir(&slides)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| DeckError::Spawn {
            program: config.tool.clone(),
            source,
        })?;

    info!("{} watch running as pid {}", config.tool, child.id());
    Ok(WatchProcess { child })
}
