// ABOUTME: Library module for the reveal-deck program.
// ABOUTME: Checks the environment, renders the slides, optionally watches them and serves the result.

pub mod config;
pub mod errors;
pub mod html;
pub mod render;
pub mod server;
pub mod tools;
pub mod utils;
pub mod watch;

// Reexport common types and functions
pub use config::Config;
pub use errors::{DeckError, Result};
pub use render::build_presentations;
pub use server::{resolve_request, Reply, ShutdownHandle, SlideServer};
pub use tools::{check_tools, ToolCheck};
pub use watch::{spawn_watcher, WatchProcess};

use log::info;

/// Run the whole sequence: check tools, build once, optionally start the
/// watcher, then serve the project directory until interrupted.
pub fn run(config: &Config) -> Result<()> {
    let check = check_tools(config)?;
    info!(
        "Tool check passed (tool: {:?}, submodule found: {})",
        check.tool_path, check.submodule_found
    );

    build_presentations(config)?;

    // Kept for the lifetime of the server; dropping it would not stop the child anyway
    let _watcher = if config.watch {
        Some(spawn_watcher(config)?)
    } else {
        None
    };

    let server = SlideServer::bind(&config.host, config.port, &config.project_dir)?;
    server.serve_forever()
}
