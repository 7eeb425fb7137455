// ABOUTME: Main entry point for the reveal-deck program.
// ABOUTME: Provides CLI interface and runs the check, build, watch and serve sequence.

use anyhow::Context;
use clap::Parser;
use deck::{Config, DeckError};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Watch for template changes
    #[arg(long)]
    watch: bool,

    /// Host to bind (overrides the HOST environment variable)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides the PORT environment variable)
    #[arg(long)]
    port: Option<u16>,

    /// Project directory; also the directory served over HTTP
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Slide templates directory, relative to --dir
    #[arg(long, default_value = deck::config::DEFAULT_SLIDES_DIR)]
    slides_dir: PathBuf,

    /// Presentation framework submodule, relative to --dir
    #[arg(long, default_value = deck::config::DEFAULT_SUBMODULE_DIR)]
    submodule_dir: PathBuf,

    /// Templating tool to run with `build` and `watch`
    #[arg(long, default_value = deck::config::DEFAULT_TOOL)]
    tool: String,

    /// Exit with an error when the submodule is missing
    #[arg(long)]
    strict_submodule: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut config = Config::from_env_with(self.port, self.host)
            .context("Failed to read configuration")?;

        config.project_dir = self.dir;
        config.slides_dir = self.slides_dir;
        config.submodule_dir = self.submodule_dir;
        config.tool = self.tool;
        config.watch = self.watch;
        config.strict_submodule = self.strict_submodule;

        Ok(config)
    }
}

fn try_main(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_config()?;
    deck::run(&config)?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = try_main(cli) {
        match e.downcast_ref::<DeckError>() {
            // These already read as complete diagnostics
            Some(DeckError::ToolMissing { .. }) | Some(DeckError::SubmoduleMissing { .. }) => {
                eprintln!("{}", e);
            }
            _ => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }
}
