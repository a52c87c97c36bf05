//! Templater: render a folder of templates into a target folder.
//!
//! # Usage
//!
//! ```text
//! templater [--config <path>] [--verbose] [--dry-run]
//! ```

mod commands;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use commands::render::RenderArgs;

const CONFIG_HELP: &str = r#"Example config.json file:
  {
    "sourceFolder": "source",  // folder scanned for .ftl files; absolute or relative to the config file
    "targetFolder": "target",  // folder processed files are left in; absolute or relative to the config file
    "parameters": {            // values to interpolate; flat strings only, no nested objects
      "param1": "value1",
      "param2": "value2"
    }
  }

A file named `${param1}-notes.md.ftl` is written as `value1-notes.md` with every
`${name}` in its content replaced. Files without the .ftl suffix are copied as-is."#;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "templater",
    version,
    about = "Render a template folder into a target folder",
    long_about = None,
    after_help = CONFIG_HELP,
)]
struct Cli {
    #[command(flatten)]
    render: RenderArgs,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.render.verbose;
    init_tracing(verbose);

    match cli.render.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if verbose {
                eprintln!("{} {err:?}", "error:".red().bold());
            } else {
                eprintln!("{} {err:#}", "error:".red().bold());
            }
            ExitCode::FAILURE
        }
    }
}
