use std::{path::PathBuf, process};

use clap::{error::ErrorKind, CommandFactory, Parser};
#[macro_use]
extern crate log;

/// Get the version returned by `git describe`, e.g.:
/// - `v2.0` if a git tag
/// - the commit hash `034ac04` if not a tag
/// - `034ac04-dirty` if uncommited changes are present,
/// or the crate version if not available (if installed from crates.io).
///
/// See `build.rs` file for more info.
fn version() -> &'static str {
    option_env!("CARGO_GIT_VERSION")
        .or(option_env!("CARGO_PKG_VERSION"))
        .unwrap_or("unknown")
}

/// Remove `console.log`, `console.warn`, `console.error`, `console.info` and
/// `console.debug` statements from a file, overwriting it in place.
///
/// Runs of blank lines left behind are collapsed into a single blank line.
/// No backup of the original file is made.
#[derive(Parser)]
#[command(version = crate::version())]
struct Args {
    /// The file to rewrite.
    file_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // Use info level by default, load overrides from `RUST_LOG` env variable.
    // See https://docs.rs/env_logger/latest/env_logger/index.html#example
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init()?;

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            debug!("Invalid arguments: {}", e);
            println!("{}", Args::command().render_usage());
            process::exit(1);
        }
    };

    debug!("{} {}", Args::command().get_name(), version());

    let path = &args.file_path;
    match console_strip::rewrite_file(path) {
        Ok(stripped) => {
            info!(
                "Removed {} console statements from {:?}",
                stripped.removed.len(),
                path
            );
            if !stripped.kept.is_empty() {
                info!(
                    "Left {} console calls in place, see warnings above",
                    stripped.kept.len()
                );
            }
            println!(
                "Successfully removed console logging statements from {}",
                path.display()
            );
            Ok(())
        }
        Err(e) => {
            let e = anyhow::Error::from(e);
            println!("Error processing file: {:#}", e);
            process::exit(1);
        }
    }
}
