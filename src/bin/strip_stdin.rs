//! Apply console statement removal to stdin, and write it to stdout.
//!
//! This is meant for testing and debugging; no file is modified.
//!
//! Usage:
//!     strip_stdin < app.js > stripped.js
use std::io::{stdin, stdout, Read, Write};

use console_strip::strip::strip;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init()?;

    let mut input = String::new();
    stdin().read_to_string(&mut input)?;

    let output = strip(&input);

    stdout().write_all(output.as_bytes())?;

    Ok(())
}
