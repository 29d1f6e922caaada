pub mod cli;
pub mod log;
pub mod prng;

use std::io::Write;

use miette::{Context, IntoDiagnostic};

/// ANSI clear plus cursor home, used between explorer redraws.
pub fn clear_screen() -> miette::Result<()> {
    print!("\x1b[2J\x1b[1H");
    std::io::stdout()
        .flush()
        .into_diagnostic()
        .context("flushing stdout after screen clear")
}
