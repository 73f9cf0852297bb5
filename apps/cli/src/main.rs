//! disclose CLI: progressive-disclosure refactoring for skill documents.
//!
//! Rewrites long `SKILL.md` files into a concise primary document and moves
//! detail into a `references/` directory next to it.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
