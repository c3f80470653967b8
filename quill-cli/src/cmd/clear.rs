use anyhow::Result;
use clap::{ArgMatches, Command};

use super::{add_root_arg, open_app};

pub fn make_subcommand() -> Command {
    add_root_arg(Command::new("clear"))
        .about("Delete the generated site, the stores, and the build assets")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let mut app = open_app(args)?;
    app.clear()?;

    println!("Cleared all persisted state");

    Ok(())
}
