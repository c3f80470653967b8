use anyhow::Result;
use clap::{ArgMatches, Command};

use super::{add_root_arg, open_app};

pub fn make_subcommand() -> Command {
    add_root_arg(Command::new("init"))
        .about("Scaffold storage, default templates, and the first build")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let mut app = open_app(args)?;
    app.init()?;

    println!("Initialized blog in {}", app.site_dir().display());

    Ok(())
}
