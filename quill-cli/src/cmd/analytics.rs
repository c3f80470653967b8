use anyhow::Result;
use clap::{ArgMatches, Command};

use super::{add_root_arg, open_app};

pub fn make_subcommand() -> Command {
    add_root_arg(Command::new("analytics")).about("Print recorded operational metrics")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let app = open_app(args)?;

    if app.get_analytics().is_empty() {
        println!("No metrics recorded yet");
        return Ok(());
    }

    for (key, value) in app.get_analytics() {
        println!("{}: {}", key, value);
    }

    Ok(())
}
