use anyhow::Result;
use clap::{ArgMatches, Command};

use super::{add_root_arg, open_app};

pub fn make_subcommand() -> Command {
    add_root_arg(Command::new("build")).about("Regenerate the site tree from the stores")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let mut app = open_app(args)?;
    app.build()?;

    let speed = app.get_analytics().get("build_speed").copied().unwrap_or(0);
    println!(
        "Site built in {:.1}ms at {}",
        speed as f64 / 1_000_000.0,
        app.site_dir().display()
    );

    Ok(())
}
