pub mod analytics;
pub mod build;
pub mod clear;
pub mod config;
pub mod init;
pub mod open;
pub mod post;

use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use quill_core::Quill;

/// Every subcommand operates on one working directory, `.` by default.
pub fn add_root_arg(command: Command) -> Command {
    command.arg(
        Arg::new("root")
            .short('r')
            .long("root")
            .value_name("DIR")
            .help("Working directory holding storage/, assets/ and site/")
            .default_value("."),
    )
}

pub fn open_app(args: &ArgMatches) -> Result<Quill> {
    let root = args
        .get_one::<String>("root")
        .map(String::as_str)
        .unwrap_or(".");
    Ok(Quill::open(root)?)
}
