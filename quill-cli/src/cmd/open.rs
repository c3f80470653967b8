use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use quill_server::{ButlerServer, ButlerServerConfig};
use std::path::PathBuf;

use super::add_root_arg;

pub fn make_subcommand() -> Command {
    add_root_arg(Command::new("open"))
        .about("Serve the butler endpoint, the dashboard, and the site")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to serve on")
                .default_value("8060"),
        )
        .arg(
            Arg::new("dashboard")
                .short('d')
                .long("dashboard")
                .help("Open the admin dashboard in a browser")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("view")
                .short('v')
                .long("view")
                .help("Open the generated site in a browser")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("server")
                .long("server")
                .help("Bind on all interfaces instead of localhost")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Let butler failures carry error detail (local diagnostics only)")
                .action(ArgAction::SetTrue),
        )
}

pub async fn execute(args: &ArgMatches) -> Result<()> {
    let root = args
        .get_one::<String>("root")
        .map(String::as_str)
        .unwrap_or(".");
    let port: u16 = args
        .get_one::<String>("port")
        .map(String::as_str)
        .unwrap_or("8060")
        .parse()?;

    let host = if args.get_flag("server") {
        "0.0.0.0"
    } else {
        "127.0.0.1"
    };

    let config = ButlerServerConfig {
        host: host.to_string(),
        port,
        root: PathBuf::from(root),
        debug: args.get_flag("debug"),
        open_dashboard: args.get_flag("dashboard"),
        open_site: args.get_flag("view"),
    };

    ButlerServer::new(config).run().await
}
