use anyhow::Result;
use clap::Command;

mod cmd;

fn main() -> Result<()> {
    let matches = Command::new("quill")
        .about("File-backed blog generator with a butler admin endpoint")
        .version(quill_core::VERSION)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(cmd::init::make_subcommand())
        .subcommand(cmd::build::make_subcommand())
        .subcommand(cmd::post::make_subcommand())
        .subcommand(cmd::config::make_subcommand())
        .subcommand(cmd::analytics::make_subcommand())
        .subcommand(cmd::open::make_subcommand())
        .subcommand(cmd::clear::make_subcommand())
        .get_matches();

    match matches.subcommand() {
        Some(("init", args)) => cmd::init::execute(args),
        Some(("build", args)) => cmd::build::execute(args),
        Some(("post", args)) => cmd::post::execute(args),
        Some(("config", args)) => cmd::config::execute(args),
        Some(("analytics", args)) => cmd::analytics::execute(args),
        Some(("open", args)) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(cmd::open::execute(args))
        }
        Some(("clear", args)) => cmd::clear::execute(args),
        _ => unreachable!("subcommand required"),
    }
}
