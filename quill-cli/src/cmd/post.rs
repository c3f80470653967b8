use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};

use super::{add_root_arg, open_app};

pub fn make_subcommand() -> Command {
    add_root_arg(Command::new("post"))
        .about("Publish a post and rebuild the site")
        .arg(
            Arg::new("title")
                .value_name("TITLE")
                .required(true)
                .help("Post title, also the source of its link"),
        )
        .arg(
            Arg::new("text")
                .value_name("TEXT")
                .required(true)
                .help("Pre-rendered body content"),
        )
        .arg(
            Arg::new("category")
                .short('c')
                .long("category")
                .value_name("NAME")
                .action(ArgAction::Append)
                .help("Category tag, repeatable"),
        )
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let title = args.get_one::<String>("title").cloned().unwrap_or_default();
    let text = args.get_one::<String>("text").cloned().unwrap_or_default();
    let categories: Vec<String> = args
        .get_many::<String>("category")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let mut app = open_app(args)?;
    app.post(&title, &text, categories)?;

    println!("Published \"{}\"", title);

    Ok(())
}
