use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use quill_core::Config;

use super::{add_root_arg, open_app};

pub fn make_subcommand() -> Command {
    add_root_arg(Command::new("config"))
        .about("Inspect or change the site configuration")
        .subcommand_required(true)
        .subcommand(Command::new("get").about("Print the merged configuration as YAML"))
        .subcommand(
            Command::new("edit")
                .about("Set one field and rebuild")
                .arg(Arg::new("field").value_name("GROUP").required(true))
                .arg(Arg::new("key").value_name("KEY").required(true))
                .arg(Arg::new("value").value_name("VALUE").required(true)),
        )
        .subcommand(
            Command::new("set")
                .about("Replace the whole configuration from a YAML file and rebuild")
                .arg(
                    Arg::new("file")
                        .short('f')
                        .long("file")
                        .value_name("FILE")
                        .required(true),
                ),
        )
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let mut app = open_app(args)?;

    match args.subcommand() {
        Some(("get", _)) => {
            print!("{}", serde_yaml::to_string(app.get_config())?);
        }
        Some(("edit", edit_args)) => {
            let field = edit_args.get_one::<String>("field").cloned().unwrap_or_default();
            let key = edit_args.get_one::<String>("key").cloned().unwrap_or_default();
            let value = edit_args.get_one::<String>("value").cloned().unwrap_or_default();
            app.edit_config(&field, &key, &value)?;
            println!("Set {}.{} and rebuilt", field, key);
        }
        Some(("set", set_args)) => {
            let path = set_args.get_one::<String>("file").cloned().unwrap_or_default();
            let data = std::fs::read_to_string(&path)?;
            let config: Config = serde_yaml::from_str(&data)?;
            app.set_config(config)?;
            println!("Replaced configuration from {} and rebuilt", path);
        }
        _ => unreachable!("subcommand required"),
    }

    Ok(())
}
