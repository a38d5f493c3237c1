use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use normreg_cli::commands;
use normreg_cli::{Identity, Outcome};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn identity_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("role")
            .long("role")
            .help("User role: admin or employee (omit for a user without a role)"),
    )
    .arg(
        Arg::new("rank")
            .long("rank")
            .help("Employee block rank, e.g. 3"),
    )
    .arg(
        Arg::new("department")
            .long("department")
            .help("Employee department"),
    )
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

fn identity(args: &ArgMatches) -> Identity {
    let get = |id: &str| args.try_get_one::<String>(id).ok().flatten().cloned();
    Identity {
        role: get("role"),
        rank: get("rank"),
        department: get("department"),
        name: get("name"),
        email: get("email"),
    }
}

fn cli() -> Command {
    Command::new("normreg")
        .version(normreg_cli::VERSION)
        .about("Register of standardization work items: blocks, access rules and codes")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Path to a TOML configuration file"),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("taxonomy")
                .about("Print the block taxonomy with titles")
                .arg(json_arg()),
        )
        .subcommand(identity_args(
            Command::new("blocks")
                .about("List the blocks a user can open")
                .arg(json_arg()),
        ))
        .subcommand(identity_args(
            Command::new("check-block")
                .about("Check whether a user may access a block")
                .arg(Arg::new("block").long("block").required(true).help("Block code")),
        ))
        .subcommand(identity_args(
            Command::new("check-department")
                .about("Check whether a user may access a department's records")
                .arg(
                    Arg::new("record-department")
                        .long("record-department")
                        .help("Department of the record (omit for none)"),
                ),
        ))
        .subcommand(
            Command::new("next-code")
                .about("Compute the next work-item code of a block")
                .arg(Arg::new("block").long("block").required(true).help("Block code"))
                .arg(
                    Arg::new("code")
                        .long("code")
                        .action(ArgAction::Append)
                        .help("Code already assigned in the block (repeatable)"),
                )
                .arg(json_arg()),
        )
        .subcommand(identity_args(
            Command::new("profile")
                .about("Print the session profile of a user")
                .arg(Arg::new("name").long("name").help("Display name"))
                .arg(Arg::new("email").long("email").help("E-mail")),
        ))
        .subcommand(Command::new("config").about("Print the effective configuration"))
}

fn run(matches: &ArgMatches) -> Result<Outcome> {
    let config_path = matches.get_one::<PathBuf>("config");
    let config = commands::load_config(config_path.map(PathBuf::as_path))?;
    tracing::debug!(page_size = config.page_size, "configuration ready");

    match matches.subcommand() {
        Some(("taxonomy", args)) => commands::taxonomy(args.get_flag("json")),
        Some(("blocks", args)) => commands::blocks(&identity(args), args.get_flag("json")),
        Some(("check-block", args)) => {
            let block = args.get_one::<String>("block").map_or("", String::as_str);
            commands::check_block(&identity(args), block)
        }
        Some(("check-department", args)) => {
            let department = args.get_one::<String>("record-department").map(String::as_str);
            commands::check_department(&identity(args), department)
        }
        Some(("next-code", args)) => {
            let block = args.get_one::<String>("block").map_or("", String::as_str);
            let codes: Vec<String> = args
                .get_many::<String>("code")
                .map(|values| values.cloned().collect())
                .unwrap_or_default();
            commands::next_code(block, &codes, args.get_flag("json"))
        }
        Some(("profile", args)) => commands::profile(&identity(args)),
        Some(("config", _)) => commands::show_config(&config),
        _ => anyhow::bail!("unknown command"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let outcome = run(&matches)?;

    println!("{}", outcome.output);
    std::process::exit(if outcome.success { 0 } else { 1 });
}
