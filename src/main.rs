use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use colored::Colorize;
use modgen::{config::Config, generator::CommandGenerator, ModgenError};
use std::path::{Path, PathBuf};

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("root")
                .short('C')
                .long("root")
                .help("Project root to scaffold into")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value(".")
                .global(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a modgen.toml (default: <root>/modgen.toml)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(
            Command::new("module")
                .about("Make a new module")
                .arg(Arg::new("name").help("module name, e.g. Billing").required(true))
                .arg(
                    Arg::new("path")
                        .long("path")
                        .help("directory modules are created in")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("repo")
                .about("Make a new repository with all of necessary elements")
                .arg(Arg::new("name").help("repository name, e.g. Invoice").required(true))
                .arg(
                    Arg::new("all")
                        .long("all")
                        .help("also generate migration, controller, request and resource")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("module")
                        .long("module")
                        .help("existing module to place the repository in"),
                ),
        )
        .subcommand_required(true)
        .get_matches();

    init_logger(matches.get_flag("verbose"));

    let root = matches
        .get_one::<PathBuf>("root")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::load(&root, matches.get_one::<PathBuf>("config").map(PathBuf::as_path))
        .map_err(ModgenError::from)?;

    match matches.subcommand() {
        Some(("module", args)) => handle_module(args, &root, &config),
        Some(("repo", args)) => handle_repo(args, &root, &config),
        _ => unreachable!(),
    }
}

fn init_logger(is_verbose: bool) {
    let default_filter = if is_verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn handle_module(args: &ArgMatches, root: &Path, config: &Config) -> miette::Result<()> {
    let name = args.get_one::<String>("name").expect("name required");
    let path = args.get_one::<PathBuf>("path").map(PathBuf::as_path);

    let report = modgen::make_module(root, config, name, path).inspect_err(print_partial)?;

    report.print();
    println!("{}", "Create modules successful!".green());

    Ok(())
}

fn handle_repo(args: &ArgMatches, root: &Path, config: &Config) -> miette::Result<()> {
    let name = args.get_one::<String>("name").expect("name required");
    let module = args.get_one::<String>("module").map(String::as_str);
    let all = args.get_flag("all");

    let generator = CommandGenerator::new(&config.generator, root);

    let report =
        modgen::make_repo(root, config, name, all, module, &generator).inspect_err(print_partial)?;

    report.print();
    println!("{}", "Create repo successful!".green());

    Ok(())
}

// list what was written before the failure
fn print_partial(error: &ModgenError) {
    if let Some(report) = error.report() {
        report.print();
    }
}
