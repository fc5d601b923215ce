use clap::Parser;
use colored::Colorize;

use tracklog::cli::args::{Cli, Commands, TuiArgs};
use tracklog::cli::commands;
use tracklog::config::{Config, Paths};
use tracklog::error::TrackerError;
use tracklog::logging;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<(), TrackerError> {
    let cli = Cli::parse();
    let paths = match cli.home {
        Some(root) => Paths::with_root(root),
        None => Paths::new()?,
    };
    let config = Config::load_from_path(&paths.config_file)?;
    config.general.color.apply();

    let _guard = logging::init(&paths.logs)?;
    let format = cli.output.unwrap_or(config.general.default_output);

    let output = match cli.command {
        None => {
            tracklog::tui::run(&TuiArgs::default(), &config, &paths)?;
            String::new()
        }
        Some(Commands::Tui(args)) => {
            tracklog::tui::run(&args, &config, &paths)?;
            String::new()
        }
        Some(Commands::Script(args)) => commands::script(&args, &config, &paths, format)?,
        Some(Commands::Config(args)) => commands::config(&args.command, &config, &paths, format)?,
        Some(Commands::Completions { shell }) => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
