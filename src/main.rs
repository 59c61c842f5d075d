use anyhow::Result;
use clap::Parser;

use porysync::cli::{Cli, Command};
use porysync::commands;
use porysync::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    if matches!(args.command, Command::Version) {
        commands::version::run();
        return Ok(());
    }

    let name = args.command.name();
    logging::init_subscriber(args.verbose, name);
    let log = Logger::new(name);
    log.debug(&format!("porysync {}", commands::version::version()));

    match &args.command {
        Command::Extract(opts) => commands::extract::run(&args.global, opts, &log),
        Command::Build(opts) => commands::build::run(&args.global, opts, &log),
        Command::Restore => commands::restore::run(&args.global, &log),
        Command::Status => commands::status::run(&args.global, &log),
        Command::Show(opts) => commands::show::run(&args.global, opts, &log),
        Command::Set(opts) => commands::set::run(&args.global, opts, &log),
        Command::Version => Ok(()),
    }
}
