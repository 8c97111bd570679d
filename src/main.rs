use clap::Parser;
use git_autobackup::cli::Cli;
use git_autobackup::error::{EXIT_COMMITTED, EXIT_FAILURE, EXIT_NO_CHANGES, Error};
use git_autobackup::logging::init::{flush_logs, init_tracing, init_tracing_with_file};
use git_autobackup::run;

fn main() {
    let cli = Cli::parse();

    let result = match &cli.log_dir {
        Some(dir) => init_tracing_with_file(dir, cli.verbosity()),
        None => init_tracing(cli.verbosity()),
    }
    .and_then(|()| run(&cli));

    let code = match result {
        Ok(true) => EXIT_COMMITTED,
        Ok(false) => EXIT_NO_CHANGES,
        Err(err) => {
            eprintln!("error: {err:#}");
            err.downcast_ref::<Error>()
                .map_or(EXIT_FAILURE, Error::exit_code)
        }
    };

    flush_logs();
    std::process::exit(code);
}
