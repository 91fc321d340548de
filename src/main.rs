use anyhow::{Context, Result};
use clap::Parser;
use typescript_build::{
    build,
    cli::Cli,
    command::{ExecutionEnvironment, TscRunner},
    error::Error,
};

fn run(cli: &Cli) -> Result<()> {
    let working_directory =
        std::env::current_dir().context("Unable to determine the working directory")?;
    let invocation = cli.invocation();
    let runner = TscRunner::new(ExecutionEnvironment::detect(&working_directory));
    build::run(&invocation, &working_directory, &runner)?;
    Ok(())
}

fn print_block(name: &str, content: &str) {
    if content.trim().is_empty() {
        return;
    }
    eprintln!("--- {} [START] ---", name);
    eprintln!("{}", content.trim_end());
    eprintln!("--- {} [END] ---", name);
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = cli.log_config().init() {
        eprintln!("Warning: logging settings ignored: {}", err);
    }

    if let Err(err) = run(&cli) {
        eprintln!("Error: {:?}", err);
        let build_error = err.downcast_ref::<Error>();
        if let Some((stdout, stderr)) = build_error.and_then(Error::captured_output) {
            print_block("STDERR", stderr);
            print_block("STDOUT", stdout);
        }
        std::process::exit(build_error.map_or(1, Error::exit_code));
    }
}
