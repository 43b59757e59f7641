use clap::Parser;
use stockind::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
