use clap::Parser;
use trendtrader::cli::{run, Cli};
use trendtrader::logging;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_json);
    run(cli)
}
