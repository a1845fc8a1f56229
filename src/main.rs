//! Main entry point for diffst CLI

use clap::Parser;
use diffst::cli::Cli;
use diffst::commands::execute_command;
use diffst::sql::load_env_file;
use diffst::testcase::ENV_ROOT;

fn main() {
    // .env may supply _DIFFST_TC_DIR, so load it before parsing arguments
    if let Err(e) = load_env_file() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    // Parse command line arguments
    let cli = Cli::parse();

    let level = if std::env::var_os(format!("{}TRACE", ENV_ROOT)).is_some() {
        log::LevelFilter::Trace
    } else if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Initialize logging; RUST_LOG still refines the default level
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = execute_command(cli.command, cli.tc_dir.as_deref()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
