use clap::Parser;
use git_taskflow::commands::{get_full_config_flow, run_menu, start_session};
use git_taskflow::core::{
    dirs::{get_default_config_file, get_logs_directory},
    install_interrupt_handler, print_error, print_info, print_warning, OperationLogger, Result,
    Session, Settings, ShellRunner, StdinPrompter, TaskflowError,
};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-taskflow")]
#[command(about = "Interactive assistant for a base/feature git branching workflow")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Configuration file to read instead of the default one
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn run(cli: Cli, logger: &OperationLogger) -> Result<()> {
    let settings = Settings::from_env();
    if settings.uses_default_passphrase {
        print_warning("PASS_SENSITIVE is not set, the default passphrase is in use.");
        logger.log_warning("Default passphrase in use", "startup");
    }

    let config_path = cli.config.unwrap_or_else(get_default_config_file);
    let prompter = StdinPrompter;
    let config = get_full_config_flow(&config_path, &settings, &prompter)?;

    let runner = ShellRunner::new(config.repo_path.clone(), logger);
    let session = Session::new(&config, &settings, &runner, logger, &prompter)?;

    start_session(&session)?;
    run_menu(&session)
}

fn main() {
    let cli = Cli::parse();

    // Configure logging based on --debug flag
    if cli.debug {
        env::set_var("RUST_LOG", "debug");
    } else {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    if let Err(e) = install_interrupt_handler() {
        log::warn!("Ctrl-C handler not installed: {e}");
    }

    let logger = match OperationLogger::new(get_logs_directory()) {
        Ok(logger) => logger,
        Err(e) => {
            print_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let code = match run(cli, &logger) {
        Ok(()) => 0,
        Err(TaskflowError::Interrupted) => {
            print_info("Operation cancelled.");
            0
        }
        Err(e) => {
            print_error(&e.to_string());
            e.exit_code()
        }
    };

    logger.log_program_end();
    std::process::exit(code);
}
