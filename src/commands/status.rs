use crate::core::{
    logger::LogStatus, print_info, print_section_header, LogRecord, OperationLogger, Result,
    Session,
};
use colored::*;

/// `git status` of the configured repository
pub fn show_repository_status(session: &Session) -> Result<()> {
    print_section_header("Repository status");
    session.git("git status")?;
    Ok(())
}

/// Prints today's operation log, colouring each record by its status
pub fn view_today_logs(logger: &OperationLogger) -> Result<()> {
    let Some(content) = logger.read_today_log()? else {
        print_info("Nothing has been logged today.");
        return Ok(());
    };

    print_section_header(&format!("Log: {}", logger.today_log_path().display()));
    for line in content.lines() {
        println!("{}", colorize_log_line(line));
    }

    logger.log_operation("VIEW_LOGS", "Today's log viewed", LogStatus::Info);
    Ok(())
}

fn colorize_log_line(line: &str) -> ColoredString {
    match LogRecord::parse(line).map(|record| record.status) {
        Some(LogStatus::Success) => line.green(),
        Some(LogStatus::Warning) => line.yellow(),
        Some(LogStatus::Error) => line.red(),
        Some(LogStatus::Info) => line.normal(),
        None => line.bright_black(),
    }
}
