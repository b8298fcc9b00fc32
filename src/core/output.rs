//! Leveled terminal output for consistent CLI presentation.
//!
//! Every coordinator reports through these printers so that errors, warnings,
//! successes and plain information always look the same.
//!
//! # Color Scheme
//! - **Error**: red prefix
//! - **Warning**: yellow prefix
//! - **Success**: green checkmark
//! - **Info**: cyan prefix
//! - **Commands**: bright_black, shown before each git invocation

use colored::*;

/// Prints an error message
///
/// # Format
/// ```text
/// ✕ Error: <message>
/// ```
pub fn print_error(message: &str) {
    println!("{} {}", "✕ Error:".red(), message.white());
}

/// Prints a warning message
///
/// # Format
/// ```text
/// ⚠ <message>
/// ```
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message.yellow());
}

/// Prints a success message
///
/// # Format
/// ```text
/// ✓ <message>
/// ```
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message.white());
}

/// Prints an informational message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".cyan(), message.white());
}

/// Prints a section header surrounded by blank lines
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white().bold());
}

/// Prints the command line about to be executed
pub fn print_command(command: &str) {
    println!("{} {}", "▶".bright_black(), command.bright_black());
}

/// Prints a horizontal rule of the given width
pub fn print_rule(width: usize) {
    println!("{}", "━".repeat(width).bright_black());
}
