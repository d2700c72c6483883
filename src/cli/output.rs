//! Terminal output formatting with colors
//!
//! Everything here goes to stderr; stdout carries the merged document.
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

/// Print a merge failure ("merge error:" prefix in red bold)
pub fn merge_error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "merge error".red().bold(), msg);
}

/// Print any other failure in red
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}", msg.to_string().red());
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}", msg.to_string().cyan().bold());
}

/// Print numbered list entry, counting from 1
pub fn numbered(position: usize, msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("  {:02}. {}", position, msg);
}

/// Print completed action (green label)
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{} {}", label.green(), msg);
}

/// Print an empty line
pub fn blank() {
    eprintln!();
}
