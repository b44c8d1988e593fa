use colored::Colorize;
use std::fmt::Display;

/// Local wall-clock time for status lines.
pub fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Print a status line: `HH:MM:SS <tag> <message>`.
pub fn status(tag: impl Display, message: impl Display) {
    println!("{} {} {}", timestamp().dimmed(), tag, message);
}

/// Same as [`status`] but on stderr, for problems that do not stop the launcher.
pub fn warn(tag: impl Display, message: impl Display) {
    eprintln!(
        "{} {} {}",
        timestamp().dimmed(),
        tag,
        message.to_string().yellow()
    );
}
