use console::{Term, style};
use meeting_bot_core::Notifier;

/// Prints notices to stderr so they stay out of piped output.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notice(&self, message: &str) {
        eprintln!("{} {}", style("!").yellow().bold(), message);
    }
}

/// Ask a yes/no question on the terminal. Anything but "y"/"yes" is a no.
pub fn confirm(question: &str) -> std::io::Result<bool> {
    let term = Term::stderr();
    term.write_str(&format!("{} [y/N] ", question))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
