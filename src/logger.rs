use colored::*;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::time::Duration;

/// Terminal output for the CLI, in the app's colours.
/// Brand green (38, 166, 91) for info, chili red (214, 69, 65) for accents.
/// Diagnostics go through `log` instead; this is only what the user reads.
pub struct Logger;

impl Logger {
    /// Centered banner on startup. Slashes and pipes in chili red, letters in green.
    pub fn banner() {
        let term = Term::stdout();
        let width = term.size().1 as usize;

        let banner = r#"
    __         __                            __    _
   / /_  ___  / /_____  ____ ___  ___  _____/ /_  (_)
  / __ \/ _ \/ __/ __ \/ __ `__ \/ _ \/ ___/ __ \/ /
 / /_/ /  __/ /_/ /_/ / / / / / /  __(__  ) / / / /
/_.___/\___/\__/\____/_/ /_/ /_/\___/____/_/ /_/_/
"#;

        for line in banner.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let colored_line = if line.contains('/') || line.contains('|') {
                line.truecolor(214, 69, 65).bold().to_string()
            } else {
                line.truecolor(38, 166, 91).bold().to_string()
            };
            println!("{:^width$}", colored_line, width = width);
        }
        println!("{:^width$}", "ベトめしガイド".dimmed(), width = width);
        println!();
    }

    /// Neutral status line with a green bullet.
    pub fn info<T: Display>(msg: T) {
        println!("{} {}", "•".truecolor(38, 166, 91).bold(), msg);
    }

    /// Something finished and worked.
    pub fn success<T: Display>(msg: T) {
        println!("{} {}", "✔".green().bold(), msg);
    }

    /// Goes to stderr so piping a listing somewhere doesn't swallow failures.
    pub fn error<T: Display>(msg: T) {
        eprintln!("{} {}", "✖".red().bold(), msg);
    }

    /// Not fatal, but the user should know (empty list, odd server reply).
    pub fn warn<T: Display>(msg: T) {
        println!("{} {}", "⚠".yellow().bold(), msg);
    }

    /// Section header, underlined, with a blank line above it.
    pub fn header<T: Display>(msg: T) {
        println!(
            "\n{}",
            msg.to_string().truecolor(214, 69, 65).bold().underline()
        );
    }

    /// Styles a value for embedding in another message; prints nothing.
    pub fn highlight<T: Display>(msg: T) -> String {
        msg.to_string().truecolor(38, 166, 91).bold().to_string()
    }

    /// Greys out secondary text, like the server's own message after ours.
    pub fn dim<T: Display>(msg: T) -> String {
        msg.to_string().dimmed().to_string()
    }

    /// Spinner shown while a request is in flight. Call `finish_and_clear`
    /// when the response is back.
    pub fn spinner<T: Display>(msg: T) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }
}
