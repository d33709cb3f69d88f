//! Console output for the user (stdout). Diagnostics go through `tracing` instead.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

pub const RULE: &str = "____________________________________________________________________";

pub struct TextPrinter {
    pub color: Option<&'static str>,
}

impl TextPrinter {
    /// Coloured only when stdout is a terminal.
    pub fn new(color: &'static str) -> Self {
        let color = std::io::stdout().is_terminal().then_some(color);
        Self { color }
    }

    #[allow(dead_code)]
    pub fn plain() -> Self {
        Self { color: None }
    }

    pub fn print(&self, text: &str) {
        println!("{}", self.paint(text));
    }

    pub fn paint(&self, text: &str) -> String {
        match self.color {
            Some("green") => text.green().to_string(),
            Some("cyan") => text.cyan().to_string(),
            Some("red") => text.red().to_string(),
            Some("yellow") => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// The blank-line framed message shown when the demo executable cannot be found.
pub fn missing_executable_message(reason: &str) -> String {
    format!(
        "\nERROR: {}\nPlease call 'make install' in the build directory first.\n",
        reason
    )
}
