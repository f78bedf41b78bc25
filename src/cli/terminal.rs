//! Terminal styling for command output

use owo_colors::{OwoColorize, colors::css};

/// Where a line of output is written.
#[derive(Debug, Clone, Copy)]
pub enum Target {
    Stdout,
    Stderr,
}

impl Target {
    fn colored(self) -> bool {
        let stream = match self {
            Self::Stdout => supports_color::Stream::Stdout,
            Self::Stderr => supports_color::Stream::Stderr,
        };
        supports_color::on(stream).is_some()
    }
}

/// Whether the terminal is narrower than 60 columns.
///
/// Unknown widths (pipes, files) count as wide.
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(w, _)| w.0 < 60)
}

/// Extension trait for styling text written to a [`Target`].
///
/// Styling is dropped when the target does not support color.
pub trait Colorize {
    /// Accepted values (green)
    fn success(&self, target: Target) -> String;
    /// Rejected values (amber)
    fn warning(&self, target: Target) -> String;
    /// Headings (blue)
    fn info(&self, target: Target) -> String;
    /// Secondary detail
    fn dim(&self, target: Target) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self, target: Target) -> String {
        paint(self.as_ref(), target, |s| s.fg::<css::Green>().to_string())
    }

    fn warning(&self, target: Target) -> String {
        paint(self.as_ref(), target, |s| s.fg::<css::Orange>().to_string())
    }

    fn info(&self, target: Target) -> String {
        paint(self.as_ref(), target, |s| s.fg::<css::LightBlue>().to_string())
    }

    fn dim(&self, target: Target) -> String {
        paint(self.as_ref(), target, |s| s.dimmed().to_string())
    }
}

fn paint(text: &str, target: Target, style: impl FnOnce(&str) -> String) -> String {
    if target.colored() {
        style(text)
    } else {
        text.to_string()
    }
}
