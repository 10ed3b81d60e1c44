//! Console output shim for handler diagnostics.
//!
//! A line-oriented text sink with plain and ANSI-colored variants, each in
//! newline and no-newline forms. Diagnostics only; never part of the
//! decision protocol.

use colored::Colorize;
use std::io::Write;

/// Colors available to handler diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Yellow,
    Blue,
    Green,
}

impl Color {
    fn paint(self, content: &str) -> String {
        match self {
            Color::Red => content.red().to_string(),
            Color::Yellow => content.yellow().to_string(),
            Color::Blue => content.blue().to_string(),
            Color::Green => content.green().to_string(),
        }
    }
}

/// Write content to a sink without a trailing newline.
pub fn write_to(sink: &mut impl Write, content: &str) -> std::io::Result<()> {
    sink.write_all(content.as_bytes())?;
    sink.flush()
}

/// Write colored content to a sink without a trailing newline.
pub fn write_colored_to(sink: &mut impl Write, content: &str, color: Color) -> std::io::Result<()> {
    write_to(sink, &color.paint(content))
}

/// Print to stdout without a trailing newline.
pub fn print(content: &str) {
    let _ = write_to(&mut std::io::stdout(), content);
}

/// Print to stdout with a trailing newline.
pub fn println(content: &str) {
    let _ = write_to(&mut std::io::stdout(), &format!("{content}\n"));
}

/// Print colored content to stdout without a trailing newline.
pub fn colored_print(content: &str, color: Color) {
    let _ = write_colored_to(&mut std::io::stdout(), content, color);
}

/// Print colored content to stdout with a trailing newline.
pub fn colored_println(content: &str, color: Color) {
    colored_print(&format!("{content}\n"), color);
}
