//! Plugin sequencer CLI UI primitives.

use std::path::Path;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

pub mod colors {
    use console::Color;

    pub const CYAN: Color = Color::Color256(51);
    pub const MAGENTA: Color = Color::Color256(201);
    pub const NEON_GREEN: Color = Color::Color256(82);
    pub const DIM: Color = Color::Color256(240);
}

pub mod symbols {
    pub const DIAMOND: &str = "\u{25C6}";          // ◆
    pub const DIAMOND_OUTLINE: &str = "\u{25C7}";  // ◇
    pub const TARGET_FILLED: &str = "\u{25C9}";    // ◉
    pub const TRIANGLE: &str = "\u{25B8}";         // ▸
    pub const DOT: &str = "\u{00B7}";              // ·
}

/// Print compact version header
pub fn print_compact_header(version: &str) {
    eprintln!(
        "  {} {} {}",
        style(symbols::DIAMOND).fg(colors::CYAN),
        style("plugin-sequencer").fg(colors::CYAN).bold(),
        style(version).dim()
    );
}

/// Print a success message
pub fn success(msg: &str) {
    eprintln!(
        "  {} {}",
        style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN),
        msg
    );
}

/// Print a skipped service
pub fn skipped(service_class: &str, reason: &str) {
    eprintln!(
        "  {} {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA),
        style(service_class).fg(colors::MAGENTA),
        style(reason).fg(colors::DIM)
    );
}

/// Print a dim/secondary message
pub fn dim(msg: &str) {
    eprintln!("  {}", style(msg).fg(colors::DIM));
}

/// Written paths go to stdout, one per line, so they can be piped.
pub fn written(path: &Path) {
    println!("{}", path.display());
}

/// Print a generated client line
pub fn client_line(module_name: &str, class_name: &str) {
    eprintln!(
        "  {}   {} {} {}",
        style(symbols::TRIANGLE).fg(colors::CYAN),
        style(module_name).bold(),
        style(symbols::DOT).fg(colors::DIM),
        style(class_name).fg(colors::DIM)
    );
}

/// Create a spinner
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::default_spinner()
        .tick_chars("\u{25CE}\u{25C9}\u{25CE}\u{25C9}") // ◎◉◎◉
        .template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(spinner_style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(150));
    pb
}

/// Print timing information
pub fn timing(label: &str, duration_ms: u128) {
    eprintln!(
        "  {} {} in {}ms",
        style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN),
        label,
        duration_ms
    );
}
