//! Shared CLI output helpers.
//!
//! Color scheme (off with `--no-color` or `NO_COLOR`):
//! - Green: success, added keys
//! - Red: errors, deleted keys
//! - Yellow: warnings, updated keys
//! - Cyan: paths, keys, hints
//! - Bold: namespace headers
//! - Dimmed: secondary info

use std::fmt::Display;

use console::Style;

/// Kind of change to a key, for diff listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added,
    Updated,
    Deleted,
}

/// Terminal printer. Colors are decided once, at construction.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
}

impl Printer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Colors unless `no_color` is set or `NO_COLOR` is present.
    pub fn from_env(no_color: bool) -> Self {
        Self::new(!no_color && std::env::var_os("NO_COLOR").is_none())
    }

    fn paint(&self, style: Style, text: impl Display) -> String {
        style.force_styling(self.color).apply_to(text).to_string()
    }

    /// Print a success message with checkmark (green).
    ///
    /// Example: `✓ table strata created`
    pub fn success(&self, msg: &str) {
        println!("{} {}", self.paint(Style::new().green(), "✓"), msg);
    }

    /// Print an error message to stderr (red).
    pub fn error(&self, msg: &str) {
        eprintln!("{} {}", self.paint(Style::new().red(), "✗"), msg);
    }

    /// Print a warning message to stderr (yellow).
    pub fn warn(&self, msg: &str) {
        eprintln!("{} {}", self.paint(Style::new().yellow(), "⚠"), msg);
    }

    /// Print a hint message to stderr (cyan).
    ///
    /// Example: `→ run: strata init`
    pub fn hint(&self, msg: &str) {
        eprintln!(
            "{} {}",
            self.paint(Style::new().cyan(), "→"),
            self.paint(Style::new().cyan(), msg)
        );
    }

    /// Print a bold header line.
    pub fn header(&self, title: &str) {
        println!("{}", self.paint(Style::new().bold(), title));
    }

    /// Print a dimmed/secondary message.
    pub fn dimmed(&self, msg: &str) {
        println!("{}", self.paint(Style::new().dim(), msg));
    }

    /// Print a list item with bullet.
    pub fn list_item(&self, item: &str) {
        println!("  • {item}");
    }

    /// Print one changed key.
    ///
    /// Example: `    + API_KEY`
    pub fn change(&self, change: Change, key: &str) {
        let (marker, style) = match change {
            Change::Added => ("+", Style::new().green()),
            Change::Updated => ("~", Style::new().yellow()),
            Change::Deleted => ("-", Style::new().red()),
        };
        println!("    {}", self.paint(style, format!("{marker} {key}")));
    }

    /// Format a key name in cyan.
    pub fn key(&self, key: &str) -> String {
        self.paint(Style::new().cyan(), key)
    }

    /// Format a path in cyan.
    pub fn path(&self, path: impl Display) -> String {
        self.paint(Style::new().cyan(), path)
    }
}
