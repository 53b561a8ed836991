//! The interactive report menu.

use crate::error::{ReportError, Result};
use crate::report::ReportKind;

/// Heading printed above the menu.
pub const MENU_TITLE: &str = "Reporting Utilities";

/// Prompt printed after the menu.
pub const PROMPT: &str = "Select an option: ";

/// Printed when a selection cannot be used.
pub const RETRY_MESSAGE: &str = "Oops. Something went wrong! Please try again";

/// A menu selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Run a report.
    Report(ReportKind),
    /// Leave the menu loop.
    Quit,
}

/// Menu number of the quit entry, right after the last report.
pub fn quit_index() -> usize {
    ReportKind::ALL.len() + 1
}

/// Renders the menu, one entry per line.
pub fn render_menu() -> String {
    let mut text = String::from(MENU_TITLE);
    text.push('\n');
    for kind in ReportKind::ALL {
        text.push_str(&format!(" {}) {}\n", kind.menu_index(), kind.definition().label));
    }
    text.push_str(&format!(" {}) Quit\n", quit_index()));
    text
}

/// Parses one line of menu input.
pub fn parse_choice(input: &str) -> Result<MenuChoice> {
    let input = input.trim();
    let index: usize = input
        .parse()
        .map_err(|_| ReportError::input(format!("'{input}' is not a number")))?;

    if index == quit_index() {
        return Ok(MenuChoice::Quit);
    }

    ReportKind::from_menu_index(index)
        .map(MenuChoice::Report)
        .ok_or_else(|| {
            ReportError::input(format!(
                "{index} is not a menu option (1-{})",
                quit_index()
            ))
        })
}
