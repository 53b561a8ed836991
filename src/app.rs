//! Command dispatch: the interactive menu loop and one-shot report runs.

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::error::{ReportError, Result};
use crate::menu::{self, MenuChoice};
use crate::report::{ReportExecutor, ReportKind};

/// Dispatches report selections to the executor.
pub struct App {
    executor: ReportExecutor,
}

impl App {
    /// Creates a dispatcher around `executor`.
    pub fn new(executor: ReportExecutor) -> Self {
        Self { executor }
    }

    /// Runs a single report.
    pub async fn run_report<W: Write>(&self, kind: ReportKind, out: &mut W) -> Result<usize> {
        self.executor.run(kind.definition(), out).await
    }

    /// Shows the menu until the user quits or input ends.
    ///
    /// Report failures are printed and the menu is shown again. Only a
    /// failure to read input or write output ends the loop with an error.
    pub async fn run_interactive<R: BufRead, W: Write>(&self, mut input: R, out: &mut W) -> Result<()> {
        info!(
            "Starting interactive session on {}",
            self.executor.config().display_string()
        );

        loop {
            write!(out, "{}{}", menu::render_menu(), menu::PROMPT)?;
            out.flush()?;

            let mut buf = Vec::new();
            if input.read_until(b'\n', &mut buf)? == 0 {
                // EOF (Ctrl+D or closed pipe)
                writeln!(out)?;
                break;
            }

            // Undecodable bytes become U+FFFD and fail to parse like any other typo
            let line = String::from_utf8_lossy(&buf);
            let kind = match menu::parse_choice(&line) {
                Ok(MenuChoice::Quit) => break,
                Ok(MenuChoice::Report(kind)) => kind,
                Err(e) => {
                    debug!("Rejected menu input: {e}");
                    writeln!(out, "{}", menu::RETRY_MESSAGE)?;
                    continue;
                }
            };

            match self.run_report(kind, out).await {
                Ok(_) => {}
                Err(ReportError::Console(e)) => return Err(ReportError::Console(e)),
                Err(e) => {
                    warn!("Report {kind} failed: {e}");
                    writeln!(out, "{}: {}", e.category(), e)?;
                    writeln!(out)?;
                }
            }
        }

        info!("Interactive session ended");
        Ok(())
    }

    /// Prints the catalog: menu number, command-line name and label.
    pub fn list_reports<W: Write>(out: &mut W) -> Result<()> {
        for kind in ReportKind::ALL {
            let report = kind.definition();
            writeln!(out, "{}) {:<14}{}", kind.menu_index(), report.name, report.label)?;
        }
        Ok(())
    }
}
