use anyhow::Context;
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::{self, Write};

/// Environment variable that forces plain output even on a terminal
pub const NO_PAGER_ENV: &str = "NO_PAGER";

/// Destination of rendered log lines
///
/// The minus pager doesn't implement `std::io::Write`, and it only makes
/// sense when a person is looking at the output. `LogOutput` picks the
/// pager for interactive terminals and falls back to a plain writer for
/// pipes, files and tests.
pub enum LogOutput {
    Pager(Pager),
    Plain(Box<dyn Write>),
}

impl LogOutput {
    /// Pager when stdout is a terminal and `NO_PAGER` is unset, stdout otherwise
    pub fn detect() -> Self {
        if io::stdout().is_terminal() && std::env::var_os(NO_PAGER_ENV).is_none() {
            LogOutput::Pager(Pager::new())
        } else {
            LogOutput::Plain(Box::new(io::stdout()))
        }
    }

    pub fn write_line(&mut self, line: &str) -> anyhow::Result<()> {
        match self {
            LogOutput::Pager(pager) => pager
                .push_str(format!("{line}\n"))
                .context("failed to push line to pager"),
            LogOutput::Plain(writer) => {
                writeln!(writer, "{line}").context("failed to write line")
            }
        }
    }

    /// Hand control to the pager, or flush the plain writer
    pub fn finish(self) -> anyhow::Result<()> {
        match self {
            LogOutput::Pager(pager) => {
                pager
                    .set_run_no_overflow(true)
                    .context("failed to configure pager")?;
                minus::page_all(pager).context("pager exited with an error")
            }
            LogOutput::Plain(mut writer) => writer.flush().context("failed to flush output"),
        }
    }
}
