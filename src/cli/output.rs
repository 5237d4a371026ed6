//! Colored terminal output.
//!
//! [`OutputManager`] is created once in [`crate::cli::run`] and handed to every
//! step through [`crate::cli::RuntimeConfig`]. Each call resets the terminal
//! style before returning, so no color state leaks between lines.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use std::io::{self, IsTerminal, Write};

const BANNER: &str = r"
      /\_/\
     ( o.o )  GAE V 1.0
      > ^ <
";

/// Console writer shared by the CLI and the export pipeline.
#[derive(Debug, Clone)]
pub struct OutputManager {
    quiet: bool,
    color_choice: ColorChoice,
    interactive: bool,
}

impl OutputManager {
    /// Creates an output manager.
    ///
    /// Colors are only emitted when `color` is set and stdout is a terminal.
    pub fn new(quiet: bool, color: bool) -> Self {
        let interactive = io::stdout().is_terminal();
        let color_choice = if color && interactive {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };

        Self {
            quiet,
            color_choice,
            interactive,
        }
    }

    /// Uncolored, non-quiet output that draws spinners even when stdout is
    /// not a terminal.
    #[cfg(test)]
    pub(crate) fn forced_interactive() -> Self {
        Self {
            quiet: false,
            color_choice: ColorChoice::Never,
            interactive: true,
        }
    }

    /// Whether an animated spinner may be drawn.
    pub fn is_interactive(&self) -> bool {
        self.interactive && !self.quiet
    }

    /// Prints the startup banner.
    pub fn banner(&self) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line(Some(Color::Green), false, BANNER)?;
        self.write_line(Some(Color::Cyan), false, "Godot Android Exporter Toolkit v1.0")?;
        self.write_line(None, false, "----------------------------------\n")
    }

    /// Prints a section header (`=== TITLE ===`).
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line(Some(Color::Cyan), true, &format!("\n=== {title} ==="))
    }

    /// Prints a success line.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line(Some(Color::Green), false, message)
    }

    /// Prints a warning line.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line(Some(Color::Yellow), false, message)
    }

    /// Prints a value change or a loaded setting.
    pub fn change(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line(Some(Color::Yellow), false, message)
    }

    /// Prints a per-file progress line.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line(Some(Color::Magenta), false, message)
    }

    /// Prints an error line. Never suppressed.
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.write_line(Some(Color::Red), false, message)
    }

    /// Prints captured tool output under an error. Never suppressed.
    pub fn error_detail(&self, message: &str) -> io::Result<()> {
        self.write_line(Some(Color::Yellow), false, message)
    }

    /// Prints indented plain text.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_line(None, false, &format!("  {message}"))
    }

    /// Draws one spinner frame at the start of the current line.
    pub fn spinner_frame(&self, frame: char) -> io::Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);
        write!(stdout, "\r{frame} ")?;
        stdout.flush()
    }

    /// Erases the spinner frame.
    pub fn clear_spinner(&self) -> io::Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);
        write!(stdout, "\r  \r")?;
        stdout.flush()
    }

    fn write_line(&self, color: Option<Color>, bold: bool, message: &str) -> io::Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);
        if color.is_some() || bold {
            stdout.set_color(ColorSpec::new().set_fg(color).set_bold(bold))?;
        }
        writeln!(stdout, "{message}")?;
        stdout.reset()?;
        stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_output_is_never_interactive() {
        let output = OutputManager::new(true, true);
        assert!(!output.is_interactive());
        output.section("SILENT").unwrap();
        output.success("not printed").unwrap();
    }

    #[test]
    fn forced_interactive_writes_uncolored() {
        let output = OutputManager::forced_interactive();
        assert!(output.is_interactive());
        output.progress("Processing: strings.xml").unwrap();
        output.spinner_frame('⠋').unwrap();
        output.clear_spinner().unwrap();
    }
}
