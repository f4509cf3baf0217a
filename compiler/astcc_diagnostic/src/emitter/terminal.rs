//! Terminal Emitter
//!
//! Human-readable diagnostic output with optional ANSI color support.
//!
//! The header line of every diagnostic reads `Error: <message> [CODE]`
//! (or `Warning: ...`). When the emitter knows the input files, each label
//! is followed by the offending source line and a caret underline.

use std::io::{self, Write};

use astcc_ir::{SourceMap, Span};

use crate::span_utils::LineOffsetTable;
use crate::{Diagnostic, Label, Severity};

use super::DiagnosticEmitter;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const NOTE: &str = "\x1b[1;36m"; // Bold cyan
    pub const HELP: &str = "\x1b[1;32m"; // Bold green
    pub const BOLD: &str = "\x1b[1m";
    pub const SECONDARY: &str = "\x1b[1;34m"; // Bold blue
    pub const RESET: &str = "\x1b[0m";
}

#[inline]
fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Color output mode for terminal emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Use colors when the output is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a boolean. `is_tty` only matters for `Auto`.
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

/// Resolved location of a label inside its file.
struct Location<'s> {
    path: String,
    line: u32,
    col: u32,
    line_text: &'s str,
    width: usize,
}

/// Terminal emitter with optional color support.
pub struct TerminalEmitter<'a, W: Write> {
    writer: W,
    colors: bool,
    sources: Option<&'a SourceMap>,
    line_tables: Vec<Option<LineOffsetTable>>,
}

impl<'a, W: Write> TerminalEmitter<'a, W> {
    /// Create a terminal emitter with an explicit color mode.
    ///
    /// `is_tty` is consulted for [`ColorMode::Auto`] only.
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
            sources: None,
            line_tables: Vec::new(),
        }
    }

    /// Create a terminal emitter for stderr.
    pub fn stderr(mode: ColorMode, is_tty: bool) -> TerminalEmitter<'a, io::Stderr> {
        TerminalEmitter::with_color_mode(io::stderr(), mode, is_tty)
    }

    /// Resolve label spans against `sources` into `path:line:col` and a
    /// source snippet.
    #[must_use]
    pub fn with_sources(mut self, sources: &'a SourceMap) -> Self {
        self.sources = Some(sources);
        self.line_tables = vec![None; sources.len()];
        self
    }

    /// Consume the emitter and return the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn locate(&mut self, span: Span) -> Option<Location<'a>> {
        let file = self.sources?.get(span.source)?;
        let slot = self.line_tables.get_mut(span.source.index())?;
        let table = slot.get_or_insert_with(|| LineOffsetTable::build(&file.text));

        let (line, col) = table.offset_to_line_col(&file.text, span.start);
        let line_text = table.line_text(&file.text, line).unwrap_or("");
        let width = file
            .text
            .get(span.to_range())
            .map_or(1, |text| text.lines().next().map_or(1, |l| l.chars().count()))
            .max(1);

        Some(Location {
            path: file.name(),
            line,
            col,
            line_text,
            width,
        })
    }

    /// Write text with optional ANSI color codes.
    fn write_colored(&mut self, text: &str, color: &str) {
        if self.colors {
            let _ = write!(self.writer, "{color}{text}{}", colors::RESET);
        } else {
            let _ = write!(self.writer, "{text}");
        }
    }

    fn write_severity(&mut self, severity: Severity) {
        let color = match severity {
            Severity::Error => colors::ERROR,
            Severity::Warning => colors::WARNING,
            Severity::Note => colors::NOTE,
            Severity::Help => colors::HELP,
        };
        self.write_colored(&severity.to_string(), color);
    }

    fn write_code(&mut self, code: &str) {
        if self.colors {
            let _ = write!(self.writer, "{}[{code}]{}", colors::BOLD, colors::RESET);
        } else {
            let _ = write!(self.writer, "[{code}]");
        }
    }

    fn write_label(&mut self, label: &Label) {
        let marker = if label.is_primary { "-->" } else { "   " };
        let color = if label.is_primary {
            colors::ERROR
        } else {
            colors::SECONDARY
        };

        let Some(loc) = self.locate(label.span) else {
            let _ = write!(self.writer, "  {marker} {:?}: ", label.span);
            self.write_colored(&label.message, color);
            let _ = writeln!(self.writer);
            return;
        };

        let gutter = " ".repeat(loc.line.to_string().len());
        let _ = writeln!(
            self.writer,
            "  {marker} {}:{}:{}",
            loc.path, loc.line, loc.col
        );
        let _ = writeln!(self.writer, "  {gutter} |");
        let _ = writeln!(self.writer, "  {} | {}", loc.line, loc.line_text);
        let _ = write!(
            self.writer,
            "  {gutter} | {}",
            " ".repeat((loc.col - 1) as usize)
        );
        let underline = if label.is_primary { "^" } else { "-" }.repeat(loc.width);
        self.write_colored(&underline, color);
        if !label.message.is_empty() {
            let _ = write!(self.writer, " ");
            self.write_colored(&label.message, color);
        }
        let _ = writeln!(self.writer);
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<'_, W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        // Header: Severity: message [CODE]
        self.write_severity(diagnostic.severity);
        let _ = write!(self.writer, ": {} ", diagnostic.message);
        self.write_code(diagnostic.code.as_str());
        let _ = writeln!(self.writer);

        for label in &diagnostic.labels {
            self.write_label(label);
        }

        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.write_colored("note", colors::BOLD);
            let _ = writeln!(self.writer, ": {note}");
        }

        for suggestion in &diagnostic.suggestions {
            let _ = write!(self.writer, "  = ");
            self.write_colored("help", colors::HELP);
            let _ = writeln!(self.writer, ": {suggestion}");
        }

        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        if error_count == 0 && warning_count == 0 {
            return;
        }

        if error_count > 0 {
            self.write_colored("Error", colors::ERROR);

            let error_part = if error_count == 1 {
                "previous error".to_string()
            } else {
                format!("{error_count} previous errors")
            };

            if warning_count > 0 {
                let _ = writeln!(
                    self.writer,
                    ": aborting due to {error_part}; {warning_count} warning{} emitted",
                    plural_s(warning_count)
                );
            } else {
                let _ = writeln!(self.writer, ": aborting due to {error_part}");
            }
        } else {
            self.write_colored("Warning", colors::WARNING);
            let _ = writeln!(
                self.writer,
                ": {warning_count} warning{} emitted",
                plural_s(warning_count)
            );
        }
    }
}
