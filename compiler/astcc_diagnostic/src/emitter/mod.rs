//! Diagnostic emitters.
//!
//! Emitters render accumulated [`Diagnostic`]s for a reader. The compiler
//! only ships a terminal emitter; the trait is the seam for anything else.

mod terminal;

pub use terminal::{ColorMode, TerminalEmitter};

use crate::Diagnostic;

/// Trait for emitting diagnostics in some output format.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic);

    /// Emit multiple diagnostics, in order.
    fn emit_all(&mut self, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            self.emit(diag);
        }
    }

    /// Flush any buffered output.
    fn flush(&mut self);

    /// Emit a summary of errors/warnings.
    fn emit_summary(&mut self, error_count: usize, warning_count: usize);
}

/// Emitter that keeps diagnostics in memory.
///
/// Used where the caller wants the diagnostics back instead of rendered
/// text, such as library callers and tests.
#[derive(Clone, Debug, Default)]
pub struct CollectingEmitter {
    pub diagnostics: Vec<Diagnostic>,
    pub summary: Option<(usize, usize)>,
}

impl CollectingEmitter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticEmitter for CollectingEmitter {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }

    fn flush(&mut self) {}

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        self.summary = Some((error_count, warning_count));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ErrorCode;

    #[test]
    fn test_collecting_emitter_keeps_order() {
        let mut emitter = CollectingEmitter::new();
        emitter.emit_all(&[
            Diagnostic::error(ErrorCode::E4002).with_message("first"),
            Diagnostic::warning(ErrorCode::E4014).with_message("second"),
        ]);
        emitter.emit_summary(1, 1);
        emitter.flush();

        let messages: Vec<&str> = emitter
            .diagnostics
            .iter()
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(emitter.summary, Some((1, 1)));
    }
}
