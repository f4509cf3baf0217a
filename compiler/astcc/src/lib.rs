//! The astcc compilation driver.
//!
//! Runs the phases in a fixed order with a hard stop between them:
//!
//! 1. front end over every input ([`astcc_parse`])
//! 2. inheritance resolution ([`astcc_check::resolve_inheritance`])
//! 3. semantic validation ([`astcc_check::validate`])
//! 4. C++ emission ([`astcc_emit::emit_cpp`])
//!
//! Any error in a phase stops the run before the next one; warnings do not.
//! No output file is written for a failed run.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Once;

use astcc_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use astcc_diagnostic::{count_errors, count_warnings, has_errors, Diagnostic};
use astcc_emit::{emit_cpp, EmitOptions, DEFAULT_OUTPUT_NAME};
use astcc_ir::{Schema, SourceMap};
use tracing::{debug, info};

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Does nothing unless `RUST_LOG` is set; spans are rendered as an
/// indented tree on stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(HierarchicalLayer::new(2).with_targets(true))
                .with(filter)
                .init();
        }
    });
}

/// Settings for one compilation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Schema files, compiled together in this order.
    pub inputs: Vec<PathBuf>,
    /// Where the generated header is written.
    pub output: PathBuf,
    /// Macro name for an include guard around the output.
    pub include_guard: Option<String>,
    /// Mark methods with neither code nor `%external` as external after
    /// reporting them. When off, the model is left untouched.
    pub repair_external: bool,
    /// Colouring of rendered diagnostics.
    pub color: ColorMode,
}

impl CompileOptions {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        CompileOptions {
            inputs,
            output: PathBuf::from(DEFAULT_OUTPUT_NAME),
            include_guard: None,
            repair_external: true,
            color: ColorMode::Auto,
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    #[must_use]
    pub fn with_include_guard(mut self, guard: impl Into<String>) -> Self {
        self.include_guard = Some(guard.into());
        self
    }

    #[must_use]
    pub fn with_repair_external(mut self, repair: bool) -> Self {
        self.repair_external = repair;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    fn emit_options(&self, sources: &SourceMap) -> EmitOptions {
        let output_name = self
            .output
            .file_name()
            .map_or_else(|| self.output.display().to_string(), |n| n.to_string_lossy().into_owned());
        EmitOptions {
            output_name,
            source_names: sources.names(),
            include_guard: self.include_guard.clone(),
        }
    }
}

/// Why a compilation produced no output.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse the schema due to {errors} error(s)")]
    Parse { errors: usize },

    #[error("could not resolve the node hierarchy due to {errors} error(s)")]
    Resolve { errors: usize },

    #[error("the schema failed validation with {errors} error(s)")]
    Validation { errors: usize },

    #[error("cannot write `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything one pipeline run produced.
#[derive(Debug)]
pub struct Compilation {
    /// The model as it stood when the run ended, repairs applied.
    pub schema: Schema,
    /// Diagnostics from every phase that ran, in phase order.
    pub diagnostics: Vec<Diagnostic>,
    /// The generated header, or the phase that stopped the run.
    pub result: Result<String, CompileError>,
}

impl Compilation {
    fn stopped(schema: Schema, diagnostics: Vec<Diagnostic>, error: CompileError) -> Self {
        Compilation {
            schema,
            diagnostics,
            result: Err(error),
        }
    }
}

/// Read every input into a source map, in order.
pub fn load_sources(inputs: &[PathBuf]) -> Result<SourceMap, CompileError> {
    let mut sources = SourceMap::new();
    for path in inputs {
        let text = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
            path: path.clone(),
            source,
        })?;
        sources.add(path, text);
    }
    Ok(sources)
}

/// Run every phase over in-memory sources.
#[tracing::instrument(level = "debug", skip_all, fields(sources = sources.len()))]
pub fn run_pipeline(sources: &SourceMap, options: &CompileOptions) -> Compilation {
    let front = astcc_parse::parse_sources(sources);
    let mut diagnostics = front.diagnostics;
    let mut schema = front.schema;
    debug!(nodes = schema.node_count(), diagnostics = diagnostics.len(), "front end done");
    if has_errors(&diagnostics) {
        let errors = count_errors(&diagnostics);
        return Compilation::stopped(schema, diagnostics, CompileError::Parse { errors });
    }

    let resolved = astcc_check::resolve_inheritance(&mut schema);
    let resolve_errors = count_errors(&resolved);
    diagnostics.extend(resolved);
    if resolve_errors > 0 {
        return Compilation::stopped(
            schema,
            diagnostics,
            CompileError::Resolve {
                errors: resolve_errors,
            },
        );
    }

    let validate_options = astcc_check::ValidateOptions {
        repair_external: options.repair_external,
    };
    let validation = astcc_check::validate(&mut schema, &validate_options);
    let validate_errors = count_errors(&validation.diagnostics);
    diagnostics.extend(validation.diagnostics);
    if !validation.passed {
        return Compilation::stopped(
            schema,
            diagnostics,
            CompileError::Validation {
                errors: validate_errors,
            },
        );
    }

    let text = emit_cpp(&schema, &options.emit_options(sources));
    debug!(bytes = text.len(), "emitted");
    Compilation {
        schema,
        diagnostics,
        result: Ok(text),
    }
}

/// Write the generated header, replacing any existing file.
pub fn write_output(path: &Path, text: &str) -> Result<(), CompileError> {
    std::fs::write(path, text).map_err(|source| CompileError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Compile the inputs named in `options`, render diagnostics to stderr and
/// write the output file. Returns the path written.
pub fn compile(options: &CompileOptions) -> Result<PathBuf, CompileError> {
    let sources = load_sources(&options.inputs)?;
    let compilation = run_pipeline(&sources, options);

    let mut emitter = TerminalEmitter::<std::io::Stderr>::stderr(
        options.color,
        std::io::stderr().is_terminal(),
    )
    .with_sources(&sources);
    emitter.emit_all(&compilation.diagnostics);
    emitter.emit_summary(
        count_errors(&compilation.diagnostics),
        count_warnings(&compilation.diagnostics),
    );
    emitter.flush();

    let text = compilation.result?;
    write_output(&options.output, &text)?;
    info!(output = %options.output.display(), "wrote header");
    Ok(options.output.clone())
}
