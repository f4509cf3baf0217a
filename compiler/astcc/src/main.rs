//! astcc command line.
//!
//! `astcc [OPTIONS] <INPUT>...` compiles schema files into one C++ header.

use std::path::PathBuf;
use std::process::ExitCode;

use astcc::{compile, init_tracing, CompileError, CompileOptions};
use astcc_diagnostic::emitter::ColorMode;
use astcc_emit::DEFAULT_OUTPUT_NAME;
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "astcc")]
#[command(about = "Compile AST node schemas into C++ class declarations", long_about = None)]
#[command(version)]
struct Cli {
    /// Schema files, compiled together in the order given
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file
    #[arg(long, short, default_value = DEFAULT_OUTPUT_NAME)]
    output: PathBuf,

    /// Wrap the output in an include guard using this macro name
    #[arg(long)]
    guard: Option<String>,

    /// Report methods without code or %external, but do not mark them external
    #[arg(long)]
    strict_external: bool,

    /// When to color diagnostics
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorChoice,
}

/// `--color` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Color when stderr is a terminal
    Auto,
    Always,
    Never,
}

impl From<ColorChoice> for ColorMode {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => ColorMode::Auto,
            ColorChoice::Always => ColorMode::Always,
            ColorChoice::Never => ColorMode::Never,
        }
    }
}

impl Cli {
    fn into_options(self) -> CompileOptions {
        let mut options = CompileOptions::new(self.inputs)
            .with_output(self.output)
            .with_repair_external(!self.strict_external)
            .with_color(self.color.into());
        if let Some(guard) = self.guard {
            options = options.with_include_guard(guard);
        }
        options
    }
}

fn main() -> ExitCode {
    init_tracing();
    let options = Cli::parse().into_options();

    match compile(&options) {
        Ok(path) => {
            println!("Done! Wrote {}", path.display());
            ExitCode::SUCCESS
        }
        // Phase failures have already been rendered with their diagnostics.
        Err(
            err @ (CompileError::Parse { .. }
            | CompileError::Resolve { .. }
            | CompileError::Validation { .. }),
        ) => {
            tracing::debug!(%err, "compilation stopped");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
