//! Shells out to the contract compiler for one source file at a time.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::model::OutputKind;

/// Flags forwarded to the compiler on every invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerOptions {
    pub optimize: bool,
    /// Ask for all outputs as a single JSON document.
    pub combined_json: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            combined_json: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("could not run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not compile solidity files: {errors}")]
    Failed { errors: String },
    #[error("compiler output is not valid UTF-8")]
    InvalidOutput,
}

pub trait Compiler {
    /// Compiles `source` and returns the compiler's raw output.
    fn compile(&self, source: &Path, options: &CompilerOptions) -> Result<String, CompileError>;
}

impl<T: Compiler + ?Sized> Compiler for &T {
    fn compile(&self, source: &Path, options: &CompilerOptions) -> Result<String, CompileError> {
        (**self).compile(source, options)
    }
}

/// The `solc` command-line compiler.
#[derive(Debug, Clone)]
pub struct Solc {
    program: PathBuf,
}

impl Default for Solc {
    fn default() -> Self {
        Self::new("solc")
    }
}

impl Solc {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn args(source: &Path, options: &CompilerOptions) -> Vec<String> {
        let mut args = Vec::new();
        if options.optimize {
            args.push("--optimize".to_string());
        }
        if options.combined_json {
            let kinds: Vec<&str> = OutputKind::REQUESTED.iter().map(|k| k.key()).collect();
            args.push("--combined-json".to_string());
            args.push(kinds.join(","));
        } else {
            args.extend(OutputKind::REQUESTED.iter().map(|k| format!("--{}", k.key())));
        }
        args.push(source.display().to_string());
        args
    }
}

impl Compiler for Solc {
    fn compile(&self, source: &Path, options: &CompilerOptions) -> Result<String, CompileError> {
        let args = Self::args(source, options);
        debug!(program = %self.program.display(), args = ?args, "invoking compiler");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|source| CompileError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let errors = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            return Err(CompileError::Failed { errors });
        }

        String::from_utf8(output.stdout).map_err(|_| CompileError::InvalidOutput)
    }
}
