//! Runs compile + generate over every input file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::compiler::Compiler;
use crate::config::TaskConfig;
use crate::driver::{self, ArtifactOutcome, BindingGenerator};
use crate::parser;

/// Summary of one run.
#[derive(Debug, Default)]
pub struct TaskReport {
    pub files: usize,
    /// Inputs that compiled to no contracts, or were not files.
    pub empty_files: Vec<PathBuf>,
    pub outcomes: Vec<ArtifactOutcome>,
}

impl TaskReport {
    pub fn generated(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(String::as_str))
    }

    pub fn failures(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.outcomes.iter().filter(|o| !o.is_ok())
    }
}

pub struct GenerateTask<C, G> {
    config: TaskConfig,
    compiler: C,
    generator: G,
}

impl<C: Compiler, G: BindingGenerator> GenerateTask<C, G> {
    pub fn new(config: TaskConfig, compiler: C, generator: G) -> Self {
        Self {
            config,
            compiler,
            generator,
        }
    }

    /// Processes `inputs` in order.
    ///
    /// A file that fails to compile or yields unreadable output aborts the
    /// whole run; contracts that fail to generate are only logged.
    pub fn run(&self, inputs: &[PathBuf]) -> Result<TaskReport> {
        let mut report = TaskReport::default();

        for file in inputs {
            info!(file = %file.display(), "processing contract file");
            report.files += 1;

            let outcomes = self
                .process_file(file)
                .with_context(|| format!("Processing {}", file.display()))?;

            match outcomes {
                None => report.empty_files.push(file.clone()),
                Some(outcomes) => {
                    let failed = driver::log_failures(&outcomes);
                    info!(
                        file = %file.display(),
                        contracts = outcomes.len(),
                        failed,
                        "finished contract file"
                    );
                    report.outcomes.extend(outcomes);
                }
            }
        }

        info!(
            files = report.files,
            generated = report.generated().count(),
            failed = report.failures().count(),
            "generation finished"
        );
        Ok(report)
    }

    fn process_file(&self, file: &Path) -> Result<Option<Vec<ArtifactOutcome>>> {
        let contracts = parser::compiled_contracts(file, &self.compiler, &self.config.compiler)?;
        if contracts.is_empty() {
            warn!(file = %file.display(), "no contract found");
            return Ok(None);
        }

        Ok(Some(driver::generate_all(
            &contracts,
            &self.generator,
            &self.config.output_dir,
            &self.config.package,
        )))
    }
}
