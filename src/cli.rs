use clap::Parser;
use std::path::PathBuf;

use crate::config::{ConfigError, DEFAULT_PACKAGE, TaskConfig};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Contract source files or directories containing them
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,
    /// Output directory for generated bindings
    #[arg(short, long)]
    pub output: PathBuf,
    /// Package the bindings are generated into
    #[arg(short, long, env = "SOLBIND_PACKAGE", default_value = DEFAULT_PACKAGE)]
    pub package: String,
    /// Compiler executable
    #[arg(long, env = "SOLC", default_value = "solc")]
    pub solc: PathBuf,
    /// Disable the compiler's optimizer
    #[arg(long)]
    pub no_optimize: bool,
    /// Extension of source files picked up from directories
    #[arg(long, default_value = "sol")]
    pub extension: String,
}

impl Cli {
    pub fn task_config(&self) -> Result<TaskConfig, ConfigError> {
        let mut config = TaskConfig::new(&self.output).with_package(&self.package)?;
        config.compiler.optimize = !self.no_optimize;
        Ok(config)
    }
}
