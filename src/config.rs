use std::path::PathBuf;

use thiserror::Error;

use crate::compiler::CompilerOptions;

pub const DEFAULT_PACKAGE: &str = "org.example.model";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("`{0}` is not a valid package name")]
    InvalidPackage(String),
}

/// Settings for one generation run. Built once, never mutated while running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskConfig {
    pub output_dir: PathBuf,
    pub package: String,
    pub compiler: CompilerOptions,
}

impl TaskConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            package: DEFAULT_PACKAGE.to_string(),
            compiler: CompilerOptions::default(),
        }
    }

    pub fn with_package(mut self, package: impl Into<String>) -> Result<Self, ConfigError> {
        let package = package.into();
        validate_package(&package)?;
        self.package = package;
        Ok(self)
    }
}

/// A package is one or more dot separated identifiers.
pub fn validate_package(package: &str) -> Result<(), ConfigError> {
    let valid = package.split('.').all(|segment| {
        let mut chars = segment.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    });

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidPackage(package.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = TaskConfig::new("build/generated");
        assert_eq!(cfg.package, "org.example.model");
        assert!(cfg.compiler.optimize);
        assert!(cfg.compiler.combined_json);
    }

    #[test]
    fn package_names() {
        for ok in ["org.example.model", "contracts", "_x.y2"] {
            assert_eq!(validate_package(ok), Ok(()), "{ok}");
        }
        for bad in ["", "org..model", "org.", "1org", "org.ex-ample", "org/model"] {
            assert!(validate_package(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn invalid_package_is_rejected() {
        let err = TaskConfig::new("out").with_package("my-app").unwrap_err();
        assert_eq!(err.to_string(), "`my-app` is not a valid package name");
    }
}
