//! Turns each compiled contract into one generator call.

use std::path::Path;

use thiserror::Error;
use tracing::{error, info};

use crate::model::{
    ArtifactRecord, ContractMap, GenerationRequest, MissingSeparator, OutputKind, short_name,
};

/// Writes the bindings for one contract.
pub trait BindingGenerator {
    fn generate(&self, request: &GenerationRequest) -> anyhow::Result<()>;
}

impl<T: BindingGenerator + ?Sized> BindingGenerator for &T {
    fn generate(&self, request: &GenerationRequest) -> anyhow::Result<()> {
        (**self).generate(request)
    }
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error(transparent)]
    MissingSeparator(#[from] MissingSeparator),
    #[error("no `{kind}` output")]
    MissingPayload { kind: OutputKind },
    #[error("generator failed: {0:#}")]
    Generator(anyhow::Error),
}

/// Result of generating one contract.
#[derive(Debug)]
pub struct ArtifactOutcome {
    pub contract: String,
    /// The short name bindings were written for.
    pub result: Result<String, ArtifactError>,
}

impl ArtifactOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Invokes `generator` once per contract and collects every outcome.
///
/// A failing contract never stops the others.
pub fn generate_all(
    contracts: &ContractMap,
    generator: &dyn BindingGenerator,
    output_dir: &Path,
    package: &str,
) -> Vec<ArtifactOutcome> {
    contracts
        .iter()
        .map(|(contract, record)| {
            info!(contract = %contract, "building bindings");
            let result = generate_one(contract, record, generator, output_dir, package);
            if let Ok(name) = &result {
                info!(contract = %contract, class = %name, "built bindings");
            }
            ArtifactOutcome {
                contract: contract.clone(),
                result,
            }
        })
        .collect()
}

fn generate_one(
    contract: &str,
    record: &ArtifactRecord,
    generator: &dyn BindingGenerator,
    output_dir: &Path,
    package: &str,
) -> Result<String, ArtifactError> {
    let name = short_name(contract)?;
    let payload = |kind: OutputKind| {
        record
            .get(kind)
            .ok_or(ArtifactError::MissingPayload { kind })
    };

    let request = GenerationRequest {
        short_name: name.to_string(),
        bytecode: payload(OutputKind::Bin)?.to_string(),
        abi: payload(OutputKind::Abi)?.to_string(),
        output_dir: output_dir.to_path_buf(),
        package: package.to_string(),
    };

    generator
        .generate(&request)
        .map_err(ArtifactError::Generator)?;
    Ok(request.short_name)
}

/// Logs every failed outcome and returns how many there were.
pub fn log_failures(outcomes: &[ArtifactOutcome]) -> usize {
    let mut failed = 0;
    for outcome in outcomes {
        if let Err(e) = &outcome.result {
            error!(contract = %outcome.contract, error = %e, "could not build bindings");
            failed += 1;
        }
    }
    failed
}
