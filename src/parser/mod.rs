use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::debug;

use crate::compiler::{Compiler, CompilerOptions};
use crate::model::{ArtifactRecord, ContractMap, OutputKind};

/// Placeholder input name some compiler builds prepend to artifact keys.
pub const STDIN_PREFIX: &str = "<stdin>:";

pub fn strip_stdin_prefix(raw: &str) -> String {
    raw.replace(STDIN_PREFIX, "")
}

/// Compile `source` and parse the result.
///
/// A path that does not exist or is a directory yields an empty map
/// without the compiler being run.
pub fn compiled_contracts(
    source: &Path,
    compiler: &dyn Compiler,
    options: &CompilerOptions,
) -> Result<ContractMap> {
    if !source.exists() || source.is_dir() {
        debug!(file = %source.display(), "not a file, nothing to compile");
        return Ok(ContractMap::new());
    }

    let raw = compiler.compile(source, options)?;
    parse_contracts(&raw)
}

/// Parse the compiler's combined JSON output into a [`ContractMap`].
///
/// The document must carry a top-level `contracts` object whose values are
/// objects of output kind -> payload.
pub fn parse_contracts(raw: &str) -> Result<ContractMap> {
    let cleaned = strip_stdin_prefix(raw);
    let root: Value =
        serde_json::from_str(&cleaned).context("compiler output is not valid JSON")?;

    let contracts = root
        .get("contracts")
        .ok_or_else(|| anyhow!("compiler output has no `contracts` field"))?
        .as_object()
        .ok_or_else(|| anyhow!("`contracts` is not an object"))?;

    let mut map = ContractMap::new();
    for (name, value) in contracts {
        map.insert(name.clone(), parse_record(name, value)?);
    }
    Ok(map)
}

fn parse_record(name: &str, value: &Value) -> Result<ArtifactRecord> {
    let fields = value
        .as_object()
        .ok_or_else(|| anyhow!("contract `{name}` is not an object"))?;

    let mut record = ArtifactRecord::default();
    for (key, payload) in fields {
        let Some(kind) = OutputKind::from_key(key) else {
            debug!(contract = %name, output = %key, "ignoring unrequested output");
            continue;
        };
        // Newer compilers emit the ABI as a JSON array instead of a string.
        let payload = match payload {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        record.insert(kind, payload);
    }
    Ok(record)
}
