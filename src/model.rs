use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Output kinds requested from the compiler for every input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OutputKind {
    /// Deployable bytecode, hex encoded.
    Bin,
    /// JSON interface description (the ABI).
    Abi,
    /// Native interface source.
    Interface,
    Metadata,
}

impl OutputKind {
    /// Every kind the compiler is asked for, in the order passed on its command line.
    pub const REQUESTED: [OutputKind; 4] = [
        OutputKind::Bin,
        OutputKind::Abi,
        OutputKind::Interface,
        OutputKind::Metadata,
    ];

    pub fn key(self) -> &'static str {
        match self {
            OutputKind::Bin => "bin",
            OutputKind::Abi => "abi",
            OutputKind::Interface => "interface",
            OutputKind::Metadata => "metadata",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::REQUESTED.into_iter().find(|kind| kind.key() == key)
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("artifact name `{0}` is not of the form `<path>:<name>`")]
pub struct MissingSeparator(pub String);

/// Parses a compiler artifact key of the form `<path>:<shortName>` and
/// returns the short name (the segment following the first `:`).
///
/// An empty segment, as in `A.sol:`, is rejected like a missing `:`.
pub fn short_name(artifact: &str) -> Result<&str, MissingSeparator> {
    let mut segments = artifact.split(':');
    segments.next();
    segments
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| MissingSeparator(artifact.to_string()))
}

/// Payloads the compiler produced for one contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactRecord {
    payloads: BTreeMap<OutputKind, String>,
}

impl ArtifactRecord {
    pub fn insert(&mut self, kind: OutputKind, payload: impl Into<String>) {
        self.payloads.insert(kind, payload.into());
    }

    pub fn get(&self, kind: OutputKind) -> Option<&str> {
        self.payloads.get(&kind).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(OutputKind, S)> for ArtifactRecord {
    fn from_iter<I: IntoIterator<Item = (OutputKind, S)>>(iter: I) -> Self {
        let mut record = ArtifactRecord::default();
        for (kind, payload) in iter {
            record.insert(kind, payload);
        }
        record
    }
}

/// Everything one input file compiled to, keyed by artifact name.
///
/// Sorted by name so generation runs in a stable order.
pub type ContractMap = BTreeMap<String, ArtifactRecord>;

/// One call into a [`crate::driver::BindingGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub short_name: String,
    pub bytecode: String,
    pub abi: String,
    pub output_dir: PathBuf,
    pub package: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_strips_path_prefix() {
        assert_eq!(short_name("contracts/Foo.sol:Foo"), Ok("Foo"));
        assert_eq!(short_name("A.sol:A"), Ok("A"));
    }

    #[test]
    fn short_name_without_separator_is_an_error() {
        let err = short_name("Foo").unwrap_err();
        assert_eq!(err, MissingSeparator("Foo".into()));
        assert_eq!(
            err.to_string(),
            "artifact name `Foo` is not of the form `<path>:<name>`"
        );
    }

    #[test]
    fn short_name_after_trailing_colon_is_an_error() {
        assert_eq!(
            short_name("A.sol:"),
            Err(MissingSeparator("A.sol:".into()))
        );
    }

    #[test]
    fn output_kind_keys_round_trip() {
        for kind in OutputKind::REQUESTED {
            assert_eq!(OutputKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(OutputKind::from_key("srcmap"), None);
    }

    #[test]
    fn record_lookup_by_kind() {
        let record: ArtifactRecord = [(OutputKind::Bin, "6001"), (OutputKind::Abi, "[]")]
            .into_iter()
            .collect();
        assert_eq!(record.get(OutputKind::Bin), Some("6001"));
        assert_eq!(record.get(OutputKind::Metadata), None);
        assert_eq!(record.len(), 2);
    }
}
