//! The subset of the JSON ABI the binding writer reads.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    // Very old compilers leave `type` out for functions.
    #[default]
    Function,
    Constructor,
    Event,
    Error,
    Fallback,
    Receive,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    #[serde(rename = "type", default)]
    pub kind: EntryKind,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Param>,
    #[serde(default)]
    pub outputs: Vec<Param>,
    #[serde(default)]
    pub state_mutability: Option<String>,
    #[serde(default)]
    pub constant: bool,
    #[serde(default)]
    pub payable: bool,
    #[serde(default)]
    pub anonymous: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Param {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub components: Vec<Param>,
    #[serde(default)]
    pub indexed: bool,
}

impl Param {
    /// Canonical type as used in signatures; tuples are spelled out as
    /// `(t1,t2)` followed by any array suffix.
    pub fn canonical_type(&self) -> String {
        match self.ty.strip_prefix("tuple") {
            Some(suffix) => format!("({}){}", canonical_list(&self.components), suffix),
            None => self.ty.clone(),
        }
    }
}

pub fn canonical_list(params: &[Param]) -> String {
    params
        .iter()
        .map(Param::canonical_type)
        .collect::<Vec<_>>()
        .join(",")
}

impl AbiEntry {
    /// `name(type1,type2)`, or `constructor(...)` for the constructor.
    pub fn signature(&self) -> String {
        let name = match self.kind {
            EntryKind::Constructor => "constructor",
            _ => self.name.as_str(),
        };
        format!("{}({})", name, canonical_list(&self.inputs))
    }

    pub fn mutability(&self) -> &str {
        match &self.state_mutability {
            Some(m) => m.as_str(),
            None if self.constant => "view",
            None if self.payable => "payable",
            None => "nonpayable",
        }
    }
}

pub fn parse(abi: &str) -> serde_json::Result<Vec<AbiEntry>> {
    serde_json::from_str(abi)
}
