//! Emit a Rust module per contract.
//!
//! Output lands in `<output>/<package as dirs>/<snake_name>.rs`, and the
//! package directory's `mod.rs` is rewritten to declare every module in it.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use heck::{ToSnakeCase, ToUpperCamelCase};

use super::abi::{self, AbiEntry, EntryKind, Param};
use crate::driver::BindingGenerator;
use crate::model::GenerationRequest;

#[derive(Debug, Default, Clone, Copy)]
pub struct RustBindings;

impl BindingGenerator for RustBindings {
    fn generate(&self, request: &GenerationRequest) -> Result<()> {
        let entries = abi::parse(&request.abi)
            .with_context(|| format!("Parsing ABI of `{}`", request.short_name))?;

        let dir = package_dir(&request.output_dir, &request.package);
        fs::create_dir_all(&dir).with_context(|| format!("Creating {}", dir.display()))?;

        let name = type_name(&request.short_name)?;
        let path = dir.join(format!("{}.rs", module_stem(&name)));
        let source = render(&name, request, &entries)?;
        fs::write(&path, source).with_context(|| format!("Writing {}", path.display()))?;

        write_mod_file(&dir)
    }
}

pub fn package_dir(output_dir: &Path, package: &str) -> PathBuf {
    package
        .split('.')
        .fold(output_dir.to_path_buf(), |dir, segment| dir.join(segment))
}

fn sanitize_ident(ident: &str) -> String {
    ident
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect()
}

/// Keywords that can still be used as raw identifiers (`r#match`).
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Path keywords, which are not valid even as raw identifiers.
const PATH_KEYWORDS: &[&str] = &["self", "super", "crate"];

fn type_name(short_name: &str) -> Result<String> {
    let name = sanitize_ident(short_name).to_upper_camel_case();
    match name.chars().next() {
        Some(c) if c.is_ascii_alphabetic() && name != "Self" => Ok(name),
        _ => Err(anyhow!("`{short_name}` cannot be used as a type name")),
    }
}

/// File stem of the module generated for `type_name`.
fn module_stem(type_name: &str) -> String {
    let stem = type_name.to_snake_case();
    if PATH_KEYWORDS.contains(&stem.as_str()) {
        format!("{stem}_")
    } else {
        stem
    }
}

/// Identifier declaring the module stored in `<stem>.rs`.
fn module_ident(stem: &str) -> String {
    if RAW_KEYWORDS.contains(&stem) {
        format!("r#{stem}")
    } else {
        stem.to_string()
    }
}

/// Variant names for `items`, suffixed with a counter when overloaded.
fn variant_names<'a>(items: impl Iterator<Item = &'a AbiEntry>, fallback: &str) -> Vec<String> {
    let mut used = HashSet::from(["Self".to_string()]);
    items
        .enumerate()
        .map(|(idx, entry)| {
            let mut base = sanitize_ident(&entry.name).to_upper_camel_case();
            if !base.starts_with(|c: char| c.is_ascii_alphabetic()) {
                base = format!("{fallback}{idx}");
            }
            let mut name = base.clone();
            let mut suffix = 1;
            while used.contains(&name) {
                name = format!("{base}{suffix}");
                suffix += 1;
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

fn describe_params(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| {
            let indexed = if p.indexed { " indexed" } else { "" };
            if p.name.is_empty() {
                format!("{}{indexed}", p.canonical_type())
            } else {
                format!("{}{indexed} {}", p.canonical_type(), p.name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn render(type_name: &str, request: &GenerationRequest, entries: &[AbiEntry]) -> Result<String> {
    let mut out = String::new();

    writeln!(out, "// Auto-generated by solbind - DO NOT EDIT")?;
    writeln!(out, "//! Bindings for the `{}` contract.\n", request.short_name)?;

    writeln!(out, "/// Deployable bytecode, hex encoded.")?;
    writeln!(out, "pub const BINARY: &str = {:?};\n", request.bytecode)?;
    writeln!(out, "/// JSON interface description.")?;
    writeln!(out, "pub const ABI: &str = {:?};\n", request.abi)?;

    writeln!(out, "pub struct {type_name};\n")?;

    let constructor = entries.iter().find(|e| e.kind == EntryKind::Constructor);
    let has_fallback = entries.iter().any(|e| e.kind == EntryKind::Fallback);
    let has_receive = entries.iter().any(|e| e.kind == EntryKind::Receive);
    writeln!(out, "impl {type_name} {{")?;
    writeln!(
        out,
        "    pub const CONSTRUCTOR: &'static str = {:?};",
        constructor.map_or_else(|| "constructor()".to_string(), AbiEntry::signature)
    )?;
    writeln!(out, "    pub const HAS_FALLBACK: bool = {has_fallback};")?;
    writeln!(out, "    pub const HAS_RECEIVE: bool = {has_receive};")?;
    writeln!(out, "}}")?;

    let functions: Vec<&AbiEntry> = entries
        .iter()
        .filter(|e| e.kind == EntryKind::Function)
        .collect();
    let names = variant_names(functions.iter().copied(), "Function");
    let docs = functions.iter().map(|f| {
        let returns = if f.outputs.is_empty() {
            String::new()
        } else {
            format!(" returns ({})", describe_params(&f.outputs))
        };
        format!(
            "`{}({}){}`, {}",
            f.name,
            describe_params(&f.inputs),
            returns,
            f.mutability()
        )
    });
    let rows: Vec<_> = functions
        .iter()
        .zip(&names)
        .zip(docs)
        .map(|((f, name), doc)| (name.as_str(), f.signature(), doc))
        .collect();
    render_enum(&mut out, &format!("{type_name}Function"), &rows)?;

    let events: Vec<&AbiEntry> = entries
        .iter()
        .filter(|e| e.kind == EntryKind::Event)
        .collect();
    let names = variant_names(events.iter().copied(), "Event");
    let rows: Vec<_> = events
        .iter()
        .zip(&names)
        .map(|(e, name)| {
            let anonymous = if e.anonymous { " (anonymous)" } else { "" };
            let doc = format!("`{}({})`{anonymous}", e.name, describe_params(&e.inputs));
            (name.as_str(), e.signature(), doc)
        })
        .collect();
    render_enum(&mut out, &format!("{type_name}Event"), &rows)?;

    Ok(out)
}

fn render_enum(out: &mut String, name: &str, rows: &[(&str, String, String)]) -> Result<()> {
    if rows.is_empty() {
        return Ok(());
    }

    writeln!(out, "\n#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]")?;
    writeln!(out, "pub enum {name} {{")?;
    for (variant, _, doc) in rows {
        writeln!(out, "    /// {doc}")?;
        writeln!(out, "    {variant},")?;
    }
    writeln!(out, "}}\n")?;

    writeln!(out, "impl {name} {{")?;
    writeln!(out, "    pub const ALL: &'static [{name}] = &[")?;
    for (variant, _, _) in rows {
        writeln!(out, "        {name}::{variant},")?;
    }
    writeln!(out, "    ];\n")?;
    writeln!(out, "    /// Canonical signature, e.g. `transfer(address,uint256)`.")?;
    writeln!(out, "    pub fn signature(self) -> &'static str {{")?;
    writeln!(out, "        match self {{")?;
    for (variant, signature, _) in rows {
        writeln!(out, "            {name}::{variant} => {signature:?},")?;
    }
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    Ok(())
}

/// Rewrites `mod.rs` in `dir` so it declares every generated module there.
fn write_mod_file(dir: &Path) -> Result<()> {
    let mut modules = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Reading {}", dir.display()))? {
        let path = entry?.path();
        let stem = path.file_stem().and_then(|s| s.to_str());
        if let (Some(stem), Some("rs")) = (stem, path.extension().and_then(|e| e.to_str())) {
            if stem != "mod" {
                modules.push(stem.to_string());
            }
        }
    }
    modules.sort();

    let mut out = String::from("// Auto-generated by solbind - DO NOT EDIT\n");
    for module in &modules {
        writeln!(out, "pub mod {};", module_ident(module))?;
    }
    let path = dir.join("mod.rs");
    fs::write(&path, out).with_context(|| format!("Writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ABI: &str = r#"[
        {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"value","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
        {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"}],"outputs":[],"stateMutability":"payable"},
        {"type":"event","name":"Transfer","inputs":[{"indexed":true,"name":"from","type":"address"}]}
    ]"#;

    fn request(out: &Path, name: &str, abi: &str) -> GenerationRequest {
        GenerationRequest {
            short_name: name.into(),
            bytecode: "600160015".into(),
            abi: abi.into(),
            output_dir: out.to_path_buf(),
            package: "org.example.model".into(),
        }
    }

    #[test]
    fn package_maps_to_directories() {
        assert_eq!(
            package_dir(Path::new("out"), "org.example.model"),
            Path::new("out/org/example/model")
        );
    }

    #[test]
    fn type_names() {
        assert_eq!(type_name("MetaCoin").unwrap(), "MetaCoin");
        assert_eq!(type_name("erc20_token").unwrap(), "Erc20Token");
        assert!(type_name("$$").is_err());
    }

    #[test]
    fn overloaded_functions_get_distinct_variants() {
        let entries = abi::parse(ABI).unwrap();
        let names = variant_names(entries.iter().filter(|e| e.kind == EntryKind::Function), "F");
        assert_eq!(names, vec!["Transfer", "Transfer1"]);

        let abi = r#"[
            {"type":"function","name":"foo","inputs":[]},
            {"type":"function","name":"foo1","inputs":[]},
            {"type":"function","name":"foo","inputs":[{"name":"x","type":"uint8"}]},
            {"type":"function","name":"self","inputs":[]}
        ]"#;
        let entries = abi::parse(abi).unwrap();
        let names = variant_names(entries.iter(), "F");
        assert_eq!(names, vec!["Foo", "Foo1", "Foo2", "Self1"]);
    }

    #[test]
    fn keyword_contract_names() {
        assert!(type_name("Self").is_err());
        assert_eq!(module_stem("Match"), "match");
        assert_eq!(module_ident("match"), "r#match");
        assert_eq!(module_stem("Crate"), "crate_");
        assert_eq!(module_ident("crate_"), "crate_");
        assert_eq!(module_ident("meta_coin"), "meta_coin");
    }

    #[test]
    fn keyword_modules_are_declared_raw() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Match", "Crate", "MetaCoin"] {
            RustBindings
                .generate(&request(dir.path(), name, "[]"))
                .expect("generated");
        }

        let pkg = dir.path().join("org/example/model");
        assert!(pkg.join("match.rs").is_file());
        assert!(pkg.join("crate_.rs").is_file());
        let mod_rs = fs::read_to_string(pkg.join("mod.rs")).unwrap();
        assert!(mod_rs.ends_with("pub mod crate_;\npub mod r#match;\npub mod meta_coin;\n"));
        let src = fs::read_to_string(pkg.join("match.rs")).unwrap();
        assert!(src.contains("pub struct Match;"));
    }

    #[test]
    fn renders_constants_and_signatures() {
        let req = request(Path::new("out"), "MetaCoin", ABI);
        let src = render("MetaCoin", &req, &abi::parse(ABI).unwrap()).unwrap();

        assert!(src.contains("pub const BINARY: &str = \"600160015\";"));
        assert!(src.contains("pub struct MetaCoin;"));
        assert!(src.contains("pub const CONSTRUCTOR: &'static str = \"constructor()\";"));
        assert!(src.contains("pub enum MetaCoinFunction {"));
        assert!(src.contains("MetaCoinFunction::Transfer => \"transfer(address,uint256)\","));
        assert!(src.contains("MetaCoinFunction::Transfer1 => \"transfer(address)\","));
        assert!(src.contains("/// `transfer(address to, uint256 value) returns (bool)`, nonpayable"));
        assert!(src.contains("MetaCoinEvent::Transfer => \"Transfer(address)\","));
    }

    #[test]
    fn abi_without_functions_has_no_enums() {
        let req = request(Path::new("out"), "Empty", "[]");
        let src = render("Empty", &req, &[]).unwrap();
        assert!(!src.contains("enum"));
    }

    #[test]
    fn writes_module_and_mod_file() {
        let dir = tempfile::tempdir().unwrap();
        RustBindings
            .generate(&request(dir.path(), "MetaCoin", ABI))
            .expect("generated");
        RustBindings
            .generate(&request(dir.path(), "ConvertLib", "[]"))
            .expect("generated");

        let pkg = dir.path().join("org/example/model");
        assert!(pkg.join("meta_coin.rs").is_file());
        assert!(pkg.join("convert_lib.rs").is_file());
        let mod_rs = fs::read_to_string(pkg.join("mod.rs")).unwrap();
        assert!(mod_rs.ends_with("pub mod convert_lib;\npub mod meta_coin;\n"));
    }

    #[test]
    fn invalid_abi_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = RustBindings
            .generate(&request(dir.path(), "A", "not json"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Parsing ABI of `A`");
    }
}
