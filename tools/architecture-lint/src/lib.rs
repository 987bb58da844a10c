//! Repo-local architectural lint for the crud-kit hexagon.
//!
//! `crud-kit` keeps its contract in `domain` (entities, audit capabilities,
//! ports, the CRUD service) and its storage adapters in `outbound`. This
//! crate parses those modules and reports:
//!
//! - `domain` code that reaches into `outbound` adapters or pulls in a
//!   storage, transport or runtime-specific crate
//! - `outbound` adapters that depend on the driving-side CRUD service
//!
//! Test code is exempt: files named `tests.rs` or `*_tests.rs` and items
//! gated by `#[cfg(test)]` may wire real adapters into domain tests.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use syn::visit::Visit;
use thiserror::Error;

/// Name under which integration code refers to the linted crate.
const CRATE_NAME: &str = "crud_kit";

/// A single boundary violation discovered by the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path relative to `crud/src`.
    pub file: PathBuf,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.file.display(), self.message)
    }
}

/// Failure modes returned by the architecture lint.
#[derive(Debug, Error)]
pub enum ArchitectureLintError {
    /// Filesystem traversal or reading failed.
    #[error("I/O error while linting architecture: {0}")]
    Io(#[from] io::Error),
    /// Rust source parsing failed.
    #[error("failed to parse {} while linting architecture: {message}", file.display())]
    Parse {
        /// File that failed to parse.
        file: PathBuf,
        /// Parser diagnostic.
        message: String,
    },
    /// One or more boundary violations were found.
    #[error("architecture boundary violations:\n{}", render_violations(.0))]
    Violations(Vec<Violation>),
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("- {violation}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lint the crud-kit sources on disk.
///
/// `crate_dir` must be the `crud/` directory at the repository root.
pub fn lint_crate_sources(crate_dir: &Path) -> Result<(), ArchitectureLintError> {
    let src_dir = crate_dir.join("src");
    let sources = collect_lint_sources(&src_dir)?;
    lint_sources(&sources)
}

/// Lint the provided Rust sources. Intended for unit and behaviour tests.
pub fn lint_sources(sources: &[LintSource]) -> Result<(), ArchitectureLintError> {
    let mut violations = Vec::new();

    for source in sources {
        let layer = ModuleLayer::infer_from_path(&source.file).ok_or_else(|| {
            ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: "unable to infer module layer from file path".to_owned(),
            }
        })?;
        if is_test_file(&source.file) {
            continue;
        }
        let parsed =
            syn::parse_file(&source.contents).map_err(|err| ArchitectureLintError::Parse {
                file: source.file.clone(),
                message: err.to_string(),
            })?;
        violations.extend(lint_parsed_source(&source.file, layer, &parsed));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ArchitectureLintError::Violations(violations))
    }
}

/// A Rust source file to be linted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintSource {
    /// Path relative to `crud/src`.
    pub file: PathBuf,
    /// Source text.
    pub contents: String,
}

/// The architectural layer inferred from a file path under `crud/src`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleLayer {
    Domain,
    Outbound,
}

impl ModuleLayer {
    const ROOTS: [&'static str; 2] = ["domain", "outbound"];

    fn infer_from_path(relative_path: &Path) -> Option<Self> {
        let first = relative_path
            .components()
            .next()?
            .as_os_str()
            .to_string_lossy();
        match first.as_ref() {
            "domain" => Some(Self::Domain),
            "outbound" => Some(Self::Outbound),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Outbound => "outbound",
        }
    }

    /// Internal module paths the layer must not reach, as segment prefixes.
    const fn forbidden_module_paths(self) -> &'static [&'static [&'static str]] {
        match self {
            Self::Domain => &[&["outbound"]],
            Self::Outbound => &[&["domain", "crud_service"], &["domain", "CrudService"]],
        }
    }

    fn forbidden_crate_roots(self) -> BTreeSet<&'static str> {
        match self {
            Self::Domain => BTreeSet::from([
                "actix_web",
                "axum",
                "diesel",
                "diesel_async",
                "postgres",
                "redis",
                "reqwest",
                "rusqlite",
                "sqlx",
                "tokio_postgres",
            ]),
            Self::Outbound => BTreeSet::from(["actix_web", "axum"]),
        }
    }
}

fn is_test_file(relative_path: &Path) -> bool {
    relative_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem == "tests" || stem.ends_with("_tests"))
}

fn lint_parsed_source(file: &Path, layer: ModuleLayer, parsed: &syn::File) -> Vec<Violation> {
    let forbidden_crates = layer.forbidden_crate_roots();
    let layer_name = layer.name();

    let mut collector = PathCollector::default();
    collector.visit_file(parsed);

    let mut messages = BTreeSet::new();
    for segments in &collector.paths {
        if let Some(internal) = internal_module_path(segments) {
            for forbidden in layer.forbidden_module_paths() {
                if internal.starts_with(forbidden) {
                    messages.insert(format!(
                        "{layer_name} module must not depend on crate::{}",
                        forbidden.join("::")
                    ));
                }
            }
        }

        if let Some(root) = external_crate_root(segments) {
            if let Some(forbidden) = forbidden_crates.get(root) {
                messages.insert(format!(
                    "{layer_name} module must not depend on external crate `{forbidden}`"
                ));
            }
        }
    }

    messages
        .into_iter()
        .map(|message| Violation {
            file: file.to_path_buf(),
            message,
        })
        .collect()
}

fn is_relative_module_segment(segment: &str) -> bool {
    matches!(segment, "crate" | "self" | "super")
}

/// Segments of an internal path with any `crate::`/`crud_kit::` prefix
/// removed, starting at a layer root.
fn internal_module_path(segments: &[String]) -> Option<Vec<&str>> {
    let first = segments.first()?.as_str();
    let start = if ModuleLayer::ROOTS.contains(&first) {
        0
    } else if first == CRATE_NAME {
        1
    } else if is_relative_module_segment(first) {
        segments
            .iter()
            .position(|segment| !is_relative_module_segment(segment.as_str()))?
    } else {
        return None;
    };
    let rest: Vec<&str> = segments.get(start..)?.iter().map(String::as_str).collect();
    rest.first()
        .is_some_and(|root| ModuleLayer::ROOTS.contains(root))
        .then_some(rest)
}

fn external_crate_root(segments: &[String]) -> Option<&str> {
    let root = segments.first()?.as_str();
    if is_relative_module_segment(root) || root == CRATE_NAME {
        return None;
    }
    Some(root)
}

fn is_test_gated(attrs: &[syn::Attribute]) -> bool {
    attrs.iter().any(|attr| {
        attr.path().is_ident("cfg")
            && attr
                .parse_args::<syn::Meta>()
                .is_ok_and(|meta| meta.path().is_ident("test"))
    })
}

#[derive(Default)]
struct PathCollector {
    paths: BTreeSet<Vec<String>>,
}

impl PathCollector {
    fn record_path(&mut self, path: &syn::Path) {
        let segments = path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect::<Vec<_>>();
        if segments.is_empty() {
            return;
        }
        self.paths.insert(segments);
    }

    fn record_use_tree(&mut self, tree: &syn::UseTree, prefix: Vec<String>) {
        match tree {
            syn::UseTree::Path(path) => {
                let mut next = prefix;
                next.push(path.ident.to_string());
                self.record_use_tree(&path.tree, next);
            }
            syn::UseTree::Name(name) => {
                let mut segments = prefix;
                segments.push(name.ident.to_string());
                self.paths.insert(segments);
            }
            syn::UseTree::Rename(rename) => {
                let mut segments = prefix;
                segments.push(rename.ident.to_string());
                self.paths.insert(segments);
            }
            syn::UseTree::Glob(_) => {
                let mut segments = prefix;
                segments.push("*".to_owned());
                self.paths.insert(segments);
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.record_use_tree(item, prefix.clone());
                }
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathCollector {
    fn visit_path(&mut self, node: &'ast syn::Path) {
        self.record_path(node);
        syn::visit::visit_path(self, node);
    }

    fn visit_item_use(&mut self, node: &'ast syn::ItemUse) {
        if is_test_gated(&node.attrs) {
            return;
        }
        self.record_use_tree(&node.tree, Vec::new());
    }

    fn visit_item_mod(&mut self, node: &'ast syn::ItemMod) {
        if is_test_gated(&node.attrs) {
            return;
        }
        syn::visit::visit_item_mod(self, node);
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        if is_test_gated(&node.attrs) {
            return;
        }
        syn::visit::visit_item_fn(self, node);
    }
}

fn collect_lint_sources(src_dir: &Path) -> Result<Vec<LintSource>, ArchitectureLintError> {
    let mut sources = Vec::new();
    for layer_dir in ModuleLayer::ROOTS {
        let dir = src_dir.join(layer_dir);
        if !dir.exists() {
            continue;
        }
        collect_sources_under(src_dir, &dir, &mut sources)?;
    }
    Ok(sources)
}

fn collect_sources_under(
    src_root: &Path,
    current: &Path,
    sources: &mut Vec<LintSource>,
) -> Result<(), ArchitectureLintError> {
    for entry in fs::read_dir(current)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_sources_under(src_root, &path, sources)?;
            continue;
        }

        if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
            continue;
        }

        let relative = path
            .strip_prefix(src_root)
            .map_err(|err| ArchitectureLintError::Parse {
                file: path.clone(),
                message: err.to_string(),
            })?
            .to_path_buf();
        let contents = fs::read_to_string(&path)?;
        sources.push(LintSource {
            file: relative,
            contents,
        });
    }
    Ok(())
}
