// ==============================================================================
// Import Resolution
// ==============================================================================
//
// Loads the transitive closure of a design's imports, assigns every file a
// stable identity derived from its canonical absolute path, and builds the
// per-file name environments and symbol database later stages resolve
// references against.
//
// Resolution order for `imports: alias -> relative/path.asdl` mirrors a
// classpath-free search: first relative to the importing file's directory,
// then each library root in declaration order; first match wins.
//
// Cycles are detected with a visit stack: an import edge that points back
// into the stack aborts resolution with an `IR-004` diagnostic listing the
// cycle, and no graph is returned.

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::ast::AsdlDocument;
use crate::diagnostics::{Diagnostic, SourceSpan, has_error};
use crate::parser::DocumentParser;

const SOURCE: &str = "imports";

/// Stable identity of a loaded file: its canonical absolute path.
pub type FileId = String;

/// Symbols declared by one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSymbols {
    pub modules: IndexSet<String>,
    pub devices: IndexSet<String>,
}

/// Declared module/device symbol names per file.
#[derive(Debug, Clone, Default)]
pub struct ProgramDb {
    pub files: IndexMap<FileId, FileSymbols>,
}

impl ProgramDb {
    pub fn symbols(&self, file: &str) -> Option<&FileSymbols> {
        self.files.get(file)
    }
}

/// Output of import resolution: every document keyed by file identity, the
/// per-file alias environments, the symbol database, and the entry point.
#[derive(Debug)]
pub struct ImportGraph {
    pub documents: IndexMap<FileId, AsdlDocument>,
    pub name_envs: IndexMap<FileId, IndexMap<String, FileId>>,
    pub symbols: ProgramDb,
    pub entry: FileId,
}

impl ImportGraph {
    pub fn entry_document(&self) -> &AsdlDocument {
        &self.documents[&self.entry]
    }
}

// ==============================================================================
// Resolver
// ==============================================================================

struct Resolver<'a> {
    parser: &'a DocumentParser,
    lib_roots: &'a [PathBuf],
    documents: IndexMap<FileId, AsdlDocument>,
    name_envs: IndexMap<FileId, IndexMap<String, FileId>>,
    visit_stack: Vec<FileId>,
    diagnostics: Vec<Diagnostic>,
    cycle_found: bool,
}

fn canonical_id(path: &Path) -> FileId {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

impl Resolver<'_> {
    /// Probe import candidates in order: relative to the importing file's
    /// directory, then each library root.
    fn probe(&self, import_path: &str, current_dir: &Path) -> Option<PathBuf> {
        let relative = current_dir.join(import_path);
        if relative.exists() {
            return Some(relative);
        }
        for root in self.lib_roots {
            let candidate = root.join(import_path);
            if candidate.exists() {
                return Some(candidate);
            }
        }
        None
    }

    /// Parse `path` and recurse into its imports. Returns the file id even
    /// when the file produced diagnostics, so the caller can still record
    /// the name-environment edge.
    fn load(&mut self, path: &Path) -> Option<FileId> {
        let file_id = canonical_id(path);

        if self.visit_stack.contains(&file_id) {
            let mut cycle: Vec<&str> = self
                .visit_stack
                .iter()
                .skip_while(|id| **id != file_id)
                .map(String::as_str)
                .collect();
            cycle.push(&file_id);
            self.diagnostics.push(
                Diagnostic::error(
                    "IR-004",
                    format!("Import cycle detected: {}.", cycle.join(" -> ")),
                    Some(SourceSpan::file_only(file_id.clone())),
                )
                .with_source(SOURCE),
            );
            self.cycle_found = true;
            return None;
        }
        if self.documents.contains_key(&file_id) {
            return Some(file_id);
        }

        debug!(file = %file_id, "parsing import");
        let (document, parse_diags) = self.parser.parse_file(path);
        self.diagnostics.extend(parse_diags);
        let Some(document) = document else {
            return None;
        };

        let current_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        self.visit_stack.push(file_id.clone());
        let mut env: IndexMap<String, FileId> = IndexMap::new();
        for (alias, import_path) in &document.imports {
            let loc = document.import_locs.get(alias);
            match self.probe(import_path, &current_dir) {
                Some(resolved) => {
                    if let Some(imported_id) = self.load(&resolved) {
                        env.insert(alias.clone(), imported_id);
                    }
                }
                None => {
                    self.diagnostics.push(
                        Diagnostic::error(
                            "IR-005",
                            format!(
                                "Import '{alias}' could not be resolved: '{import_path}' not \
                                 found relative to '{}' or in {} library root(s).",
                                current_dir.display(),
                                self.lib_roots.len()
                            ),
                            loc.and_then(|l| l.to_source_span()),
                        )
                        .with_source(SOURCE),
                    );
                }
            }
            if self.cycle_found {
                break;
            }
        }
        self.visit_stack.pop();

        self.name_envs.insert(file_id.clone(), env);
        self.documents.insert(file_id.clone(), document);
        Some(file_id)
    }

    /// LINT-001: import aliases that no qualified reference or model alias
    /// ever uses.
    fn lint_unused_imports(&mut self) {
        for (file_id, document) in &self.documents {
            if document.imports.is_empty() {
                continue;
            }
            let mut used: IndexSet<&str> = IndexSet::new();
            for target in document.model_alias.values() {
                if let Some((alias, _)) = target.split_once('.') {
                    used.insert(alias);
                }
            }
            for module in document.modules.values() {
                for instance in module.instances.iter().flat_map(IndexMap::values) {
                    if let Some((alias, _)) = instance.model.split_once('.') {
                        used.insert(alias);
                    }
                }
            }
            for alias in document.imports.keys() {
                if !used.contains(alias.as_str()) {
                    let loc = document.import_locs.get(alias);
                    self.diagnostics.push(
                        Diagnostic::warning(
                            "LINT-001",
                            format!("Import alias '{alias}' is never used in '{file_id}'."),
                            loc.and_then(|l| l.to_source_span()),
                        )
                        .with_source(SOURCE),
                    );
                }
            }
        }
    }
}

/// Load `entry` and its transitive imports.
///
/// Returns `(None, diagnostics)` when resolution fails — a cycle, an
/// unreadable file, or parse errors in any file of the closure.
pub fn resolve_import_graph(
    entry: &Path,
    lib_roots: &[PathBuf],
    parser: &DocumentParser,
) -> (Option<ImportGraph>, Vec<Diagnostic>) {
    let mut resolver = Resolver {
        parser,
        lib_roots,
        documents: IndexMap::new(),
        name_envs: IndexMap::new(),
        visit_stack: Vec::new(),
        diagnostics: Vec::new(),
        cycle_found: false,
    };

    let entry_id = resolver.load(entry);
    resolver.lint_unused_imports();

    let Some(entry_id) = entry_id else {
        return (None, resolver.diagnostics);
    };
    if resolver.cycle_found || has_error(&resolver.diagnostics) {
        return (None, resolver.diagnostics);
    }

    let mut symbols = ProgramDb::default();
    for (file_id, document) in &resolver.documents {
        symbols.files.insert(
            file_id.clone(),
            FileSymbols {
                modules: document.modules.keys().cloned().collect(),
                devices: document.devices.keys().cloned().collect(),
            },
        );
    }

    let graph = ImportGraph {
        documents: resolver.documents,
        name_envs: resolver.name_envs,
        symbols,
        entry: entry_id,
    };
    (Some(graph), resolver.diagnostics)
}
