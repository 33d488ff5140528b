// ==============================================================================
// Pipeline Driver and Public API
// ==============================================================================
//
// `Compiler` is the crate's front door: a non-consuming builder configured
// with library roots and a top-module override, with one terminal method per
// pipeline. Every stage returns `(artifact, diagnostics)`; the driver checks
// for error severity between stages and stops feeding artifacts forward once
// any error exists — later stages only ever see clean inputs.
//
// Stages themselves never panic by design; a panic is a compiler bug, and
// `catch_internal` converts it into a single `TOOL-999` diagnostic at this
// boundary instead of unwinding into the caller.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::air::{AtomizedProgram, build_atomized_graph};
use crate::ast::AsdlDocument;
use crate::diagnostics::{Diagnostic, DiagnosticCollector};
use crate::elaborate::build_elaborated_document;
use crate::emit::{EmitOptions, TopStyle, emit_spice};
use crate::imports::resolve_import_graph;
use crate::lower::build_patterned_graph;
use crate::netlist::build_netlist_design;
use crate::parser::DocumentParser;
use crate::validator::validate_document;

/// Outcome of a `validate` run.
#[derive(Debug)]
pub struct CompileReport {
    pub ok: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compiler front door.
///
/// Follows the non-consuming builder pattern: configuration methods take
/// `&mut self` and return `&mut Self`, so the same builder can drive several
/// compilations.
///
/// ```no_run
/// use asdlc::Compiler;
///
/// let (spice, diagnostics) = Compiler::new()
///     .lib_root("lib/")
///     .netlist("designs/ota.asdl".as_ref());
/// # let _ = (spice, diagnostics);
/// ```
#[derive(Debug, Default)]
pub struct Compiler {
    lib_roots: Vec<PathBuf>,
    top: Option<String>,
    top_style: TopStyle,
    emit_empty_file_info: bool,
}

/// Front half of every pipeline: imports, AST validation, lowering,
/// atomization.
struct FrontArtifacts {
    program: AtomizedProgram,
    entry_document: AsdlDocument,
    entry_file: String,
}

impl Compiler {
    pub fn new() -> Self {
        Compiler::default()
    }

    /// Add a library search root for import resolution. Roots are probed in
    /// the order added, after the importing file's own directory.
    pub fn lib_root(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.lib_roots.push(dir.into());
        self
    }

    /// Override the top module declared in `file_info`.
    pub fn top(&mut self, name: impl Into<String>) -> &mut Self {
        self.top = Some(name.into());
        self
    }

    /// Select how the top module is wrapped in SPICE output.
    pub fn top_style(&mut self, style: TopStyle) -> &mut Self {
        self.top_style = style;
        self
    }

    /// Emit the informational `P0103` diagnostic for empty input files.
    pub fn emit_empty_file_info(&mut self, enabled: bool) -> &mut Self {
        self.emit_empty_file_info = enabled;
        self
    }

    fn front(
        &self,
        entry: &Path,
        collector: &mut DiagnosticCollector,
    ) -> Option<FrontArtifacts> {
        let parser = DocumentParser {
            emit_empty_file_info: self.emit_empty_file_info,
        };

        info!(entry = %entry.display(), "resolving imports");
        let (import_graph, import_diags) =
            resolve_import_graph(entry, &self.lib_roots, &parser);
        collector.extend(import_diags);
        let import_graph = import_graph?;

        info!("validating");
        collector.extend(validate_document(import_graph.entry_document()));
        if collector.has_error() {
            return None;
        }

        info!("lowering to patterned graph");
        let (graph, lower_diags) = build_patterned_graph(&import_graph);
        collector.extend(lower_diags);
        if collector.has_error() {
            return None;
        }

        info!("atomizing");
        let (program, atomize_diags) = build_atomized_graph(&graph);
        collector.extend(atomize_diags);
        if collector.has_error() {
            return None;
        }

        let entry_file = import_graph.entry.clone();
        let entry_document = import_graph.entry_document().clone();
        Some(FrontArtifacts {
            program,
            entry_document,
            entry_file,
        })
    }

    /// Parse, resolve, validate, and atomize without emitting anything.
    pub fn validate(&self, entry: &Path) -> CompileReport {
        let mut collector = DiagnosticCollector::new();
        let _ = self.front(entry, &mut collector);
        CompileReport {
            ok: !collector.has_error(),
            diagnostics: collector.into_inner(),
        }
    }

    /// Run the front half and reconstruct the expanded AST.
    pub fn elaborate(&self, entry: &Path) -> (Option<AsdlDocument>, Vec<Diagnostic>) {
        let mut collector = DiagnosticCollector::new();
        let Some(front) = self.front(entry, &mut collector) else {
            return (None, collector.into_inner());
        };
        let mut document =
            build_elaborated_document(&front.program, &front.entry_document, &front.entry_file);
        if let Some(top) = &self.top {
            document.file_info.top_module = Some(top.clone());
        }
        (Some(document), collector.into_inner())
    }

    /// Run the full pipeline to SPICE text. The text is `None` whenever any
    /// error diagnostic exists — partial output is never handed back as a
    /// success artifact.
    pub fn netlist(&self, entry: &Path) -> (Option<String>, Vec<Diagnostic>) {
        let mut collector = DiagnosticCollector::new();
        let Some(front) = self.front(entry, &mut collector) else {
            return (None, collector.into_inner());
        };

        info!("emitting SPICE");
        let design = build_netlist_design(
            &front.program,
            Some(&front.entry_document.file_info),
            self.top.as_deref(),
            Some(&front.entry_file),
        );
        let (text, emit_diags) = emit_spice(
            &design,
            EmitOptions {
                top_style: self.top_style,
            },
        );
        collector.extend(emit_diags);

        let failed = collector.has_error();
        let diagnostics = collector.into_inner();
        if failed {
            (None, diagnostics)
        } else {
            (Some(text), diagnostics)
        }
    }
}

/// Run `f`, converting a panic into a `TOOL-999` diagnostic. The pipeline
/// never panics on well-formed or malformed input; anything caught here is
/// a compiler bug surfaced as a diagnostic instead of an abort.
pub fn catch_internal<T>(f: impl FnOnce() -> T) -> Result<T, Diagnostic> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let detail = payload
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| payload.downcast_ref::<&str>().copied())
            .unwrap_or("unknown panic");
        Diagnostic::error(
            "TOOL-999",
            format!("Internal compiler error: {detail}."),
            None,
        )
        .with_source("tool")
    })
}
