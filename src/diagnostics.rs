// ==============================================================================
// Structured Diagnostics: Codes, Spans, Collector, and Renderers
// ==============================================================================
//
// Every compilation stage reports problems through this module. A `Diagnostic`
// is immutable once constructed; the `DiagnosticCollector` is an append-only
// list that preserves emission order and can produce the stable sorted order
// used for all user-facing output.
//
// Codes take the form `<DOMAIN>-<NNN>` (e.g. `PASS-104`) for the pattern and
// IR domains, or the five-digit parser/emitter/validator form `PXXYY`/`GXXYY`/
// `VXXYY` inherited from the original code base. Both forms sort as plain
// strings, which is all the stable order needs.

use std::cmp::Ordering;

use serde_json::{Value, json};
use thiserror::Error;

/// Note attached to a diagnostic when no source span is available. Every
/// span-less diagnostic carries this so renderers never print a bare header
/// with no way to locate the problem.
pub const NO_SPAN_NOTE: &str = "No source span available.";

/// Domains accepted by [`format_code`].
pub const ALLOWED_DOMAINS: &[&str] = &["PARSE", "AST", "IR", "PASS", "EMIT", "LINT", "TOOL"];

// ==============================================================================
// Source Positions and Spans
// ==============================================================================

/// 1-based line/column position in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePos {
    pub line: u32,
    pub col: u32,
}

impl SourcePos {
    pub fn new(line: u32, col: u32) -> Self {
        SourcePos { line, col }
    }
}

/// A file location: path plus optional start/end positions and byte offsets.
///
/// Start and end must be both present or both absent; [`SourceSpan::new`]
/// enforces this. A span with no positions still carries the file path and
/// sorts before span-less diagnostics for the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpan {
    pub file: String,
    pub start: Option<SourcePos>,
    pub end: Option<SourcePos>,
    pub byte_start: Option<usize>,
    pub byte_end: Option<usize>,
}

/// Error returned when a span is constructed with exactly one of start/end.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("span start and end must be both set or both absent")]
pub struct InvalidSpan;

impl SourceSpan {
    pub fn new(
        file: impl Into<String>,
        start: Option<SourcePos>,
        end: Option<SourcePos>,
    ) -> Result<Self, InvalidSpan> {
        if start.is_some() != end.is_some() {
            return Err(InvalidSpan);
        }
        Ok(SourceSpan {
            file: file.into(),
            start,
            end,
            byte_start: None,
            byte_end: None,
        })
    }

    /// Span covering a single position.
    pub fn point(file: impl Into<String>, line: u32, col: u32) -> Self {
        let pos = SourcePos::new(line, col);
        SourceSpan {
            file: file.into(),
            start: Some(pos),
            end: Some(pos),
            byte_start: None,
            byte_end: None,
        }
    }

    /// Span covering `[start, end]` positions in `file`.
    pub fn range(file: impl Into<String>, start: SourcePos, end: SourcePos) -> Self {
        SourceSpan {
            file: file.into(),
            start: Some(start),
            end: Some(end),
            byte_start: None,
            byte_end: None,
        }
    }

    /// Span that names a file but no position within it.
    pub fn file_only(file: impl Into<String>) -> Self {
        SourceSpan {
            file: file.into(),
            start: None,
            end: None,
            byte_start: None,
            byte_end: None,
        }
    }
}

// ==============================================================================
// Severity
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// Sort rank: fatal < error < warning < info.
    pub fn sort_rank(self) -> u8 {
        match self {
            Severity::Fatal => 0,
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

// ==============================================================================
// Diagnostic
// ==============================================================================

/// Secondary location attached to a diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub span: SourceSpan,
    pub message: Option<String>,
}

/// Suggested textual replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct FixIt {
    pub span: SourceSpan,
    pub replacement: String,
    pub message: Option<String>,
}

/// A single structured diagnostic. Treat as frozen after construction: the
/// collector never rewrites or merges entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub code: String,
    pub severity: Severity,
    pub message: String,
    pub primary_span: Option<SourceSpan>,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    pub help: Option<String>,
    pub fixits: Vec<FixIt>,
    /// Stage that emitted the diagnostic (`"parser"`, `"core"`, ...).
    pub source: Option<&'static str>,
}

impl Diagnostic {
    /// Build a diagnostic. A missing span automatically attaches the
    /// [`NO_SPAN_NOTE`] note.
    pub fn new(
        code: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        primary_span: Option<SourceSpan>,
    ) -> Self {
        let notes = if primary_span.is_none() {
            vec![NO_SPAN_NOTE.to_string()]
        } else {
            Vec::new()
        };
        Diagnostic {
            code: code.into(),
            severity,
            message: message.into(),
            primary_span,
            labels: Vec::new(),
            notes,
            help: None,
            fixits: Vec::new(),
            source: None,
        }
    }

    pub fn error(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Self {
        Diagnostic::new(code, Severity::Error, message, span)
    }

    pub fn warning(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Self {
        Diagnostic::new(code, Severity::Warning, message, span)
    }

    pub fn info(
        code: impl Into<String>,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Self {
        Diagnostic::new(code, Severity::Info, message, span)
    }

    pub fn with_source(mut self, source: &'static str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_label(mut self, span: SourceSpan, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            message: Some(message.into()),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error | Severity::Fatal)
    }
}

// ==============================================================================
// Code Formatting
// ==============================================================================

/// Error from [`format_code`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeError {
    #[error("unknown diagnostic domain `{0}`")]
    UnknownDomain(String),
    #[error("diagnostic number {0} out of range (0..=999)")]
    NumberOutOfRange(i64),
}

/// Format a `<DOMAIN>-<NNN>` diagnostic code, validating the domain against
/// the fixed set and zero-padding the number to three digits.
pub fn format_code(domain: &str, number: i64) -> Result<String, CodeError> {
    if !ALLOWED_DOMAINS.contains(&domain) {
        return Err(CodeError::UnknownDomain(domain.to_string()));
    }
    if !(0..=999).contains(&number) {
        return Err(CodeError::NumberOutOfRange(number));
    }
    Ok(format!("{domain}-{number:03}"))
}

/// Check whether a string is a well-formed `<DOMAIN>-<NNN>` code.
pub fn is_valid_code(code: &str) -> bool {
    let Some((domain, number)) = code.split_once('-') else {
        return false;
    };
    ALLOWED_DOMAINS.contains(&domain)
        && number.len() == 3
        && number.bytes().all(|b| b.is_ascii_digit())
}

// ==============================================================================
// Stable Sort Order
// ==============================================================================

fn sort_key(d: &Diagnostic) -> (u8, &str, u8, u32, u32, u8, &str, &str) {
    let (has_file, file) = match &d.primary_span {
        Some(span) if !span.file.is_empty() => (0, span.file.as_str()),
        _ => (1, ""),
    };
    let (has_span, line, col) = match d.primary_span.as_ref().and_then(|s| s.start) {
        Some(pos) => (0, pos.line, pos.col),
        None => (1, 0, 0),
    };
    (
        has_file,
        file,
        has_span,
        line,
        col,
        d.severity.sort_rank(),
        d.code.as_str(),
        d.message.as_str(),
    )
}

/// Compare two diagnostics in the stable total order used for output:
/// `(has-file, file, has-span, line, col, severity-rank, code, message)`.
pub fn diagnostic_order(a: &Diagnostic, b: &Diagnostic) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/// Return the diagnostics sorted into the stable output order. The sort is
/// stable, so entries comparing equal keep their emission order.
pub fn sort_diagnostics(diagnostics: &[Diagnostic]) -> Vec<Diagnostic> {
    let mut sorted = diagnostics.to_vec();
    sorted.sort_by(diagnostic_order);
    sorted
}

/// True when any diagnostic in the slice is error or fatal severity.
pub fn has_error(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

// ==============================================================================
// Collector
// ==============================================================================

/// Append-only diagnostic sink shared by all pipeline stages.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        DiagnosticCollector::default()
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    /// Diagnostics in the stable sorted order when `ordered`, otherwise in
    /// emission order.
    pub fn to_list(&self, ordered: bool) -> Vec<Diagnostic> {
        if ordered {
            sort_diagnostics(&self.diagnostics)
        } else {
            self.diagnostics.clone()
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_error(&self) -> bool {
        has_error(&self.diagnostics)
    }

    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

// ==============================================================================
// Text Renderer
// ==============================================================================

fn span_coords(span: &SourceSpan) -> String {
    match (span.start, span.end) {
        (Some(start), Some(end)) => {
            format!("{}:{}-{}:{}", start.line, start.col, end.line, end.col)
        }
        _ => span.file.clone(),
    }
}

fn render_text_diagnostic(d: &Diagnostic, out: &mut Vec<String>) {
    let severity = d.severity.as_str();
    match d.primary_span.as_ref() {
        Some(span) if span.start.is_some() && !span.file.is_empty() => {
            let start = span.start.expect("checked above");
            out.push(format!(
                "{}:{}:{}: {severity} {}: {}",
                span.file, start.line, start.col, d.code, d.message
            ));
        }
        _ => out.push(format!("{severity} {}: {}", d.code, d.message)),
    }
    for label in &d.labels {
        let coords = span_coords(&label.span);
        match &label.message {
            Some(message) => out.push(format!("  {message} ({coords})")),
            None => out.push(format!("  ({coords})")),
        }
    }
    for note in &d.notes {
        out.push(format!("  note: {note}"));
    }
    if let Some(help) = &d.help {
        out.push(format!("  help: {help}"));
    }
    for fixit in &d.fixits {
        let coords = span_coords(&fixit.span);
        let replacement = fixit.replacement.replace('\n', "\\n");
        let message = fixit
            .message
            .as_ref()
            .map(|m| format!("{m} "))
            .unwrap_or_default();
        out.push(format!("  fix-it: {message}({coords}) => {replacement}"));
    }
}

/// Render diagnostics as plain text, one header line per diagnostic followed
/// by indented note/help/fix-it lines, in the stable sorted order.
pub fn render_text(diagnostics: &[Diagnostic]) -> String {
    let mut lines = Vec::new();
    for d in sort_diagnostics(diagnostics) {
        render_text_diagnostic(&d, &mut lines);
    }
    lines.join("\n")
}

// ==============================================================================
// JSON Renderer
// ==============================================================================

fn pos_to_json(pos: Option<SourcePos>) -> Value {
    match pos {
        Some(pos) => json!({ "line": pos.line, "col": pos.col }),
        None => Value::Null,
    }
}

fn span_to_json(span: Option<&SourceSpan>) -> Value {
    match span {
        Some(span) => json!({
            "file": span.file,
            "start": pos_to_json(span.start),
            "end": pos_to_json(span.end),
            "byte_start": span.byte_start,
            "byte_end": span.byte_end,
        }),
        None => Value::Null,
    }
}

/// Convert diagnostics into the flat JSON array form, in stable sorted order.
pub fn diagnostics_to_json(diagnostics: &[Diagnostic]) -> Value {
    let records: Vec<Value> = sort_diagnostics(diagnostics)
        .iter()
        .map(|d| {
            json!({
                "code": d.code,
                "severity": d.severity.as_str(),
                "message": d.message,
                "primary_span": span_to_json(d.primary_span.as_ref()),
                "labels": d.labels.iter().map(|label| json!({
                    "span": span_to_json(Some(&label.span)),
                    "message": label.message,
                })).collect::<Vec<_>>(),
                "notes": d.notes,
                "help": d.help,
                "fixits": d.fixits.iter().map(|fixit| json!({
                    "span": span_to_json(Some(&fixit.span)),
                    "replacement": fixit.replacement,
                    "message": fixit.message,
                })).collect::<Vec<_>>(),
                "source": d.source,
            })
        })
        .collect();
    Value::Array(records)
}

/// Render diagnostics as pretty-printed JSON.
pub fn render_json(diagnostics: &[Diagnostic]) -> String {
    serde_json::to_string_pretty(&diagnostics_to_json(diagnostics))
        .expect("diagnostic JSON has no non-serializable values")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(code: &str, severity: Severity, message: &str, span: Option<SourceSpan>) -> Diagnostic {
        Diagnostic::new(code, severity, message, span)
    }

    // =========================================================================
    // Span construction
    // =========================================================================

    #[test]
    fn span_with_only_start_is_rejected() {
        let err = SourceSpan::new("a.asdl", Some(SourcePos::new(1, 1)), None);
        assert_eq!(err, Err(InvalidSpan));
    }

    #[test]
    fn span_with_only_end_is_rejected() {
        let err = SourceSpan::new("a.asdl", None, Some(SourcePos::new(1, 1)));
        assert_eq!(err, Err(InvalidSpan));
    }

    #[test]
    fn span_with_both_or_neither_is_accepted() {
        assert!(SourceSpan::new("a.asdl", None, None).is_ok());
        assert!(
            SourceSpan::new("a.asdl", Some(SourcePos::new(1, 1)), Some(SourcePos::new(1, 4)))
                .is_ok()
        );
    }

    // =========================================================================
    // Code formatting
    // =========================================================================

    #[test]
    fn format_code_pads_to_three_digits() {
        assert_eq!(format_code("PASS", 101).expect("valid"), "PASS-101");
        assert_eq!(format_code("IR", 2).expect("valid"), "IR-002");
    }

    #[test]
    fn format_code_rejects_unknown_domain() {
        assert_eq!(
            format_code("NOPE", 1),
            Err(CodeError::UnknownDomain("NOPE".to_string()))
        );
    }

    #[test]
    fn format_code_rejects_out_of_range_numbers() {
        assert_eq!(format_code("IR", 1000), Err(CodeError::NumberOutOfRange(1000)));
        assert_eq!(format_code("IR", -1), Err(CodeError::NumberOutOfRange(-1)));
    }

    #[test]
    fn is_valid_code_checks_shape() {
        assert!(is_valid_code("PASS-101"));
        assert!(is_valid_code("LINT-001"));
        assert!(!is_valid_code("PASS101"));
        assert!(!is_valid_code("PASS-1"));
        assert!(!is_valid_code("NOPE-001"));
    }

    // =========================================================================
    // Missing-span note
    // =========================================================================

    #[test]
    fn spanless_diagnostic_carries_note() {
        let diag = Diagnostic::error("PASS-101", "bad range", None);
        assert_eq!(diag.notes, vec![NO_SPAN_NOTE.to_string()]);
    }

    #[test]
    fn spanned_diagnostic_has_no_automatic_note() {
        let diag = Diagnostic::error("PASS-101", "bad range", Some(SourceSpan::point("f", 1, 2)));
        assert!(diag.notes.is_empty());
    }

    // =========================================================================
    // Sort order
    // =========================================================================

    #[test]
    fn sort_orders_by_file_then_position_then_severity() {
        let unspanned = d("IR-003", Severity::Error, "no span", None);
        let late = d(
            "P0702",
            Severity::Warning,
            "late",
            Some(SourceSpan::point("a.asdl", 9, 1)),
        );
        let early_warn = d(
            "P0701",
            Severity::Warning,
            "early warn",
            Some(SourceSpan::point("a.asdl", 2, 1)),
        );
        let early_err = d(
            "P0230",
            Severity::Error,
            "early err",
            Some(SourceSpan::point("a.asdl", 2, 1)),
        );
        let other_file = d(
            "P0101",
            Severity::Error,
            "other",
            Some(SourceSpan::point("b.asdl", 1, 1)),
        );

        let sorted = sort_diagnostics(&[
            unspanned.clone(),
            late.clone(),
            early_warn.clone(),
            early_err.clone(),
            other_file.clone(),
        ]);

        assert_eq!(
            sorted,
            vec![early_err, early_warn, late, other_file, unspanned]
        );
    }

    #[test]
    fn sort_is_idempotent_and_stable() {
        let a = d("IR-003", Severity::Error, "first", None);
        let b = d("IR-003", Severity::Error, "first", None);
        let once = sort_diagnostics(&[a.clone(), b.clone()]);
        let twice = sort_diagnostics(&once);
        assert_eq!(once, twice);
    }

    // =========================================================================
    // Collector
    // =========================================================================

    #[test]
    fn collector_preserves_emission_order() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(d("IR-011", Severity::Error, "second in sort order", None));
        collector.extend([d(
            "P0101",
            Severity::Error,
            "first in sort order",
            Some(SourceSpan::point("a.asdl", 1, 1)),
        )]);

        let unordered = collector.to_list(false);
        assert_eq!(unordered[0].code, "IR-011");
        let ordered = collector.to_list(true);
        assert_eq!(ordered[0].code, "P0101");
        assert_eq!(collector.len(), 2);
        assert!(collector.has_error());
    }

    // =========================================================================
    // Renderers
    // =========================================================================

    #[test]
    fn text_render_with_span() {
        let diag = d(
            "P0230",
            Severity::Error,
            "module cannot be both",
            Some(SourceSpan::point("top.asdl", 4, 3)),
        );
        assert_eq!(
            render_text(&[diag]),
            "top.asdl:4:3: error P0230: module cannot be both"
        );
    }

    #[test]
    fn text_render_without_span_includes_note() {
        let diag = Diagnostic::error("PASS-104", "duplicate atom", None);
        assert_eq!(
            render_text(&[diag]),
            "error PASS-104: duplicate atom\n  note: No source span available."
        );
    }

    #[test]
    fn text_render_help_and_labels() {
        let diag = d(
            "PASS-106",
            Severity::Error,
            "cardinality mismatch",
            Some(SourceSpan::point("f.asdl", 3, 5)),
        )
        .with_label(
            SourceSpan::range("f.asdl", SourcePos::new(4, 7), SourcePos::new(4, 12)),
            "endpoint expands to 2 atoms",
        )
        .with_help("make the group sizes match");
        let text = render_text(&[diag]);
        assert!(text.contains("f.asdl:3:5: error PASS-106: cardinality mismatch"));
        assert!(text.contains("  endpoint expands to 2 atoms (4:7-4:12)"));
        assert!(text.contains("  help: make the group sizes match"));
    }

    #[test]
    fn text_render_full_report() {
        let with_span = d(
            "P0230",
            Severity::Error,
            "module cannot be both primitive and hierarchical",
            Some(SourceSpan::point("amp.asdl", 7, 3)),
        )
        .with_help("remove either 'spice_template' or 'instances'");
        let without_span = Diagnostic::error("PASS-104", "duplicate atom 'M1'", None);
        insta::assert_snapshot!(render_text(&[without_span, with_span]), @r"
amp.asdl:7:3: error P0230: module cannot be both primitive and hierarchical
  help: remove either 'spice_template' or 'instances'
error PASS-104: duplicate atom 'M1'
  note: No source span available.
");
    }

    #[test]
    fn json_render_has_expected_keys() {
        let diag = d(
            "P0101",
            Severity::Error,
            "duplicate key",
            Some(SourceSpan::point("x.asdl", 2, 3)),
        )
        .with_source("parser");
        let value = diagnostics_to_json(&[diag]);
        let record = &value[0];
        assert_eq!(record["code"], "P0101");
        assert_eq!(record["severity"], "error");
        assert_eq!(record["primary_span"]["file"], "x.asdl");
        assert_eq!(record["primary_span"]["start"]["line"], 2);
        assert_eq!(record["primary_span"]["start"]["col"], 3);
        assert_eq!(record["source"], "parser");
    }
}
