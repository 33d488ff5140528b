// ==============================================================================
// AST: Parsed ASDL Documents
// ==============================================================================
//
// The parser turns YAML into these structures without performing semantic
// validation; every declaration carries a `Locatable` so later stages can
// attach precise spans to their diagnostics. All maps are `IndexMap` —
// declaration order is meaningful throughout (port order, emission order,
// deterministic ids).

use indexmap::IndexMap;
use serde::Serialize;

use crate::diagnostics::{SourcePos, SourceSpan};

// ==============================================================================
// Source Locations
// ==============================================================================

/// File/line/column attachment for an AST node. Line and column are 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Locatable {
    pub file: Option<String>,
    pub start_line: Option<u32>,
    pub start_col: Option<u32>,
    pub end_line: Option<u32>,
    pub end_col: Option<u32>,
}

impl Locatable {
    pub fn new(file: Option<String>, line: u32, col: u32) -> Self {
        Locatable {
            file,
            start_line: Some(line),
            start_col: Some(col),
            end_line: Some(line),
            end_col: Some(col),
        }
    }

    /// Convert to a diagnostic span. Returns `None` when the location has
    /// neither a file nor a position.
    pub fn to_source_span(&self) -> Option<SourceSpan> {
        let file = self.file.clone()?;
        match (self.start_line, self.start_col) {
            (Some(line), Some(col)) => {
                let start = SourcePos::new(line, col);
                let end = match (self.end_line, self.end_col) {
                    (Some(el), Some(ec)) => SourcePos::new(el, ec),
                    _ => start,
                };
                Some(SourceSpan::range(file, start, end))
            }
            _ => Some(SourceSpan::file_only(file)),
        }
    }
}

// ==============================================================================
// Parameter Values
// ==============================================================================

/// Free-form scalar/collection value used for parameters, variables, and
/// metadata. During template substitution values coerce to strings with a
/// fixed rule set (`true`/`false` for booleans, canonical decimal for
/// numbers).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ParamValue>),
    Map(IndexMap<String, ParamValue>),
}

impl ParamValue {
    /// String form used in SPICE output and template substitution.
    pub fn to_spice_string(&self) -> String {
        match self {
            ParamValue::Null => String::new(),
            ParamValue::Bool(true) => "true".to_string(),
            ParamValue::Bool(false) => "false".to_string(),
            ParamValue::Int(value) => value.to_string(),
            ParamValue::Float(value) => value.to_string(),
            ParamValue::Str(value) => value.clone(),
            // Collections have no SPICE form; fall back to JSON so the
            // output at least round-trips for debugging.
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

// ==============================================================================
// File Metadata
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub metadata: IndexMap<String, ParamValue>,
    #[serde(skip)]
    pub loc: Locatable,
}

// ==============================================================================
// Ports
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    In,
    Out,
    InOut,
}

impl PortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "in" => Some(PortDirection::In),
            "out" => Some(PortDirection::Out),
            "in_out" => Some(PortDirection::InOut),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PortDirection::In => "in",
            PortDirection::Out => "out",
            PortDirection::InOut => "in_out",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortType {
    #[default]
    Signal,
    Power,
    Ground,
    Bias,
    Control,
}

impl PortType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "signal" => Some(PortType::Signal),
            "power" => Some(PortType::Power),
            "ground" => Some(PortType::Ground),
            "bias" => Some(PortType::Bias),
            "control" => Some(PortType::Control),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortDecl {
    pub dir: PortDirection,
    #[serde(rename = "type")]
    pub port_type: PortType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ParamValue>,
    #[serde(skip)]
    pub loc: Locatable,
}

// ==============================================================================
// Instances, Nets, Modules
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceDecl {
    pub model: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub mappings: IndexMap<String, String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParamValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ParamValue>,
    #[serde(skip)]
    pub loc: Locatable,
}

/// One entry of a net's YAML endpoint list. A nested sublist becomes a
/// `Group`, remembered so lowering can attach group-slice annotations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EndpointItem {
    Single(String),
    Group(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetDecl {
    pub endpoints: Vec<EndpointItem>,
    #[serde(skip)]
    pub loc: Locatable,
    /// Locations of the top-level endpoint items, parallel to `endpoints`.
    #[serde(skip)]
    pub endpoint_locs: Vec<Locatable>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModuleDecl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub ports: IndexMap<String, PortDecl>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub internal_nets: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParamValue>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ParamValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spice_template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instances: Option<IndexMap<String, InstanceDecl>>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub nets: IndexMap<String, NetDecl>,
    /// Named pattern fragments referenced as `<@alias>`.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub patterns: IndexMap<String, String>,
    /// Default port bindings keyed by instance model reference.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub instance_defaults: IndexMap<String, IndexMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ParamValue>,
    #[serde(skip)]
    pub loc: Locatable,
}

impl ModuleDecl {
    /// A primitive module binds to a SPICE template and is expanded inline.
    pub fn is_primitive(&self) -> bool {
        self.spice_template.is_some()
    }

    /// A hierarchical module contains instances and emits as a `.subckt`.
    pub fn is_hierarchical(&self) -> bool {
        self.instances.is_some()
    }

    /// Port names in declaration order.
    pub fn port_names(&self) -> Vec<&str> {
        self.ports.keys().map(String::as_str).collect()
    }
}

// ==============================================================================
// Devices
// ==============================================================================

/// Backend/PDK descriptor. Devices resolve like modules in instance
/// references; their named backends each carry a SPICE template.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeviceDecl {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParamValue>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ParamValue>,
    /// Backend name to SPICE template.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub backends: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdk: Option<String>,
    #[serde(skip)]
    pub loc: Locatable,
}

// ==============================================================================
// Document Root
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AsdlDocument {
    pub file_info: FileInfo,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub imports: IndexMap<String, String>,
    /// Key locations of the `imports` section, parallel to `imports`.
    #[serde(skip)]
    pub import_locs: IndexMap<String, Locatable>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub model_alias: IndexMap<String, String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub modules: IndexMap<String, ModuleDecl>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub devices: IndexMap<String, DeviceDecl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ParamValue>,
    #[serde(skip)]
    pub loc: Locatable,
}

impl AsdlDocument {
    /// Name of the intended entry-point module, if declared.
    pub fn top_module(&self) -> Option<&str> {
        self.file_info.top_module.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn locatable_to_span_uses_start_as_end_fallback() {
        let loc = Locatable {
            file: Some("a.asdl".to_string()),
            start_line: Some(3),
            start_col: Some(5),
            end_line: None,
            end_col: None,
        };
        let span = loc.to_source_span().expect("has file and position");
        assert_eq!(span.start, Some(SourcePos::new(3, 5)));
        assert_eq!(span.end, Some(SourcePos::new(3, 5)));
    }

    #[test]
    fn locatable_without_file_has_no_span() {
        let loc = Locatable {
            start_line: Some(1),
            start_col: Some(1),
            ..Locatable::default()
        };
        assert_eq!(loc.to_source_span(), None);
    }

    #[test]
    fn param_value_spice_strings() {
        assert_eq!(ParamValue::Bool(true).to_spice_string(), "true");
        assert_eq!(ParamValue::Bool(false).to_spice_string(), "false");
        assert_eq!(ParamValue::Int(42).to_spice_string(), "42");
        assert_eq!(ParamValue::Float(1.5).to_spice_string(), "1.5");
        assert_eq!(ParamValue::from("2k").to_spice_string(), "2k");
    }

    #[test]
    fn module_kind_predicates() {
        let primitive = ModuleDecl {
            spice_template: Some("R{name} {a} {b} {R}".to_string()),
            ..ModuleDecl::default()
        };
        assert!(primitive.is_primitive());
        assert!(!primitive.is_hierarchical());

        let hierarchical = ModuleDecl {
            instances: Some(IndexMap::new()),
            ..ModuleDecl::default()
        };
        assert!(hierarchical.is_hierarchical());
        assert!(!hierarchical.is_primitive());
    }
}
