// ==============================================================================
// Parser: YAML Documents to the ASDL AST
// ==============================================================================
//
// The parser converts ASDL YAML into the raw `ast` structures and performs
// field-level validation only — structural rules across declarations belong
// to the validator, symbol resolution to the lowering stages. Every
// diagnostic points at the YAML key it concerns.
//
// Diagnostic codes follow the five-digit XCCSS scheme: P01xx syntax, P02xx
// schema, P05xx types/enums, P06xx style, P07xx unknown extensions.

use std::path::Path;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::ast::{
    AsdlDocument, DeviceDecl, EndpointItem, FileInfo, InstanceDecl, Locatable, ModuleDecl,
    NetDecl, ParamValue, PortDecl, PortDirection, PortType,
};
use crate::diagnostics::{Diagnostic, SourceSpan};
use crate::yaml::{Mark, YamlNode, YamlValue, load_yaml};

const SOURCE: &str = "parser";

fn model_alias_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*\.[A-Za-z_][A-Za-z0-9_]*$")
            .expect("model alias regex is valid")
    })
}

// ==============================================================================
// Parser Entry Points
// ==============================================================================

/// YAML-to-AST parser. Construction is cheap; the same parser can be reused
/// across files.
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    /// Emit the informational `P0103` diagnostic for empty files.
    pub emit_empty_file_info: bool,
}

impl DocumentParser {
    pub fn new() -> Self {
        DocumentParser::default()
    }

    pub fn parse_file(&self, path: &Path) -> (Option<AsdlDocument>, Vec<Diagnostic>) {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                let diag = Diagnostic::error(
                    "IR-005",
                    format!("Failed to read '{}': {e}", path.display()),
                    Some(SourceSpan::file_only(path.display().to_string())),
                )
                .with_source(SOURCE);
                return (None, vec![diag]);
            }
        };
        self.parse_string(&content, Some(&path.display().to_string()))
    }

    pub fn parse_string(
        &self,
        content: &str,
        file_path: Option<&str>,
    ) -> (Option<AsdlDocument>, Vec<Diagnostic>) {
        let mut cx = Cx {
            file: file_path.map(str::to_string),
            diagnostics: Vec::new(),
        };

        let (root, load_errors) = load_yaml(content);
        for error in &load_errors {
            let loc = error
                .mark
                .map(|m| cx.locatable(m))
                .unwrap_or_else(|| cx.file_locatable());
            cx.error(
                "P0101",
                format!("Invalid YAML syntax: {}.", error.message),
                &loc,
            );
        }
        if !load_errors.is_empty() {
            return (None, cx.diagnostics);
        }

        let root = match root {
            Some(node) if !node.is_null() => node,
            _ => {
                let trimmed = content.trim();
                if self.emit_empty_file_info && (trimmed.is_empty() || trimmed == "---") {
                    let loc = cx.start_locatable();
                    cx.diagnostics.push(
                        Diagnostic::info(
                            "P0103",
                            "The ASDL file is empty. There is nothing to parse.",
                            loc.to_source_span(),
                        )
                        .with_source(SOURCE),
                    );
                }
                return (None, cx.diagnostics);
            }
        };

        if root.as_map().is_none() {
            let loc = cx.start_locatable();
            cx.error(
                "P0102",
                "The root of an ASDL file must be a mapping (a set of key-value pairs).",
                &loc,
            );
            return (None, cx.diagnostics);
        }

        if root.get("file_info").is_none() {
            let loc = cx.start_locatable();
            cx.diagnostics.push(
                Diagnostic::error(
                    "P0201",
                    "'file_info' is a mandatory section and must be present at the top level of the ASDL file.",
                    loc.to_source_span(),
                )
                .with_source(SOURCE)
                .with_help("Add a 'file_info' section with at least a 'top_module' key."),
            );
            return (None, cx.diagnostics);
        }

        let file_info = cx.parse_file_info(&root);
        let (imports, import_locs) = cx.parse_imports(&root);
        let model_alias = cx.parse_model_alias(&root);
        let modules = cx.parse_modules(&root);
        let devices = cx.parse_devices(&root);
        let metadata = root.get("metadata").map(param_value);

        const ALLOWED: &[&str] = &[
            "file_info",
            "imports",
            "model_alias",
            "modules",
            "devices",
            "metadata",
        ];
        for (key, _) in root.as_map().expect("checked above") {
            if let Some(name) = key.as_str()
                && !ALLOWED.contains(&name)
            {
                let loc = cx.locatable(key.mark);
                cx.diagnostics.push(
                    Diagnostic::warning(
                        "P0701",
                        format!(
                            "The top-level section '{name}' is not a recognized ASDL section."
                        ),
                        loc.to_source_span(),
                    )
                    .with_source(SOURCE)
                    .with_help(format!("Recognized sections are: {}.", ALLOWED.join(", "))),
                );
            }
        }

        let document = AsdlDocument {
            file_info,
            imports,
            import_locs,
            model_alias,
            modules,
            devices,
            metadata,
            loc: cx.start_locatable(),
        };
        (Some(document), cx.diagnostics)
    }
}

// ==============================================================================
// Parsing Context
// ==============================================================================

struct Cx {
    file: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Cx {
    fn locatable(&self, mark: Mark) -> Locatable {
        Locatable::new(self.file.clone(), mark.line, mark.col)
    }

    /// Locatable for a map key, with the end column extended past the key
    /// text. An approximation, but enough for caret placement.
    fn key_locatable(&self, parent: &YamlNode, key: &str) -> Locatable {
        match parent.key_mark(key) {
            Some(mark) => {
                let mut loc = self.locatable(mark);
                loc.end_col = Some(mark.col + key.len() as u32);
                loc
            }
            None => self.file_locatable(),
        }
    }

    fn start_locatable(&self) -> Locatable {
        Locatable::new(self.file.clone(), 1, 1)
    }

    fn file_locatable(&self) -> Locatable {
        Locatable {
            file: self.file.clone(),
            ..Locatable::default()
        }
    }

    fn error(&mut self, code: &str, message: impl Into<String>, loc: &Locatable) {
        self.diagnostics.push(
            Diagnostic::error(code, message, loc.to_source_span()).with_source(SOURCE),
        );
    }

    fn warning(&mut self, code: &str, message: impl Into<String>, loc: &Locatable) {
        self.diagnostics.push(
            Diagnostic::warning(code, message, loc.to_source_span()).with_source(SOURCE),
        );
    }

    /// P0702 for any key of `node` not in `allowed`.
    fn check_unknown_fields(&mut self, node: &YamlNode, context: &str, allowed: &[&str]) {
        let Some(pairs) = node.as_map() else { return };
        for (key, _) in pairs {
            if let Some(name) = key.as_str()
                && !allowed.contains(&name)
            {
                let loc = self.locatable(key.mark);
                self.warning(
                    "P0702",
                    format!("{context} contains unknown field '{name}' which is not a recognized field."),
                    &loc,
                );
            }
        }
    }

    /// Resolve a canonical/abbreviated field pair (`parameters`/`params`),
    /// warning with `code` when both are present.
    fn resolve_dual_field(
        &mut self,
        node: &YamlNode,
        context: &str,
        canonical: &str,
        abbreviated: &str,
        code: &str,
    ) -> IndexMap<String, ParamValue> {
        let canonical_node = node.get(canonical);
        let abbreviated_node = node.get(abbreviated);
        if canonical_node.is_some() && abbreviated_node.is_some() {
            let loc = self.key_locatable(node, abbreviated);
            self.warning(
                code,
                format!(
                    "{context} contains both '{canonical}' and '{abbreviated}' fields. \
                     Using '{canonical}' and ignoring '{abbreviated}'."
                ),
                &loc,
            );
        }
        canonical_node
            .or(abbreviated_node)
            .map(param_map)
            .unwrap_or_default()
    }

    // ==========================================================================
    // Sections
    // ==========================================================================

    fn parse_file_info(&mut self, root: &YamlNode) -> FileInfo {
        let node = root.get("file_info").expect("presence checked by caller");
        let loc = self.key_locatable(root, "file_info");
        let Some(pairs) = node.as_map() else {
            self.error(
                "P0202",
                format!(
                    "The 'file_info' section must be a mapping, but found {}.",
                    node.type_name()
                ),
                &loc,
            );
            return FileInfo {
                loc,
                ..FileInfo::default()
            };
        };

        let mut info = FileInfo {
            loc,
            ..FileInfo::default()
        };
        for (key, value) in pairs {
            let Some(name) = key.as_str() else { continue };
            match name {
                "top_module" => info.top_module = value.scalar_string(),
                "doc" => info.doc = value.scalar_string(),
                "author" => info.author = value.scalar_string(),
                "date" => info.date = value.scalar_string(),
                "revision" => info.revision = value.scalar_string(),
                other => {
                    info.metadata.insert(other.to_string(), param_value(value));
                }
            }
        }
        info
    }

    fn parse_imports(
        &mut self,
        root: &YamlNode,
    ) -> (IndexMap<String, String>, IndexMap<String, Locatable>) {
        let mut imports = IndexMap::new();
        let mut locs = IndexMap::new();
        let Some(node) = root.get("imports") else {
            return (imports, locs);
        };
        let Some(pairs) = node.as_map() else {
            let loc = self.key_locatable(root, "imports");
            self.error(
                "P0202",
                format!(
                    "The 'imports' section must be a mapping, but found {}.",
                    node.type_name()
                ),
                &loc,
            );
            return (imports, locs);
        };
        for (key, value) in pairs {
            let Some(alias) = key.as_str() else { continue };
            let loc = self.locatable(key.mark);
            let Some(path) = value.as_str() else {
                self.error(
                    "P0501",
                    format!(
                        "Import '{alias}' path must be a string, got {}.",
                        value.type_name()
                    ),
                    &loc,
                );
                continue;
            };
            if !path.ends_with(".asdl") {
                self.error(
                    "P0502",
                    format!("Import '{alias}' must reference a .asdl file, got '{path}'."),
                    &loc,
                );
                continue;
            }
            imports.insert(alias.to_string(), path.to_string());
            locs.insert(alias.to_string(), loc);
        }
        (imports, locs)
    }

    fn parse_model_alias(&mut self, root: &YamlNode) -> IndexMap<String, String> {
        let mut aliases = IndexMap::new();
        let Some(node) = root.get("model_alias") else {
            return aliases;
        };
        let Some(pairs) = node.as_map() else {
            let loc = self.key_locatable(root, "model_alias");
            self.error(
                "P0202",
                format!(
                    "The 'model_alias' section must be a mapping, but found {}.",
                    node.type_name()
                ),
                &loc,
            );
            return aliases;
        };
        for (key, value) in pairs {
            let Some(local) = key.as_str() else { continue };
            let loc = self.locatable(key.mark);
            let Some(target) = value.as_str() else {
                self.error(
                    "P0503",
                    format!(
                        "Model alias '{local}' must follow 'library.module' format; \
                         expected a string, got {}.",
                        value.type_name()
                    ),
                    &loc,
                );
                continue;
            };
            if !model_alias_regex().is_match(target) {
                self.error(
                    "P0503",
                    format!(
                        "Model alias '{local}' must follow 'library.module' format; got '{target}'."
                    ),
                    &loc,
                );
                continue;
            }
            aliases.insert(local.to_string(), target.to_string());
        }
        aliases
    }

    // ==========================================================================
    // Modules
    // ==========================================================================

    fn parse_modules(&mut self, root: &YamlNode) -> IndexMap<String, ModuleDecl> {
        let mut modules = IndexMap::new();
        let Some(node) = root.get("modules") else {
            return modules;
        };
        let Some(pairs) = node.as_map() else {
            let loc = self.key_locatable(root, "modules");
            self.error(
                "P0202",
                format!(
                    "The 'modules' section must be a mapping, but found {}.",
                    node.type_name()
                ),
                &loc,
            );
            return modules;
        };

        for (key, value) in pairs {
            let Some(name) = key.as_str() else { continue };
            let loc = self.locatable(key.mark);
            let Some(_) = value.as_map() else {
                self.error(
                    "P0202",
                    format!(
                        "Module '{name}' must be a mapping, but found {}.",
                        value.type_name()
                    ),
                    &loc,
                );
                continue;
            };
            if let Some(module) = self.parse_module(name, value, loc) {
                modules.insert(name.to_string(), module);
            }
        }
        modules
    }

    fn parse_module(&mut self, name: &str, node: &YamlNode, loc: Locatable) -> Option<ModuleDecl> {
        let spice_template = node
            .get("spice_template")
            .and_then(YamlNode::scalar_string);
        let has_template = spice_template.is_some();
        let has_instances = node.get("instances").is_some();

        if has_template && has_instances {
            self.error(
                "P0230",
                format!(
                    "Module '{name}' cannot have both 'spice_template' and 'instances'. \
                     Choose one: primitive (spice_template) or hierarchical (instances)."
                ),
                &loc,
            );
            return None;
        }
        if !has_template && !has_instances {
            self.error(
                "P0231",
                format!(
                    "Module '{name}' must have either 'spice_template' (primitive) \
                     or 'instances' (hierarchical)."
                ),
                &loc,
            );
            return None;
        }

        let context = format!("Module '{name}'");
        let parameters = self.resolve_dual_field(node, &context, "parameters", "params", "P0601");
        let variables = self.resolve_dual_field(node, &context, "variables", "vars", "P0602");
        self.check_unknown_fields(
            node,
            &context,
            &[
                "doc",
                "ports",
                "internal_nets",
                "parameters",
                "params",
                "variables",
                "vars",
                "spice_template",
                "instances",
                "pdk",
                "metadata",
                "nets",
                "patterns",
                "instance_defaults",
            ],
        );

        let instances = if has_instances {
            Some(self.parse_instances(node.get("instances").expect("checked above")))
        } else {
            None
        };

        Some(ModuleDecl {
            doc: node.get("doc").and_then(YamlNode::scalar_string),
            ports: self.parse_ports(node.get("ports")),
            internal_nets: string_list(node.get("internal_nets")),
            parameters,
            variables,
            spice_template,
            instances,
            nets: self.parse_nets(node.get("nets")),
            patterns: self.parse_patterns(node.get("patterns")),
            instance_defaults: self.parse_instance_defaults(node.get("instance_defaults")),
            pdk: node.get("pdk").and_then(YamlNode::scalar_string),
            metadata: node.get("metadata").map(param_value),
            loc,
        })
    }

    fn parse_ports(&mut self, node: Option<&YamlNode>) -> IndexMap<String, PortDecl> {
        let mut ports = IndexMap::new();
        let Some(node) = node else { return ports };
        let Some(pairs) = node.as_map() else {
            return ports;
        };
        for (key, value) in pairs {
            let Some(name) = key.as_str() else { continue };
            let loc = self.locatable(key.mark);
            let Some(_) = value.as_map() else {
                self.error(
                    "P0205",
                    format!(
                        "An error occurred while parsing port '{name}': \
                         expected a mapping, found {}.",
                        value.type_name()
                    ),
                    &loc,
                );
                continue;
            };
            let Some(dir_node) = value.get("dir") else {
                self.error(
                    "P0240",
                    format!("Port '{name}' is missing the required 'dir' field."),
                    &loc,
                );
                continue;
            };

            self.check_unknown_fields(
                value,
                &format!("Port '{name}'"),
                &["dir", "type", "metadata"],
            );

            let dir_text = dir_node.scalar_string().unwrap_or_default();
            let Some(dir) = PortDirection::parse(&dir_text) else {
                self.diagnostics.push(
                    Diagnostic::error(
                        "P0511",
                        format!(
                            "Port direction must be one of: in, out, in_out. Found '{dir_text}'."
                        ),
                        loc.to_source_span(),
                    )
                    .with_source(SOURCE)
                    .with_help("Use one of: in, out, in_out."),
                );
                continue;
            };

            let port_type = match value.get("type") {
                Some(type_node) => {
                    let type_text = type_node.scalar_string().unwrap_or_default();
                    match PortType::parse(&type_text) {
                        Some(port_type) => port_type,
                        None => {
                            self.diagnostics.push(
                                Diagnostic::error(
                                    "P0512",
                                    format!(
                                        "Port type must be one of: signal, power, ground, bias, \
                                         control. Found '{type_text}'."
                                    ),
                                    loc.to_source_span(),
                                )
                                .with_source(SOURCE)
                                .with_help("Use one of: signal, power, ground, bias, control."),
                            );
                            continue;
                        }
                    }
                }
                None => PortType::default(),
            };

            ports.insert(
                name.to_string(),
                PortDecl {
                    dir,
                    port_type,
                    metadata: value.get("metadata").map(param_value),
                    loc,
                },
            );
        }
        ports
    }

    fn parse_instances(&mut self, node: &YamlNode) -> IndexMap<String, InstanceDecl> {
        let mut instances = IndexMap::new();
        let Some(pairs) = node.as_map() else {
            return instances;
        };
        for (key, value) in pairs {
            let Some(name) = key.as_str() else { continue };
            let loc = self.locatable(key.mark);
            let Some(model) = value.get("model").and_then(YamlNode::scalar_string) else {
                self.error(
                    "P0250",
                    format!("Instance '{name}' is missing the required 'model' field."),
                    &loc,
                );
                continue;
            };

            let context = format!("Instance '{name}'");
            let parameters =
                self.resolve_dual_field(value, &context, "parameters", "params", "P0601");
            self.check_unknown_fields(
                value,
                &context,
                &["model", "mappings", "doc", "parameters", "params", "metadata"],
            );

            let mut mappings = IndexMap::new();
            if let Some(mapping_pairs) = value.get("mappings").and_then(|m| m.as_map()) {
                for (port_key, net_value) in mapping_pairs {
                    if let (Some(port), Some(net)) =
                        (port_key.as_str(), net_value.scalar_string())
                    {
                        mappings.insert(port.to_string(), net);
                    }
                }
            }

            instances.insert(
                name.to_string(),
                InstanceDecl {
                    model,
                    mappings,
                    parameters,
                    doc: value.get("doc").and_then(YamlNode::scalar_string),
                    metadata: value.get("metadata").map(param_value),
                    loc,
                },
            );
        }
        instances
    }

    fn parse_nets(&mut self, node: Option<&YamlNode>) -> IndexMap<String, NetDecl> {
        let mut nets = IndexMap::new();
        let Some(node) = node else { return nets };
        let Some(pairs) = node.as_map() else {
            return nets;
        };
        for (key, value) in pairs {
            let Some(name) = key.as_str() else { continue };
            let loc = self.locatable(key.mark);
            let Some(items) = value.as_seq() else {
                self.error(
                    "P0202",
                    format!(
                        "Net '{name}' must be a list of '<instance>.<pin>' endpoint strings, \
                         but found {}.",
                        value.type_name()
                    ),
                    &loc,
                );
                continue;
            };

            let mut endpoints = Vec::new();
            let mut endpoint_locs = Vec::new();
            for item in items {
                let item_loc = self.locatable(item.mark);
                match &item.value {
                    YamlValue::Str(endpoint) => {
                        endpoints.push(EndpointItem::Single(endpoint.clone()));
                        endpoint_locs.push(item_loc);
                    }
                    YamlValue::Seq(group) => {
                        let strings: Vec<String> = group
                            .iter()
                            .filter_map(|entry| entry.as_str().map(str::to_string))
                            .collect();
                        if strings.len() != group.len() {
                            self.error(
                                "P0202",
                                format!("Endpoint tokens must be strings in net '{name}'."),
                                &item_loc,
                            );
                        }
                        endpoints.push(EndpointItem::Group(strings));
                        endpoint_locs.push(item_loc);
                    }
                    _ => {
                        self.error(
                            "P0202",
                            format!("Endpoint tokens must be strings in net '{name}'."),
                            &item_loc,
                        );
                    }
                }
            }

            nets.insert(
                name.to_string(),
                NetDecl {
                    endpoints,
                    loc,
                    endpoint_locs,
                },
            );
        }
        nets
    }

    fn parse_patterns(&mut self, node: Option<&YamlNode>) -> IndexMap<String, String> {
        let mut patterns = IndexMap::new();
        let Some(pairs) = node.and_then(YamlNode::as_map) else {
            return patterns;
        };
        for (key, value) in pairs {
            if let (Some(name), Some(def)) = (key.as_str(), value.scalar_string()) {
                patterns.insert(name.to_string(), def);
            }
        }
        patterns
    }

    fn parse_instance_defaults(
        &mut self,
        node: Option<&YamlNode>,
    ) -> IndexMap<String, IndexMap<String, String>> {
        let mut defaults = IndexMap::new();
        let Some(pairs) = node.and_then(YamlNode::as_map) else {
            return defaults;
        };
        for (key, value) in pairs {
            let Some(reference) = key.as_str() else { continue };
            let mut bindings = IndexMap::new();
            if let Some(binding_pairs) = value.as_map() {
                for (port_key, net_value) in binding_pairs {
                    if let (Some(port), Some(net)) =
                        (port_key.as_str(), net_value.scalar_string())
                    {
                        bindings.insert(port.to_string(), net);
                    }
                }
            }
            defaults.insert(reference.to_string(), bindings);
        }
        defaults
    }

    // ==========================================================================
    // Devices
    // ==========================================================================

    fn parse_devices(&mut self, root: &YamlNode) -> IndexMap<String, DeviceDecl> {
        let mut devices = IndexMap::new();
        let Some(node) = root.get("devices") else {
            return devices;
        };
        let Some(pairs) = node.as_map() else {
            let loc = self.key_locatable(root, "devices");
            self.error(
                "P0202",
                format!(
                    "The 'devices' section must be a mapping, but found {}.",
                    node.type_name()
                ),
                &loc,
            );
            return devices;
        };
        for (key, value) in pairs {
            let Some(name) = key.as_str() else { continue };
            let loc = self.locatable(key.mark);
            if value.as_map().is_none() {
                self.error(
                    "P0202",
                    format!(
                        "Device '{name}' must be a mapping, but found {}.",
                        value.type_name()
                    ),
                    &loc,
                );
                continue;
            }

            let context = format!("Device '{name}'");
            let parameters =
                self.resolve_dual_field(value, &context, "parameters", "params", "P0601");
            let variables = self.resolve_dual_field(value, &context, "variables", "vars", "P0602");
            self.check_unknown_fields(
                value,
                &context,
                &[
                    "doc",
                    "ports",
                    "parameters",
                    "params",
                    "variables",
                    "vars",
                    "backends",
                    "pdk",
                    "metadata",
                ],
            );

            let mut backends = IndexMap::new();
            if let Some(backend_pairs) = value.get("backends").and_then(|b| b.as_map()) {
                for (backend_key, template) in backend_pairs {
                    if let (Some(backend), Some(template)) =
                        (backend_key.as_str(), template.scalar_string())
                    {
                        backends.insert(backend.to_string(), template);
                    }
                }
            }

            devices.insert(
                name.to_string(),
                DeviceDecl {
                    doc: value.get("doc").and_then(YamlNode::scalar_string),
                    ports: string_list(value.get("ports")),
                    parameters,
                    variables,
                    backends,
                    pdk: value.get("pdk").and_then(YamlNode::scalar_string),
                    loc,
                },
            );
        }
        devices
    }
}

// ==============================================================================
// Value Conversion
// ==============================================================================

fn param_value(node: &YamlNode) -> ParamValue {
    match &node.value {
        YamlValue::Null => ParamValue::Null,
        YamlValue::Bool(b) => ParamValue::Bool(*b),
        YamlValue::Int(i) => ParamValue::Int(*i),
        YamlValue::Float(f) => ParamValue::Float(*f),
        YamlValue::Str(s) => ParamValue::Str(s.clone()),
        YamlValue::Seq(items) => ParamValue::List(items.iter().map(param_value).collect()),
        YamlValue::Map(pairs) => ParamValue::Map(
            pairs
                .iter()
                .filter_map(|(k, v)| k.scalar_string().map(|key| (key, param_value(v))))
                .collect(),
        ),
    }
}

fn param_map(node: &YamlNode) -> IndexMap<String, ParamValue> {
    node.as_map()
        .map(|pairs| {
            pairs
                .iter()
                .filter_map(|(k, v)| k.scalar_string().map(|key| (key, param_value(v))))
                .collect()
        })
        .unwrap_or_default()
}

fn string_list(node: Option<&YamlNode>) -> Vec<String> {
    node.and_then(YamlNode::as_seq)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.scalar_string())
                .collect()
        })
        .unwrap_or_default()
}
