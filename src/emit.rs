// ==============================================================================
// SPICE Emission
// ==============================================================================
//
// Writes the final netlist text from a `NetlistDesign`. Ordering rules:
// header comments, PDK `.include` lines (one per distinct PDK string, in
// first-use order), then subcircuit definitions in dependency order (a
// module after everything it instantiates, ties broken by declaration
// order, the top module last), then `.end`.
//
// Primitive modules never emit a `.subckt`; each use site renders the
// primitive's template inline with `{placeholder}` substitution. Instance
// overrides shadow module parameter defaults, and variables shadow both.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::diagnostics::Diagnostic;
use crate::netlist::{NetlistDesign, NetlistInstance, NetlistModule, TargetRef};

const SOURCE: &str = "generator";

const INDENT: &str = "  ";

/// How the top module is wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopStyle {
    /// Emit the top module as a normal `.subckt`/`.ends` pair.
    #[default]
    Subckt,
    /// Comment out the top module's wrappers so its body is inline.
    Flat,
}

impl TopStyle {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "subckt" => Some(TopStyle::Subckt),
            "flat" => Some(TopStyle::Flat),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmitOptions {
    pub top_style: TopStyle,
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{[A-Za-z_][A-Za-z0-9_]*\}").expect("placeholder regex is valid")
    })
}

/// Include path for a PDK string. Known PDKs have fixed paths; others follow
/// the same layout convention.
fn pdk_include_path(pdk: &str) -> String {
    match pdk {
        "gf180mcu" => "gf180mcu_fd_pr/models/ngspice/design.ngspice".to_string(),
        "sky130" => "sky130_fd_pr/models/ngspice/design.ngspice".to_string(),
        other => format!("{other}_fd_pr/models/ngspice/design.ngspice"),
    }
}

// ==============================================================================
// Emitter
// ==============================================================================

struct Emitter<'a> {
    design: &'a NetlistDesign,
    options: EmitOptions,
    lines: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

/// Emit the design as SPICE text. Diagnostics with error severity mean the
/// output is advisory; the pipeline refuses to write it to disk.
pub fn emit_spice(design: &NetlistDesign, options: EmitOptions) -> (String, Vec<Diagnostic>) {
    let mut emitter = Emitter {
        design,
        options,
        lines: Vec::new(),
        diagnostics: Vec::new(),
    };
    emitter.run();
    let mut text = emitter.lines.join("\n");
    text.push('\n');
    (text, emitter.diagnostics)
}

impl Emitter<'_> {
    fn error(&mut self, code: &str, message: String) {
        self.diagnostics
            .push(Diagnostic::error(code, message, None).with_source(SOURCE));
    }

    fn run(&mut self) {
        let design = self.design;
        self.header();
        self.pdk_includes();
        let order = self.emission_order();
        debug!(modules = order.len(), "emitting subcircuits");
        for index in order {
            let is_top = design.top_index == Some(index);
            self.subckt(&design.modules[index], is_top);
            self.lines.push(String::new());
        }
        self.lines.push(".end".to_string());
    }

    // ==========================================================================
    // Header and includes
    // ==========================================================================

    fn header(&mut self) {
        self.lines.push("* SPICE netlist generated from ASDL".to_string());
        if let Some(name) = &self.design.name {
            self.lines.push(format!("* Design: {name}"));
        }
        if let Some(top) = &self.design.top {
            self.lines.push(format!("* Top module: {top}"));
        }
        if let Some(author) = &self.design.author {
            self.lines.push(format!("* Author: {author}"));
        }
        if let Some(date) = &self.design.date {
            self.lines.push(format!("* Date: {date}"));
        }
        if let Some(revision) = &self.design.revision {
            self.lines.push(format!("* Revision: {revision}"));
        }

        if let Some(top) = self.design.top.clone()
            && self.design.top_index.is_none()
        {
            self.error(
                "G0102",
                format!("Top module '{top}' is not defined in the design."),
            );
            self.lines
                .push(format!("* ERROR G0102: top module '{top}' not found"));
        }
        self.lines.push(String::new());
    }

    fn pdk_includes(&mut self) {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut includes: Vec<String> = Vec::new();
        let module_pdks = self
            .design
            .modules
            .iter()
            .filter(|m| m.is_primitive())
            .filter_map(|m| m.pdk.as_deref());
        let device_pdks = self.design.devices.iter().filter_map(|d| d.pdk.as_deref());
        for pdk in module_pdks.chain(device_pdks) {
            if seen.insert(pdk) {
                includes.push(format!(".include \"{}\"", pdk_include_path(pdk)));
            }
        }
        if !includes.is_empty() {
            self.lines.push("* PDK model includes".to_string());
            self.lines.extend(includes);
            self.lines.push(String::new());
        }
    }

    // ==========================================================================
    // Emission order
    // ==========================================================================

    /// Post-order DFS over hierarchical modules: children before parents,
    /// declaration order for ties, top module last.
    fn emission_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = Vec::new();
        let mut visited: Vec<bool> = vec![false; self.design.modules.len()];

        fn visit(design: &NetlistDesign, index: usize, visited: &mut [bool], order: &mut Vec<usize>) {
            if visited[index] {
                return;
            }
            visited[index] = true;
            for instance in &design.modules[index].instances {
                if let TargetRef::Module(target) = instance.target
                    && target < design.modules.len()
                    && !design.modules[target].is_primitive()
                {
                    visit(design, target, visited, order);
                }
            }
            if !design.modules[index].is_primitive() {
                order.push(index);
            }
        }

        for index in 0..self.design.modules.len() {
            if Some(index) != self.design.top_index {
                visit(self.design, index, &mut visited, &mut order);
            }
        }
        if let Some(top) = self.design.top_index {
            visit(self.design, top, &mut visited, &mut order);
            // The top module may already have been pulled in as a dependency;
            // force it to the end either way.
            if let Some(pos) = order.iter().position(|&i| i == top) {
                order.remove(pos);
                order.push(top);
            }
        }
        order
    }

    // ==========================================================================
    // Subcircuits
    // ==========================================================================

    fn subckt(&mut self, module: &NetlistModule, is_top: bool) {
        let commented = is_top && self.options.top_style == TopStyle::Flat;
        let wrapper_prefix = if commented { "* " } else { "" };

        if let Some(doc) = &module.doc {
            self.lines.push(format!("* {doc}"));
        }

        let mut header = format!("{wrapper_prefix}.subckt {}", module.name);
        for port in &module.ports {
            let _ = write!(header, " {port}");
        }
        self.lines.push(header);

        for (name, value) in &module.parameters {
            self.lines.push(format!("{INDENT}.param {name}={value}"));
        }

        let instance_lines: Vec<String> = module
            .instances
            .iter()
            .flat_map(|instance| self.instance_lines(module, instance))
            .collect();
        self.lines.extend(instance_lines);

        self.lines.push(format!("{wrapper_prefix}.ends"));
    }

    fn instance_lines(&mut self, module: &NetlistModule, instance: &NetlistInstance) -> Vec<String> {
        let design = self.design;
        let mut lines = Vec::new();
        if let Some(doc) = &instance.doc {
            lines.push(format!("{INDENT}* {doc}"));
        }
        match instance.target {
            TargetRef::Module(target_index) => {
                let Some(target) = design.modules.get(target_index) else {
                    self.error(
                        "G0401",
                        format!(
                            "Unknown model reference '{}' for instance '{}' in module '{}'.",
                            instance.ref_raw, instance.name, module.name
                        ),
                    );
                    lines.push(format!(
                        "{INDENT}* ERROR G0401: unknown model '{}' for instance '{}'",
                        instance.ref_raw, instance.name
                    ));
                    return lines;
                };
                if target.is_primitive() {
                    match self.primitive_line(module, instance, target) {
                        Some(line) => lines.push(format!("{INDENT}{line}")),
                        None => lines.push(format!(
                            "{INDENT}* ERROR G0501: template substitution failed for \
                             instance '{}'",
                            instance.name
                        )),
                    }
                } else if target.hierarchical {
                    match self.subckt_call(module, instance, target) {
                        Some(line) => lines.push(format!("{INDENT}{line}")),
                        None => lines.push(format!(
                            "{INDENT}* ERROR G0201: instance '{}' has unconnected ports",
                            instance.name
                        )),
                    }
                } else {
                    self.error(
                        "G0301",
                        format!(
                            "Module '{}' is invalid: neither primitive nor hierarchical.",
                            target.name
                        ),
                    );
                    lines.push(format!(
                        "{INDENT}* ERROR G0301: invalid module '{}' for instance '{}'",
                        target.name, instance.name
                    ));
                }
            }
            TargetRef::Device(device_index) => match self.device_line(module, instance, device_index) {
                Some(line) => lines.push(format!("{INDENT}{line}")),
                None => lines.push(format!(
                    "{INDENT}* ERROR G0401: no backend template for device '{}' \
                     (instance '{}')",
                    instance.ref_raw, instance.name
                )),
            },
        }
        lines
    }

    /// `X_<name> <nets in port order> <target> k=v ...`, parameters sorted.
    fn subckt_call(
        &mut self,
        module: &NetlistModule,
        instance: &NetlistInstance,
        target: &NetlistModule,
    ) -> Option<String> {
        let mut nets = Vec::with_capacity(target.ports.len());
        let mut missing = Vec::new();
        for port in &target.ports {
            match instance.net_for(port) {
                Some(net) => nets.push(net.to_string()),
                None => missing.push(port.clone()),
            }
        }
        if !missing.is_empty() {
            self.error(
                "G0201",
                format!(
                    "Instance '{}' in module '{}' leaves ports of '{}' unconnected: {}.",
                    instance.name,
                    module.name,
                    target.name,
                    missing.join(", ")
                ),
            );
            return None;
        }

        let mut line = format!("X_{}", instance.name);
        for net in &nets {
            let _ = write!(line, " {net}");
        }
        let _ = write!(line, " {}", target.name);

        let mut params: Vec<(&String, &String)> = instance.params.iter().collect();
        params.sort_by(|a, b| a.0.cmp(b.0));
        for (name, value) in params {
            let _ = write!(line, " {name}={value}");
        }
        Some(line)
    }

    /// Inline expansion of a primitive module at its use site.
    fn primitive_line(
        &mut self,
        module: &NetlistModule,
        instance: &NetlistInstance,
        target: &NetlistModule,
    ) -> Option<String> {
        let template = target
            .spice_template
            .as_deref()
            .expect("primitive modules carry a template");

        // Substitution namespace: ports, then parameters overridden by the
        // instance, then variables shadowing both, then the instance name.
        let mut namespace: IndexMap<&str, String> = IndexMap::new();
        for port in &target.ports {
            if let Some(net) = instance.net_for(port) {
                namespace.insert(port.as_str(), net.to_string());
            }
        }
        // Ports that exist only in the template (target declared no ports
        // section) still resolve through the connection list.
        for (port, net) in &instance.conns {
            namespace.entry(port.as_str()).or_insert_with(|| net.clone());
        }
        for (name, value) in &target.parameters {
            namespace.insert(name.as_str(), value.clone());
        }
        for (name, value) in &instance.params {
            namespace.insert(name.as_str(), value.clone());
        }
        for (name, value) in &target.variables {
            namespace.insert(name.as_str(), value.clone());
        }
        namespace.insert("name", instance.name.clone());

        self.substitute(template, &namespace, &instance.name, &module.name)
    }

    fn device_line(
        &mut self,
        module: &NetlistModule,
        instance: &NetlistInstance,
        device_index: usize,
    ) -> Option<String> {
        let device = self.design.devices.get(device_index)?.clone();
        let template = device.backends.values().next()?.clone();

        let mut namespace: IndexMap<&str, String> = IndexMap::new();
        for port in &device.ports {
            if let Some(net) = instance.net_for(port) {
                namespace.insert(port.as_str(), net.to_string());
            }
        }
        for (name, value) in &device.parameters {
            namespace.insert(name.as_str(), value.clone());
        }
        for (name, value) in &instance.params {
            namespace.insert(name.as_str(), value.clone());
        }
        for (name, value) in &device.variables {
            namespace.insert(name.as_str(), value.clone());
        }
        namespace.insert("name", instance.name.clone());

        self.substitute(&template, &namespace, &instance.name, &module.name)
    }

    /// Replace `{key}` placeholders, honoring `{{`/`}}` escapes, then
    /// re-scan the result: any surviving `{ident}` is a G0501.
    fn substitute(
        &mut self,
        template: &str,
        namespace: &IndexMap<&str, String>,
        instance_name: &str,
        module_name: &str,
    ) -> Option<String> {
        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();
        let mut failed = false;
        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                }
                '{' => {
                    let mut key = String::new();
                    let mut closed = false;
                    for inner in chars.by_ref() {
                        if inner == '}' {
                            closed = true;
                            break;
                        }
                        key.push(inner);
                    }
                    if !closed {
                        failed = true;
                        self.error(
                            "G0501",
                            format!(
                                "Unterminated placeholder in template for instance \
                                 '{instance_name}' in module '{module_name}'."
                            ),
                        );
                        break;
                    }
                    match namespace.get(key.as_str()) {
                        Some(value) => out.push_str(value),
                        None => {
                            failed = true;
                            self.error(
                                "G0501",
                                format!(
                                    "Template placeholder '{{{key}}}' for instance \
                                     '{instance_name}' in module '{module_name}' is not a \
                                     port, parameter, or variable."
                                ),
                            );
                        }
                    }
                }
                other => out.push(other),
            }
        }
        if failed {
            return None;
        }
        // Invariant check: nothing placeholder-shaped survives substitution.
        if let Some(leftover) = placeholder_regex().find(&out) {
            self.error(
                "G0501",
                format!(
                    "Template for instance '{instance_name}' in module '{module_name}' \
                     left placeholder '{}' unsubstituted.",
                    leftover.as_str()
                ),
            );
            return None;
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air::build_atomized_graph;
    use crate::diagnostics::has_error;
    use crate::lower::build_patterned_graph_from_document;
    use crate::netlist::build_netlist_design;
    use crate::parser::DocumentParser;
    use pretty_assertions::assert_eq;

    fn netlist_with(content: &str, options: EmitOptions) -> (String, Vec<Diagnostic>) {
        let (document, parse_diags) =
            DocumentParser::new().parse_string(content, Some("test.asdl"));
        assert!(!has_error(&parse_diags), "parse failed: {parse_diags:?}");
        let document = document.expect("parses");
        let (graph, lower_diags) = build_patterned_graph_from_document(&document, "test.asdl");
        assert!(!has_error(&lower_diags), "{lower_diags:?}");
        let (program, atomize_diags) = build_atomized_graph(&graph);
        assert!(!has_error(&atomize_diags), "{atomize_diags:?}");
        let design =
            build_netlist_design(&program, Some(&document.file_info), None, Some("test.asdl"));
        emit_spice(&design, options)
    }

    fn netlist(content: &str) -> (String, Vec<Diagnostic>) {
        netlist_with(content, EmitOptions::default())
    }

    fn netlist_ok(content: &str) -> String {
        let (text, diagnostics) = netlist(content);
        assert!(!has_error(&diagnostics), "emission failed: {diagnostics:?}");
        text
    }

    // =========================================================================
    // Inline primitives
    // =========================================================================

    #[test]
    fn primitive_inlines_with_instance_override() {
        let text = netlist_ok(
            "file_info: {top_module: top}\n\
             modules:\n\
             \x20 r:\n\
             \x20   spice_template: \"R{name} {a} {b} {R}\"\n\
             \x20   parameters: {R: 1k}\n\
             \x20   ports: {a: {dir: in_out}, b: {dir: in_out}}\n\
             \x20 top:\n\
             \x20   ports: {in: {dir: in}, out: {dir: out}}\n\
             \x20   instances:\n\
             \x20     R1: {model: r, mappings: {a: in, b: out}, parameters: {R: 2k}}\n",
        );
        assert!(text.contains(".subckt top in out"));
        assert!(text.contains("  RR1 in out 2k"));
        assert!(!text.contains(".subckt r"));
        assert!(text.trim_end().ends_with(".end"));
    }

    #[test]
    fn variables_shadow_parameters() {
        let text = netlist_ok(
            "file_info: {top_module: t}\n\
             modules:\n\
             \x20 device:\n\
             \x20   spice_template: \"R{name} {n1} {n2} {value} temp={temp}\"\n\
             \x20   parameters: {value: 1k, temp: 25}\n\
             \x20   variables: {temp: 75}\n\
             \x20   ports: {n1: {dir: in_out}, n2: {dir: in_out}}\n\
             \x20 t:\n\
             \x20   instances:\n\
             \x20     R1:\n\
             \x20       model: device\n\
             \x20       mappings: {n1: in, n2: out}\n\
             \x20       parameters: {value: 2k, temp: 50}\n",
        );
        assert!(text.contains("RR1 in out 2k temp=75"), "got:\n{text}");
    }

    #[test]
    fn pattern_expanded_instances_inline_each_atom() {
        let text = netlist_ok(
            "file_info: {top_module: m}\n\
             modules:\n\
             \x20 nfet:\n\
             \x20   spice_template: \"MN{name} {D} {G} {S} {B} nfet\"\n\
             \x20   ports: {D: {dir: in_out}, G: {dir: in}, S: {dir: in_out}, B: {dir: in_out}}\n\
             \x20 m:\n\
             \x20   instances:\n\
             \x20     M_<P|N>:\n\
             \x20       model: nfet\n\
             \x20       mappings: {G: in_<p|n>, D: out_<p|n>, S: vss, B: vss}\n",
        );
        assert!(text.contains("MNM_P out_p in_p vss vss nfet"), "got:\n{text}");
        assert!(text.contains("MNM_N out_n in_n vss vss nfet"), "got:\n{text}");
    }

    // =========================================================================
    // Hierarchical calls
    // =========================================================================

    #[test]
    fn subckt_call_orders_nets_by_ports_and_sorts_params() {
        let text = netlist_ok(
            "file_info: {top_module: parent}\n\
             modules:\n\
             \x20 child:\n\
             \x20   ports: {a: {dir: in}, b: {dir: in}, c: {dir: in}}\n\
             \x20   instances: {}\n\
             \x20 parent:\n\
             \x20   instances:\n\
             \x20     U1:\n\
             \x20       model: child\n\
             \x20       mappings: {a: n1, b: n2, c: n3}\n\
             \x20       parameters: {z: 1, a: 2}\n",
        );
        assert!(text.contains("  X_U1 n1 n2 n3 child a=2 z=1"), "got:\n{text}");
    }

    #[test]
    fn children_emit_before_parents_and_top_last() {
        let text = netlist_ok(
            "file_info: {top_module: top, doc: ordering}\n\
             modules:\n\
             \x20 top:\n\
             \x20   ports: {t: {dir: in}}\n\
             \x20   instances: {U2: {model: parent, mappings: {p: n2}}}\n\
             \x20 parent:\n\
             \x20   ports: {p: {dir: in}}\n\
             \x20   instances: {U1: {model: child, mappings: {a: n1}}}\n\
             \x20 child:\n\
             \x20   ports: {a: {dir: in_out}}\n\
             \x20   instances: {}\n",
        );
        let subckts: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with(".subckt"))
            .collect();
        assert_eq!(subckts, vec![".subckt child a", ".subckt parent p", ".subckt top t"]);
    }

    #[test]
    fn flat_top_style_comments_top_wrappers_only() {
        let (text, diagnostics) = netlist_with(
            "file_info: {top_module: top, doc: flat}\n\
             modules:\n\
             \x20 child:\n\
             \x20   ports: {a: {dir: in_out}}\n\
             \x20   instances: {}\n\
             \x20 top:\n\
             \x20   ports: {t: {dir: in}}\n\
             \x20   instances: {U1: {model: child, mappings: {a: n1}}}\n",
            EmitOptions {
                top_style: TopStyle::Flat,
            },
        );
        assert!(!has_error(&diagnostics));
        assert!(text.lines().any(|l| l.starts_with(".subckt child")));
        assert!(text.lines().any(|l| l == ".ends"));
        assert!(text.lines().any(|l| l.starts_with("* .subckt top")));
        assert!(text.lines().any(|l| l == "* .ends"));
    }

    #[test]
    fn pdk_includes_deduplicate() {
        let text = netlist_ok(
            "file_info: {top_module: t}\n\
             modules:\n\
             \x20 n1: {spice_template: \"MN{name} nfet\", pdk: gf180mcu}\n\
             \x20 n2: {spice_template: \"MP{name} pfet\", pdk: gf180mcu}\n\
             \x20 s1: {spice_template: \"MN{name} nfet2\", pdk: sky130}\n\
             \x20 t:\n\
             \x20   instances:\n\
             \x20     A: {model: n1}\n\
             \x20     B: {model: n2}\n\
             \x20     C: {model: s1}\n",
        );
        assert_eq!(
            text.matches(".include \"gf180mcu_fd_pr/models/ngspice/design.ngspice\"")
                .count(),
            1
        );
        assert!(text.contains(".include \"sky130_fd_pr/models/ngspice/design.ngspice\""));
    }

    // =========================================================================
    // Error paths
    // =========================================================================

    #[test]
    fn g0102_when_top_module_missing() {
        let (text, diagnostics) = netlist(
            "file_info: {top_module: missing}\n\
             modules:\n\
             \x20 child: {spice_template: \"R{name} {a} {b} 1k\"}\n",
        );
        assert!(diagnostics.iter().any(|d| d.code == "G0102"));
        assert!(text.contains("G0102"));
    }

    #[test]
    fn g0201_unconnected_port_skips_instance() {
        let (text, diagnostics) = netlist(
            "file_info: {top_module: parent}\n\
             modules:\n\
             \x20 child:\n\
             \x20   ports: {a: {dir: in}, b: {dir: in}, c: {dir: in}}\n\
             \x20   instances: {}\n\
             \x20 parent:\n\
             \x20   instances:\n\
             \x20     U1: {model: child, mappings: {a: n1}}\n",
        );
        let diag = diagnostics
            .iter()
            .find(|d| d.code == "G0201")
            .expect("G0201 present");
        assert!(diag.message.contains('b') && diag.message.contains('c'));
        assert!(text.contains("ERROR G0201"));
        assert!(!text.contains("X_U1"));
    }

    #[test]
    fn g0501_on_unknown_placeholder() {
        let (text, diagnostics) = netlist(
            "file_info: {top_module: t}\n\
             modules:\n\
             \x20 bad:\n\
             \x20   spice_template: \"R{name} {a} {b} {missing}\"\n\
             \x20   ports: {a: {dir: in_out}, b: {dir: in_out}}\n\
             \x20 t:\n\
             \x20   instances:\n\
             \x20     R1: {model: bad, mappings: {a: n1, b: n2}}\n",
        );
        let diag = diagnostics
            .iter()
            .find(|d| d.code == "G0501")
            .expect("G0501 present");
        assert!(diag.message.contains("{missing}"));
        assert!(text.contains("ERROR G0501"));
    }

    #[test]
    fn braces_escape_to_literal_braces() {
        let text = netlist_ok(
            "file_info: {top_module: t}\n\
             modules:\n\
             \x20 v:\n\
             \x20   spice_template: \"V{name} {p} {n} PULSE({{0 1}})\"\n\
             \x20   ports: {p: {dir: in_out}, n: {dir: in_out}}\n\
             \x20 t:\n\
             \x20   instances:\n\
             \x20     V1: {model: v, mappings: {p: vdd, n: gnd}}\n",
        );
        assert!(text.contains("VV1 vdd gnd PULSE({0 1})"), "got:\n{text}");
    }

    #[test]
    fn module_params_emit_as_param_lines() {
        let text = netlist_ok(
            "file_info: {top_module: t}\n\
             modules:\n\
             \x20 r: {spice_template: \"R{name} {a} {b} {R}\", parameters: {R: 1k},\n\
             \x20     ports: {a: {dir: in_out}, b: {dir: in_out}}}\n\
             \x20 t:\n\
             \x20   parameters: {M: 2}\n\
             \x20   instances: {R1: {model: r, mappings: {a: x, b: y}}}\n",
        );
        assert!(text.contains("  .param M=2"), "got:\n{text}");
    }

    #[test]
    fn device_instances_render_through_default_backend() {
        let text = netlist_ok(
            "file_info: {top_module: t}\n\
             devices:\n\
             \x20 nmos:\n\
             \x20   ports: [D, G, S, B]\n\
             \x20   parameters: {W: 1u}\n\
             \x20   backends:\n\
             \x20     ngspice: \"MN{name} {D} {G} {S} {B} nmos W={W}\"\n\
             modules:\n\
             \x20 t:\n\
             \x20   instances:\n\
             \x20     M1:\n\
             \x20       model: nmos\n\
             \x20       mappings: {D: d, G: g, S: s, B: s}\n\
             \x20       parameters: {W: 2u}\n",
        );
        assert!(text.contains("MNM1 d g s s nmos W=2u"), "got:\n{text}");
    }

    #[test]
    fn output_has_no_trailing_whitespace() {
        let text = netlist_ok(
            "file_info: {top_module: t, doc: clean}\n\
             modules:\n\
             \x20 r: {spice_template: \"R{name} {a} {b} 1k\",\n\
             \x20     ports: {a: {dir: in_out}, b: {dir: in_out}}}\n\
             \x20 t:\n\
             \x20   instances: {R1: {model: r, mappings: {a: x, b: y}}}\n",
        );
        for line in text.lines() {
            assert_eq!(line, line.trim_end(), "trailing whitespace in {line:?}");
        }
        assert!(text.ends_with(".end\n"));
    }
}
