// ==============================================================================
// NetlistIR: Emission-Ready Design
// ==============================================================================
//
// The final IR before text. Everything is literal: ordered port lists,
// literal net names, instance calls with `(port, net)` connection pairs and
// concrete parameter strings. Primitive modules keep their template and
// default parameter/variable values for inline substitution.

use indexmap::IndexMap;

use crate::air::AtomizedProgram;
use crate::ast::FileInfo;
use crate::graph::RefTarget;
use crate::imports::FileId;

/// Reference from an instance call to its target definition, by index into
/// the design's module/device vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRef {
    Module(usize),
    Device(usize),
}

#[derive(Debug, Clone)]
pub struct NetlistInstance {
    pub name: String,
    pub target: TargetRef,
    /// Raw reference text as written, for unknown-model diagnostics.
    pub ref_raw: String,
    /// `(port, net)` connection pairs in endpoint order.
    pub conns: Vec<(String, String)>,
    pub params: IndexMap<String, String>,
    pub doc: Option<String>,
}

impl NetlistInstance {
    /// Net mapped to `port`, if any endpoint connected it.
    pub fn net_for(&self, port: &str) -> Option<&str> {
        self.conns
            .iter()
            .find(|(p, _)| p == port)
            .map(|(_, n)| n.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct NetlistModule {
    pub name: String,
    pub file_id: FileId,
    pub ports: Vec<String>,
    pub nets: Vec<String>,
    pub instances: Vec<NetlistInstance>,
    pub parameters: IndexMap<String, String>,
    pub variables: IndexMap<String, String>,
    pub spice_template: Option<String>,
    /// True when the source declaration carried an `instances` section.
    pub hierarchical: bool,
    pub pdk: Option<String>,
    pub doc: Option<String>,
}

impl NetlistModule {
    pub fn is_primitive(&self) -> bool {
        self.spice_template.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NetlistDevice {
    pub name: String,
    pub ports: Vec<String>,
    pub parameters: IndexMap<String, String>,
    pub variables: IndexMap<String, String>,
    /// Backend name to template; the first backend is the default.
    pub backends: IndexMap<String, String>,
    pub pdk: Option<String>,
}

#[derive(Debug, Default)]
pub struct NetlistDesign {
    pub name: Option<String>,
    pub top: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub revision: Option<String>,
    pub modules: Vec<NetlistModule>,
    pub devices: Vec<NetlistDevice>,
    /// Index of the top module in `modules`, when it resolved.
    pub top_index: Option<usize>,
}

impl NetlistDesign {
    pub fn module_named(&self, name: &str) -> Option<&NetlistModule> {
        self.modules.iter().find(|m| m.name == name)
    }
}

fn to_string_map(values: &IndexMap<String, crate::ast::ParamValue>) -> IndexMap<String, String> {
    values
        .iter()
        .map(|(k, v)| (k.clone(), v.to_spice_string()))
        .collect()
}

/// Thin conversion layer from the atomized graph. `file_info` supplies the
/// header fields; `top_override` replaces the declared top module name;
/// `entry_file` disambiguates the top module when names repeat across files.
pub fn build_netlist_design(
    program: &AtomizedProgram,
    file_info: Option<&FileInfo>,
    top_override: Option<&str>,
    entry_file: Option<&str>,
) -> NetlistDesign {
    let mut design = NetlistDesign {
        name: file_info.and_then(|i| i.doc.clone()),
        author: file_info.and_then(|i| i.author.clone()),
        date: file_info.and_then(|i| i.date.clone()),
        revision: file_info.and_then(|i| i.revision.clone()),
        ..NetlistDesign::default()
    };

    design.top = top_override
        .map(str::to_string)
        .or_else(|| file_info.and_then(|i| i.top_module.clone()));

    for module in &program.modules {
        let mut instances = Vec::with_capacity(module.instances.len());
        for (instance_index, instance) in module.instances.iter().enumerate() {
            let target = match instance.target {
                RefTarget::Module(id) => TargetRef::Module(id.0 as usize),
                RefTarget::Device(id) => TargetRef::Device(id.0 as usize),
            };
            let conns: Vec<(String, String)> = module
                .endpoints
                .iter()
                .filter(|e| e.instance == instance_index)
                .map(|e| (e.port.clone(), module.nets[e.net].name.clone()))
                .collect();
            instances.push(NetlistInstance {
                name: instance.name.clone(),
                target,
                ref_raw: instance.ref_raw.clone(),
                conns,
                params: instance.params.clone(),
                doc: instance.doc.clone(),
            });
        }

        design.modules.push(NetlistModule {
            name: module.name.clone(),
            file_id: module.file_id.clone(),
            ports: module.port_order.clone(),
            nets: module.nets.iter().map(|n| n.name.clone()).collect(),
            instances,
            parameters: to_string_map(&module.parameters),
            variables: to_string_map(&module.variables),
            spice_template: module.spice_template.clone(),
            hierarchical: module.hierarchical,
            pdk: module.pdk.clone(),
            doc: module.doc.clone(),
        });
    }

    for device in &program.devices {
        design.devices.push(NetlistDevice {
            name: device.name.clone(),
            ports: device.ports.clone(),
            parameters: to_string_map(&device.parameters),
            variables: to_string_map(&device.variables),
            backends: device.backends.clone(),
            pdk: device.pdk.clone(),
        });
    }

    if let Some(top_name) = design.top.clone() {
        design.top_index = program
            .find_module(&top_name, entry_file)
            .or_else(|| program.find_module(&top_name, None))
            .map(|id| id.0 as usize);
    }

    design
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air::build_atomized_graph;
    use crate::diagnostics::has_error;
    use crate::lower::build_patterned_graph_from_document;
    use crate::parser::DocumentParser;
    use pretty_assertions::assert_eq;

    fn design(content: &str) -> NetlistDesign {
        let (document, parse_diags) =
            DocumentParser::new().parse_string(content, Some("test.asdl"));
        assert!(!has_error(&parse_diags), "parse failed: {parse_diags:?}");
        let document = document.expect("parses");
        let (graph, lower_diags) = build_patterned_graph_from_document(&document, "test.asdl");
        assert!(!has_error(&lower_diags), "{lower_diags:?}");
        let (program, atomize_diags) = build_atomized_graph(&graph);
        assert!(!has_error(&atomize_diags), "{atomize_diags:?}");
        build_netlist_design(&program, Some(&document.file_info), None, Some("test.asdl"))
    }

    #[test]
    fn connections_follow_endpoint_order() {
        let d = design(
            "file_info: {top_module: top, doc: demo, author: me}\n\
             modules:\n\
             \x20 top:\n\
             \x20   ports: {in: {dir: in}, out: {dir: out}}\n\
             \x20   instances:\n\
             \x20     R1: {model: r, mappings: {a: in, b: out}, parameters: {R: 2k}}\n\
             \x20 r:\n\
             \x20   spice_template: \"R{name} {a} {b} {R}\"\n\
             \x20   parameters: {R: 1k}\n\
             \x20   ports: {a: {dir: in_out}, b: {dir: in_out}}\n",
        );
        assert_eq!(d.name.as_deref(), Some("demo"));
        assert_eq!(d.top.as_deref(), Some("top"));
        let top = d.module_named("top").expect("top module");
        assert_eq!(top.ports, vec!["in", "out"]);
        let r1 = &top.instances[0];
        assert_eq!(r1.net_for("a"), Some("in"));
        assert_eq!(r1.net_for("b"), Some("out"));
        assert_eq!(r1.params["R"], "2k");
        let r = d.module_named("r").expect("primitive module");
        assert!(r.is_primitive());
        assert_eq!(r.parameters["R"], "1k");
    }

    #[test]
    fn top_index_resolves_declared_top() {
        let d = design(
            "file_info: {top_module: top}\n\
             modules:\n\
             \x20 r: {spice_template: \"R{name} {a} {b} 1k\"}\n\
             \x20 top:\n\
             \x20   instances: {R1: {model: r, mappings: {a: n1, b: n2}}}\n",
        );
        let top_index = d.top_index.expect("top resolves");
        assert_eq!(d.modules[top_index].name, "top");
    }
}
