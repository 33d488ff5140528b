// ==============================================================================
// Elaborated-AST Reconstruction
// ==============================================================================
//
// `elaborate` writes the design back out with every pattern expanded: one
// literal instance per atom, literal port names, and explicit per-instance
// mappings reconstructed from the atomized connectivity. The result is a
// plain `AsdlDocument` again, so the normal serde serializers handle the
// YAML/JSON output.

use indexmap::IndexMap;

use crate::air::AtomizedProgram;
use crate::ast::{AsdlDocument, InstanceDecl, ModuleDecl, ParamValue, PortDecl};
use crate::patterns::{MAX_EXPANSION_SIZE, expand_literals, parse_pattern_expr};

/// Expand a declaration document against its atomized form. Modules keep
/// their declaration order; pattern-expanded declarations are replaced by
/// their atoms.
pub fn build_elaborated_document(
    program: &AtomizedProgram,
    source: &AsdlDocument,
    file_id: &str,
) -> AsdlDocument {
    let mut elaborated = AsdlDocument {
        file_info: source.file_info.clone(),
        imports: source.imports.clone(),
        model_alias: source.model_alias.clone(),
        metadata: source.metadata.clone(),
        ..AsdlDocument::default()
    };

    for (module_name, module) in &source.modules {
        let Some(atomized) = program
            .find_module(module_name, Some(file_id))
            .map(|id| program.module(id))
        else {
            elaborated
                .modules
                .insert(module_name.clone(), module.clone());
            continue;
        };

        let mut ports: IndexMap<String, PortDecl> = IndexMap::new();
        for (port_expr, decl) in &module.ports {
            for literal in expand_port_names(port_expr) {
                ports.insert(literal, decl.clone());
            }
        }

        let mut instances: IndexMap<String, InstanceDecl> = IndexMap::new();
        if module.instances.is_some() {
            for atom in &atomized.instances {
                let mappings: IndexMap<String, String> = atomized
                    .endpoints
                    .iter()
                    .filter(|e| {
                        atomized.instances[e.instance].name == atom.name
                    })
                    .map(|e| (e.port.clone(), atomized.nets[e.net].name.clone()))
                    .collect();
                instances.insert(
                    atom.name.clone(),
                    InstanceDecl {
                        model: atom.ref_raw.clone(),
                        mappings,
                        parameters: atom
                            .params
                            .iter()
                            .map(|(k, v)| (k.clone(), ParamValue::Str(v.clone())))
                            .collect(),
                        doc: atom.doc.clone(),
                        metadata: None,
                        loc: Default::default(),
                    },
                );
            }
        }

        let internal_nets: Vec<String> = atomized
            .nets
            .iter()
            .map(|n| n.name.clone())
            .filter(|name| !atomized.port_order.contains(name))
            .collect();

        elaborated.modules.insert(
            module_name.clone(),
            ModuleDecl {
                doc: module.doc.clone(),
                ports,
                internal_nets,
                parameters: module.parameters.clone(),
                variables: module.variables.clone(),
                spice_template: module.spice_template.clone(),
                instances: module.instances.as_ref().map(|_| instances),
                nets: IndexMap::new(),
                patterns: IndexMap::new(),
                instance_defaults: IndexMap::new(),
                pdk: module.pdk.clone(),
                metadata: module.metadata.clone(),
                loc: module.loc.clone(),
            },
        );
    }

    elaborated.devices = source.devices.clone();
    elaborated
}

fn expand_port_names(port_expr: &str) -> Vec<String> {
    let (parsed, errors) = parse_pattern_expr(port_expr, &IndexMap::new(), None);
    match parsed {
        Some(expr) if errors.is_empty() => {
            expand_literals(&expr, MAX_EXPANSION_SIZE).unwrap_or_else(|_| vec![port_expr.to_string()])
        }
        _ => vec![port_expr.to_string()],
    }
}

/// Serialize an elaborated document as YAML.
pub fn to_yaml(document: &AsdlDocument) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(document)
}

/// Serialize an elaborated document as pretty JSON.
pub fn to_json(document: &AsdlDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}
