// ==============================================================================
// Atomization: PatternedGraph to AtomizedGraph
// ==============================================================================
//
// Every pattern expression is expanded to its atoms, parallel pattern
// positions are correlated through binding plans, and the result is a fully
// enumerated graph: literal instances, literal nets, and one endpoint record
// per (net atom, instance atom, pin atom) connection.
//
// Collisions are detected here, after expansion: two bundles of the same
// module expanding to the same instance or net literal report `PASS-104`
// once per colliding literal. Net duplicates reuse the first atom's id so
// the rest of the module still atomizes for diagnostic enrichment.

use indexmap::IndexMap;

use crate::diagnostics::{Diagnostic, SourceSpan};
use crate::graph::{
    DeviceDef, EntityId, ExprId, ModuleGraph, ModuleId, ProgramGraph, RefTarget,
};
use crate::imports::FileId;
use crate::patterns::{
    Atom, BindingPlan, MAX_EXPANSION_SIZE, bind_patterns, expand_endpoint, expand_pattern,
};

const SOURCE: &str = "core";

const PATTERN_LENGTH_MISMATCH: &str = "PASS-106";
const PATTERN_COLLISION: &str = "PASS-104";
const INVALID_ENDPOINT: &str = "IR-002";

// ==============================================================================
// Atomized IR
// ==============================================================================

/// Where an atom came from: the interned expression, the splice segment, the
/// raw base expression text, and the group values chosen for this atom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternOrigin {
    pub expr: ExprId,
    pub segment: usize,
    pub base: String,
    pub parts: Vec<String>,
}

impl PatternOrigin {
    fn from_atom(expr: ExprId, base: &str, atom: &Atom) -> Self {
        PatternOrigin {
            expr,
            segment: atom.segment,
            base: base.to_string(),
            parts: atom.parts.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AtomizedNet {
    pub name: String,
    /// Indices into the module's endpoint vector, in attachment order.
    pub endpoints: Vec<usize>,
    pub origin: Option<PatternOrigin>,
    /// Index of the source net bundle in the PIR module.
    pub pir_net: usize,
}

#[derive(Debug, Clone)]
pub struct AtomizedInstance {
    pub name: String,
    pub target: RefTarget,
    pub ref_raw: String,
    /// Concrete parameter values for this atom, broadcast or bound.
    pub params: IndexMap<String, String>,
    pub origin: Option<PatternOrigin>,
    pub pir_instance: usize,
    pub doc: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AtomizedEndpoint {
    pub net: usize,
    pub instance: usize,
    pub port: String,
    pub origin: Option<PatternOrigin>,
    pub pir_endpoint: usize,
}

#[derive(Debug)]
pub struct AtomizedModule {
    pub id: ModuleId,
    pub name: String,
    pub file_id: FileId,
    pub port_order: Vec<String>,
    pub nets: Vec<AtomizedNet>,
    pub instances: Vec<AtomizedInstance>,
    pub endpoints: Vec<AtomizedEndpoint>,
    // Primitive payload, unchanged from the PIR.
    pub spice_template: Option<String>,
    pub hierarchical: bool,
    pub parameters: IndexMap<String, crate::ast::ParamValue>,
    pub variables: IndexMap<String, crate::ast::ParamValue>,
    pub pdk: Option<String>,
    pub doc: Option<String>,
}

impl AtomizedModule {
    pub fn is_primitive(&self) -> bool {
        self.spice_template.is_some()
    }
}

#[derive(Debug)]
pub struct AtomizedProgram {
    pub modules: Vec<AtomizedModule>,
    pub devices: Vec<DeviceDef>,
}

impl AtomizedProgram {
    pub fn module(&self, id: ModuleId) -> &AtomizedModule {
        &self.modules[id.0 as usize]
    }

    pub fn find_module(&self, name: &str, file_id: Option<&str>) -> Option<ModuleId> {
        self.modules
            .iter()
            .find(|m| m.name == name && file_id.is_none_or(|f| m.file_id == f))
            .map(|m| m.id)
    }
}

// ==============================================================================
// Atomizer
// ==============================================================================

/// Expand every pattern of the program. Diagnostics carry spans recorded
/// during lowering; the graph is returned even when errors occurred so
/// callers can use it for diagnostic enrichment, but any error severity
/// means downstream stages must not consume it.
pub fn build_atomized_graph(graph: &ProgramGraph) -> (AtomizedProgram, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let mut modules = Vec::with_capacity(graph.modules.len());
    for module in &graph.modules {
        modules.push(atomize_module(graph, module, &mut diagnostics));
    }
    (
        AtomizedProgram {
            modules,
            devices: graph.devices.clone(),
        },
        diagnostics,
    )
}

fn error(code: &str, message: String, span: Option<SourceSpan>) -> Diagnostic {
    Diagnostic::error(code, message, span).with_source(SOURCE)
}

fn expand_named(
    graph: &ProgramGraph,
    expr_id: ExprId,
    context: &str,
    module_name: &str,
    fallback: Option<&SourceSpan>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Vec<Atom>> {
    let expr = graph.exprs.name(expr_id)?;
    match expand_pattern(expr, MAX_EXPANSION_SIZE) {
        Ok(atoms) => Some(atoms),
        Err(e) => {
            let span = e.span.clone().or_else(|| fallback.cloned());
            diagnostics.push(error(
                e.code,
                format!("{} ({context} in module '{module_name}').", e.message),
                span,
            ));
            None
        }
    }
}

fn atomize_module(
    graph: &ProgramGraph,
    module: &ModuleGraph,
    diagnostics: &mut Vec<Diagnostic>,
) -> AtomizedModule {
    let mut atomized = AtomizedModule {
        id: module.id,
        name: module.name.clone(),
        file_id: module.file_id.clone(),
        port_order: Vec::new(),
        nets: Vec::new(),
        instances: Vec::new(),
        endpoints: Vec::new(),
        spice_template: module.spice_template.clone(),
        hierarchical: module.hierarchical,
        parameters: module.parameters.clone(),
        variables: module.variables.clone(),
        pdk: module.pdk.clone(),
        doc: module.doc.clone(),
    };

    // Port order: each entry is a single-segment expression.
    for port_expr in &module.port_order {
        if let Some(atoms) = expand_named(
            graph,
            *port_expr,
            "port order entry",
            &module.name,
            graph.exprs.span(*port_expr),
            diagnostics,
        ) {
            atomized.port_order.extend(atoms.into_iter().map(|a| a.literal));
        }
    }

    // Instances: expand names, detect collisions, bind parameters.
    let mut instance_index: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (pir_index, bundle) in module.instances.iter().enumerate() {
        let span = graph
            .spans
            .get(EntityId::Instance(module.id, pir_index))
            .cloned();
        let Some(atoms) = expand_named(
            graph,
            bundle.name_expr,
            "instance name",
            &module.name,
            span.as_ref(),
            diagnostics,
        ) else {
            continue;
        };

        let params = expand_instance_params(
            graph,
            bundle.params.iter(),
            atoms.len(),
            &module.name,
            span.as_ref(),
            diagnostics,
        );

        let base = graph.exprs.raw(bundle.name_expr).to_string();
        let has_groups = graph
            .exprs
            .name(bundle.name_expr)
            .is_some_and(|e| e.has_groups());
        let mut reported: Vec<String> = Vec::new();
        for (atom_index, atom) in atoms.iter().enumerate() {
            if instance_index.contains_key(&atom.literal) {
                if !reported.contains(&atom.literal) {
                    diagnostics.push(error(
                        PATTERN_COLLISION,
                        format!(
                            "Pattern expansion for instance '{base}' in module '{}' \
                             produced duplicate atom '{}'.",
                            module.name, atom.literal
                        ),
                        span.clone(),
                    ));
                    reported.push(atom.literal.clone());
                }
                continue;
            }
            let index = atomized.instances.len();
            atomized.instances.push(AtomizedInstance {
                name: atom.literal.clone(),
                target: bundle.target,
                ref_raw: bundle.ref_raw.clone(),
                params: params
                    .as_ref()
                    .map(|p| p[atom_index].clone())
                    .unwrap_or_default(),
                origin: has_groups.then(|| PatternOrigin::from_atom(bundle.name_expr, &base, atom)),
                pir_instance: pir_index,
                doc: bundle.doc.clone(),
            });
            instance_index.entry(atom.literal.clone()).or_default().push(index);
        }
    }

    // Nets: expand and dedupe, then expand and bind each endpoint.
    let mut net_index: IndexMap<String, usize> = IndexMap::new();
    for (pir_index, bundle) in module.nets.iter().enumerate() {
        let span = graph.spans.get(EntityId::Net(module.id, pir_index)).cloned();
        let Some(net_expr) = graph.exprs.name(bundle.name_expr) else {
            continue;
        };
        let Some(atoms) = expand_named(
            graph,
            bundle.name_expr,
            "net name",
            &module.name,
            span.as_ref(),
            diagnostics,
        ) else {
            continue;
        };

        let base = graph.exprs.raw(bundle.name_expr).to_string();
        let has_groups = net_expr.has_groups();
        let mut net_atom_ids: Vec<usize> = Vec::with_capacity(atoms.len());
        let mut reported: Vec<String> = Vec::new();
        for atom in &atoms {
            if let Some(existing) = net_index.get(&atom.literal) {
                if !reported.contains(&atom.literal) {
                    diagnostics.push(error(
                        PATTERN_COLLISION,
                        format!(
                            "Pattern expansion for net '{base}' in module '{}' \
                             produced duplicate atom '{}'.",
                            module.name, atom.literal
                        ),
                        span.clone(),
                    ));
                    reported.push(atom.literal.clone());
                }
                net_atom_ids.push(*existing);
                continue;
            }
            let index = atomized.nets.len();
            atomized.nets.push(AtomizedNet {
                name: atom.literal.clone(),
                endpoints: Vec::new(),
                origin: has_groups.then(|| PatternOrigin::from_atom(bundle.name_expr, &base, atom)),
                pir_net: pir_index,
            });
            net_index.insert(atom.literal.clone(), index);
            net_atom_ids.push(index);
        }

        atomize_net_endpoints(
            graph,
            module,
            bundle,
            net_expr,
            &net_atom_ids,
            &instance_index,
            &mut atomized,
            diagnostics,
        );
    }

    atomized
}

/// Expand every parameter expression of an instance bundle and align the
/// results with the instance atoms: single atoms broadcast, matching lengths
/// zip, anything else is a length-mismatch error.
fn expand_instance_params<'a>(
    graph: &ProgramGraph,
    params: impl Iterator<Item = (&'a String, &'a ExprId)>,
    instance_count: usize,
    module_name: &str,
    fallback: Option<&SourceSpan>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Vec<IndexMap<String, String>>> {
    let mut values: Vec<IndexMap<String, String>> = vec![IndexMap::new(); instance_count];
    let mut failed = false;

    for (param_name, expr_id) in params {
        let Some(atoms) = expand_named(
            graph,
            *expr_id,
            &format!("instance param '{param_name}'"),
            module_name,
            fallback,
            diagnostics,
        ) else {
            failed = true;
            continue;
        };
        if atoms.len() == 1 {
            for slot in &mut values {
                slot.insert(param_name.clone(), atoms[0].literal.clone());
            }
            continue;
        }
        if atoms.len() != instance_count {
            diagnostics.push(error(
                PATTERN_LENGTH_MISMATCH,
                format!(
                    "Instance param '{param_name}' expands to {} values but the instance \
                     expands to {instance_count} in module '{module_name}'.",
                    atoms.len()
                ),
                fallback.cloned(),
            ));
            failed = true;
            continue;
        }
        for (slot, atom) in values.iter_mut().zip(&atoms) {
            slot.insert(param_name.clone(), atom.literal.clone());
        }
    }

    if failed { None } else { Some(values) }
}

#[allow(clippy::too_many_arguments)]
fn atomize_net_endpoints(
    graph: &ProgramGraph,
    module: &ModuleGraph,
    bundle: &crate::graph::NetBundle,
    net_expr: &crate::patterns::PatternExpr,
    net_atom_ids: &[usize],
    instance_index: &IndexMap<String, Vec<usize>>,
    atomized: &mut AtomizedModule,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for &endpoint_pir in &bundle.endpoints {
        let endpoint_bundle = &module.endpoints[endpoint_pir];
        let span = graph
            .spans
            .get(EntityId::Endpoint(module.id, endpoint_pir))
            .cloned();
        let Some(endpoint_expr) = graph.exprs.endpoint(endpoint_bundle.expr) else {
            continue;
        };

        let pairs = match expand_endpoint(endpoint_expr, MAX_EXPANSION_SIZE) {
            Ok(pairs) => pairs,
            Err(e) => {
                let err_span = e.span.clone().or_else(|| span.clone());
                diagnostics.push(error(
                    e.code,
                    format!(
                        "{} (endpoint '{}' in module '{}').",
                        e.message, endpoint_expr.raw, module.name
                    ),
                    err_span,
                ));
                continue;
            }
        };

        let plan: BindingPlan = match bind_patterns(net_expr, endpoint_expr) {
            Ok(plan) => plan,
            Err(e) => {
                let mut diag = error(
                    PATTERN_LENGTH_MISMATCH,
                    format!("{} in module '{}'.", e.message, module.name),
                    span.clone().or_else(|| net_expr.span.clone()),
                );
                if let Some(net_span) = &net_expr.span {
                    diag = diag.with_label(
                        net_span.clone(),
                        format!("net expands to {} atoms", net_expr.cardinality()),
                    );
                }
                if let Some(endpoint_span) = span.as_ref().or(endpoint_expr.span.as_ref()) {
                    diag = diag.with_label(
                        endpoint_span.clone(),
                        format!("endpoint expands to {} atoms", endpoint_expr.cardinality()),
                    );
                }
                diagnostics.push(diag);
                continue;
            }
        };

        let base = endpoint_expr.raw.clone();
        for (endpoint_atom, (inst_atom, pin_atom)) in pairs.iter().enumerate() {
            let Some(candidates) = instance_index.get(&inst_atom.literal) else {
                diagnostics.push(error(
                    INVALID_ENDPOINT,
                    format!(
                        "Endpoint '{base}' references unknown instance '{}' in module '{}'.",
                        inst_atom.literal, module.name
                    ),
                    span.clone(),
                ));
                continue;
            };
            if candidates.len() > 1 {
                diagnostics.push(error(
                    INVALID_ENDPOINT,
                    format!(
                        "Endpoint '{base}' references non-unique instance '{}' in module '{}'.",
                        inst_atom.literal, module.name
                    ),
                    span.clone(),
                ));
                continue;
            }

            let net_slot = plan.map_index(0, endpoint_atom);
            let Some(&net_id) = net_atom_ids.get(net_slot) else {
                diagnostics.push(error(
                    PATTERN_LENGTH_MISMATCH,
                    format!(
                        "Endpoint binding produced an out-of-range net index for '{}' \
                         in module '{}'.",
                        net_expr.raw, module.name
                    ),
                    span.clone(),
                ));
                continue;
            };

            let index = atomized.endpoints.len();
            atomized.endpoints.push(AtomizedEndpoint {
                net: net_id,
                instance: candidates[0],
                port: pin_atom.literal.clone(),
                origin: Some(PatternOrigin {
                    expr: endpoint_bundle.expr,
                    segment: inst_atom.segment,
                    base: base.clone(),
                    parts: inst_atom
                        .parts
                        .iter()
                        .chain(&pin_atom.parts)
                        .cloned()
                        .collect(),
                }),
                pir_endpoint: endpoint_pir,
            });
            atomized.nets[net_id].endpoints.push(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::has_error;
    use crate::lower::build_patterned_graph_from_document;
    use crate::parser::DocumentParser;
    use pretty_assertions::assert_eq;

    fn atomize(content: &str) -> (AtomizedProgram, Vec<Diagnostic>) {
        let (document, parse_diags) =
            DocumentParser::new().parse_string(content, Some("test.asdl"));
        assert!(!has_error(&parse_diags), "parse failed: {parse_diags:?}");
        let (graph, lower_diags) =
            build_patterned_graph_from_document(&document.expect("parses"), "test.asdl");
        assert!(!has_error(&lower_diags), "lowering failed: {lower_diags:?}");
        build_atomized_graph(&graph)
    }

    fn atomize_ok(content: &str) -> AtomizedProgram {
        let (program, diagnostics) = atomize(content);
        assert!(!has_error(&diagnostics), "atomization failed: {diagnostics:?}");
        program
    }

    fn module<'a>(program: &'a AtomizedProgram, name: &str) -> &'a AtomizedModule {
        program
            .find_module(name, None)
            .map(|id| program.module(id))
            .expect("module exists")
    }

    const NFET: &str = "\x20 nfet:\n\
        \x20   spice_template: \"MN{name} {D} {G} {S} {B} nfet\"\n\
        \x20   ports: {D: {dir: in_out}, G: {dir: in}, S: {dir: in_out}, B: {dir: in_out}}\n";

    #[test]
    fn parallel_pattern_expansion_binds_positionally() {
        let program = atomize_ok(&format!(
            "file_info: {{top_module: m}}\n\
             modules:\n\
             \x20 m:\n\
             \x20   instances:\n\
             \x20     M_<P|N>:\n\
             \x20       model: nfet\n\
             \x20       mappings: {{G: in_<p|n>, D: out_<p|n>, S: vss, B: vss}}\n\
             {NFET}"
        ));
        let m = module(&program, "m");
        let names: Vec<&str> = m.instances.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["M_P", "M_N"]);

        // in_p connects M_P.G, in_n connects M_N.G.
        let in_p = m.nets.iter().find(|n| n.name == "in_p").expect("in_p net");
        assert_eq!(in_p.endpoints.len(), 1);
        let endpoint = &m.endpoints[in_p.endpoints[0]];
        assert_eq!(m.instances[endpoint.instance].name, "M_P");
        assert_eq!(endpoint.port, "G");

        // vss broadcasts to both instances on S and both on B.
        let vss = m.nets.iter().find(|n| n.name == "vss").expect("vss net");
        assert_eq!(vss.endpoints.len(), 4);
    }

    #[test]
    fn instance_origin_records_pattern_parts() {
        let program = atomize_ok(&format!(
            "file_info: {{top_module: m}}\n\
             modules:\n\
             \x20 m:\n\
             \x20   instances:\n\
             \x20     M_<P|N>: {{model: nfet, mappings: {{G: g, D: d, S: s, B: s}}}}\n\
             {NFET}"
        ));
        let m = module(&program, "m");
        let origin = m.instances[0].origin.as_ref().expect("patterned origin");
        assert_eq!(origin.base, "M_<P|N>");
        assert_eq!(origin.parts, vec!["P".to_string()]);
        assert_eq!(origin.segment, 0);
        // Literal instances carry no origin.
        let plain = atomize_ok(&format!(
            "file_info: {{top_module: m}}\n\
             modules:\n\
             \x20 m:\n\
             \x20   instances:\n\
             \x20     M1: {{model: nfet, mappings: {{G: g, D: d, S: s, B: s}}}}\n\
             {NFET}"
        ));
        assert!(module(&plain, "m").instances[0].origin.is_none());
    }

    #[test]
    fn port_order_expands_patterns() {
        let program = atomize_ok(
            "file_info: {top_module: m}\n\
             modules:\n\
             \x20 m:\n\
             \x20   ports:\n\
             \x20     d[0:2]: {dir: in}\n\
             \x20     clk: {dir: in}\n\
             \x20   instances: {X1: {model: r, mappings: {a: d0}}}\n\
             \x20 r:\n\
             \x20   spice_template: \"R{name} {a} 1k\"\n\
             \x20   ports: {a: {dir: in_out}}\n",
        );
        assert_eq!(
            module(&program, "m").port_order,
            vec!["d0", "d1", "d2", "clk"]
        );
    }

    #[test]
    fn parameter_broadcast_and_binding() {
        let program = atomize_ok(&format!(
            "file_info: {{top_module: m}}\n\
             modules:\n\
             \x20 m:\n\
             \x20   instances:\n\
             \x20     M_<P|N>:\n\
             \x20       model: nfet\n\
             \x20       mappings: {{G: g, D: d_<p|n>, S: s, B: s}}\n\
             \x20       parameters: {{W: 2u, L: \"<1u|2u>\"}}\n\
             {NFET}"
        ));
        let m = module(&program, "m");
        assert_eq!(m.instances[0].params["W"], "2u");
        assert_eq!(m.instances[0].params["L"], "1u");
        assert_eq!(m.instances[1].params["W"], "2u");
        assert_eq!(m.instances[1].params["L"], "2u");
    }

    #[test]
    fn parameter_length_mismatch_is_an_error() {
        let (_, diagnostics) = atomize(&format!(
            "file_info: {{top_module: m}}\n\
             modules:\n\
             \x20 m:\n\
             \x20   instances:\n\
             \x20     M_<P|N>:\n\
             \x20       model: nfet\n\
             \x20       mappings: {{G: g, D: d, S: s, B: s}}\n\
             \x20       parameters: {{L: \"<1u|2u|3u>\"}}\n\
             {NFET}"
        ));
        assert!(diagnostics
            .iter()
            .any(|d| d.code == PATTERN_LENGTH_MISMATCH && d.message.contains("'L'")));
    }

    #[test]
    fn cardinality_mismatch_labels_both_expressions() {
        let (_, diagnostics) = atomize(
            "file_info: {top_module: m}\n\
             modules:\n\
             \x20 m:\n\
             \x20   instances:\n\
             \x20     X: {model: r}\n\
             \x20   nets:\n\
             \x20     a[0:2]: [\"X.p[0:1]\"]\n\
             \x20 r:\n\
             \x20   spice_template: \"R{name} {p0} {p1} 1k\"\n",
        );
        let diag = diagnostics
            .iter()
            .find(|d| d.code == PATTERN_LENGTH_MISMATCH)
            .expect("mismatch diagnostic present");
        assert!(diag.message.contains("3 atoms"));
        assert!(diag.message.contains("expands to 2"));
        assert_eq!(diag.labels.len(), 2);
    }

    #[test]
    fn unknown_endpoint_instance_reports_ir002() {
        let (_, diagnostics) = atomize(
            "file_info: {top_module: m}\n\
             modules:\n\
             \x20 m:\n\
             \x20   instances:\n\
             \x20     X1: {model: r}\n\
             \x20   nets:\n\
             \x20     n1: [GHOST.p]\n\
             \x20 r:\n\
             \x20   spice_template: \"R{name} {p} 1k\"\n",
        );
        assert!(diagnostics
            .iter()
            .any(|d| d.code == INVALID_ENDPOINT && d.message.contains("GHOST")));
    }

    #[test]
    fn duplicate_instance_literals_collide_once_per_literal() {
        let (_, diagnostics) = atomize(&format!(
            "file_info: {{top_module: m}}\n\
             modules:\n\
             \x20 m:\n\
             \x20   instances:\n\
             \x20     M1: {{model: nfet, mappings: {{G: g, D: d, S: s, B: s}}}}\n\
             \x20     \"M<1|2>\": {{model: nfet, mappings: {{G: g2, D: d2, S: s2, B: s2}}}}\n\
             {NFET}"
        ));
        let collisions: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.code == PATTERN_COLLISION)
            .collect();
        assert_eq!(collisions.len(), 1);
        assert!(collisions[0].message.contains("'M1'"));
    }

    #[test]
    fn splice_nets_atomize_segment_wise() {
        let program = atomize_ok(
            "file_info: {top_module: m}\n\
             modules:\n\
             \x20 m:\n\
             \x20   instances:\n\
             \x20     X<1|2|3>: {model: r}\n\
             \x20   nets:\n\
             \x20     clk: [\"X<1|2|3>.a\"]\n\
             \x20 r:\n\
             \x20   spice_template: \"R{name} {a} 1k\"\n",
        );
        let m = module(&program, "m");
        let clk = m.nets.iter().find(|n| n.name == "clk").expect("clk net");
        assert_eq!(clk.endpoints.len(), 3);
        let instances: Vec<&str> = clk
            .endpoints
            .iter()
            .map(|&e| m.instances[m.endpoints[e].instance].name.as_str())
            .collect();
        assert_eq!(instances, vec!["X1", "X2", "X3"]);
    }
}
