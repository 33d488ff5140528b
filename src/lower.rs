// ==============================================================================
// Lowering: AST to PatternedGraph
// ==============================================================================
//
// Shape-preserving translation of parsed documents into the PatternedGraph
// IR. Pattern expressions are parsed and interned but not expanded; instance
// model references are resolved to module/device ids; connectivity from both
// syntaxes — explicit `nets:` endpoint lists and per-instance `mappings:` —
// lands in the same net bundles.
//
// The builder is deterministic: modules, devices, and bundles are allocated
// monotonically in declaration order, files in import-resolution order.

use indexmap::IndexMap;
use tracing::debug;

use crate::ast::{AsdlDocument, EndpointItem, ModuleDecl};
use crate::diagnostics::{Diagnostic, SourceSpan};
use crate::graph::{
    DeviceDef, DeviceId, EndpointBundle, EntityId, ExprId, ExprKind, GroupSlice, InstanceBundle,
    ModuleGraph, ModuleId, NetBundle, ProgramGraph, RefTarget,
};
use crate::imports::{FileId, ImportGraph};
use crate::patterns::{
    NamedPattern, PatternError, parse_endpoint_expr, parse_pattern_expr, validate_named_pattern,
};

const SOURCE: &str = "core";

pub const INVALID_INSTANCE_EXPR: &str = "IR-001";
pub const INVALID_ENDPOINT_EXPR: &str = "IR-002";
pub const PATTERN_PARSE_ERROR: &str = "IR-003";
pub const AMBIGUOUS_REFERENCE: &str = "IR-006";
pub const QUALIFIED_REFERENCE_ERROR: &str = "IR-010";
pub const UNQUALIFIED_REFERENCE_ERROR: &str = "IR-011";

// ==============================================================================
// Entry Points
// ==============================================================================

/// Lower a resolved import graph into a PatternedGraph program.
pub fn build_patterned_graph(import_graph: &ImportGraph) -> (ProgramGraph, Vec<Diagnostic>) {
    let mut lowerer = Lowerer::new(Some(import_graph));
    for (file_id, document) in &import_graph.documents {
        lowerer.allocate_symbols(file_id, document);
    }
    for (file_id, document) in &import_graph.documents {
        lowerer.lower_document(file_id, document);
    }
    (lowerer.graph, lowerer.diagnostics)
}

/// Lower a single document with no imports in scope. Used by tests and by
/// callers that already hold a parsed AST.
pub fn build_patterned_graph_from_document(
    document: &AsdlDocument,
    file_id: &str,
) -> (ProgramGraph, Vec<Diagnostic>) {
    let mut lowerer = Lowerer::new(None);
    lowerer.allocate_symbols(&file_id.to_string(), document);
    lowerer.lower_document(&file_id.to_string(), document);
    (lowerer.graph, lowerer.diagnostics)
}

// ==============================================================================
// Lowerer
// ==============================================================================

struct Lowerer<'a> {
    import_graph: Option<&'a ImportGraph>,
    graph: ProgramGraph,
    diagnostics: Vec<Diagnostic>,
    /// `(file, symbol)` to target, for reference resolution.
    module_ids: IndexMap<(FileId, String), ModuleId>,
    device_ids: IndexMap<(FileId, String), DeviceId>,
}

impl<'a> Lowerer<'a> {
    fn new(import_graph: Option<&'a ImportGraph>) -> Self {
        Lowerer {
            import_graph,
            graph: ProgramGraph::default(),
            diagnostics: Vec::new(),
            module_ids: IndexMap::new(),
            device_ids: IndexMap::new(),
        }
    }

    /// First pass: allocate ids for every module and device so references
    /// can resolve regardless of declaration order.
    fn allocate_symbols(&mut self, file_id: &FileId, document: &AsdlDocument) {
        for (name, module) in &document.modules {
            let id = ModuleId(self.graph.modules.len() as u32);
            self.module_ids.insert((file_id.clone(), name.clone()), id);
            self.graph.modules.push(ModuleGraph {
                id,
                name: name.clone(),
                file_id: file_id.clone(),
                port_order: Vec::new(),
                nets: Vec::new(),
                instances: Vec::new(),
                endpoints: Vec::new(),
                spice_template: module.spice_template.clone(),
                hierarchical: module.instances.is_some(),
                parameters: module.parameters.clone(),
                variables: module.variables.clone(),
                pdk: module.pdk.clone(),
                doc: module.doc.clone(),
            });
            self.graph
                .spans
                .record(EntityId::Module(id), module.loc.to_source_span());
        }
        for (name, device) in &document.devices {
            let id = DeviceId(self.graph.devices.len() as u32);
            self.device_ids.insert((file_id.clone(), name.clone()), id);
            self.graph.devices.push(DeviceDef {
                id,
                name: name.clone(),
                file_id: file_id.clone(),
                ports: device.ports.clone(),
                parameters: device.parameters.clone(),
                variables: device.variables.clone(),
                backends: device.backends.clone(),
                pdk: device.pdk.clone(),
            });
        }
    }

    fn lower_document(&mut self, file_id: &FileId, document: &AsdlDocument) {
        debug!(file = %file_id, modules = document.modules.len(), "lowering document");
        for (name, module) in &document.modules {
            let module_id = self.module_ids[&(file_id.clone(), name.clone())];
            self.lower_module(file_id, document, name, module, module_id);
        }
    }

    // ==========================================================================
    // Diagnostics helpers
    // ==========================================================================

    fn emit_error(&mut self, code: &str, message: String, span: Option<SourceSpan>) {
        self.diagnostics
            .push(Diagnostic::error(code, message, span).with_source(SOURCE));
    }

    fn emit_pattern_errors(
        &mut self,
        errors: Vec<PatternError>,
        module_name: &str,
        context: &str,
        fallback_span: Option<&SourceSpan>,
    ) {
        for error in errors {
            let span = error.span.clone().or_else(|| fallback_span.cloned());
            self.diagnostics.push(
                Diagnostic::error(
                    error.code,
                    format!("{} in module '{module_name}' ({context}).", error.message),
                    span,
                )
                .with_source(SOURCE),
            );
        }
    }

    // ==========================================================================
    // Expressions
    // ==========================================================================

    #[allow(clippy::too_many_arguments)]
    fn register_name_expr(
        &mut self,
        raw: &str,
        kind: ExprKind,
        named: &IndexMap<String, NamedPattern>,
        span: Option<SourceSpan>,
        module_name: &str,
        context: &str,
        require_single_segment: bool,
    ) -> Option<ExprId> {
        // `<@alias>` references are resolved against module-local pattern
        // definitions, so their raw text is not a stable interning key.
        let module_scoped = raw.contains("<@");
        if !module_scoped
            && let Some(id) = self.graph.exprs.lookup(kind, raw)
        {
            return Some(id);
        }
        let (parsed, errors) = parse_pattern_expr(raw, named, span.clone());
        if !errors.is_empty() {
            self.emit_pattern_errors(errors, module_name, context, span.as_ref());
            return None;
        }
        let parsed = parsed?;
        if require_single_segment && parsed.segments.len() > 1 {
            self.emit_error(
                PATTERN_PARSE_ERROR,
                format!(
                    "Net name expressions must not contain splices in module \
                     '{module_name}' ({context})."
                ),
                span,
            );
            return None;
        }
        if module_scoped {
            Some(self.graph.exprs.insert_name(parsed))
        } else {
            Some(self.graph.exprs.intern_name(kind, parsed))
        }
    }

    fn register_endpoint_expr(
        &mut self,
        raw: &str,
        named: &IndexMap<String, NamedPattern>,
        span: Option<SourceSpan>,
        module_name: &str,
    ) -> Option<ExprId> {
        let module_scoped = raw.contains("<@");
        if !module_scoped
            && let Some(id) = self.graph.exprs.lookup(ExprKind::Endpoint, raw)
        {
            return Some(id);
        }
        let (parsed, errors) = parse_endpoint_expr(raw, named, span.clone());
        if !errors.is_empty() {
            self.emit_pattern_errors(errors, module_name, "endpoint expression", span.as_ref());
            return None;
        }
        if module_scoped {
            Some(self.graph.exprs.insert_endpoint(parsed?))
        } else {
            Some(self.graph.exprs.intern_endpoint(parsed?))
        }
    }

    // ==========================================================================
    // Reference resolution
    // ==========================================================================

    fn resolve_reference(
        &mut self,
        reference: &str,
        file_id: &FileId,
        document: &AsdlDocument,
        module_name: &str,
        span: Option<SourceSpan>,
    ) -> Option<RefTarget> {
        if let Some((alias, tail)) = reference.split_once('.') {
            return self.resolve_qualified(alias, tail, reference, file_id, module_name, span);
        }

        let module_key = (file_id.clone(), reference.to_string());
        let module_target = self.module_ids.get(&module_key).copied();
        let device_target = self.device_ids.get(&module_key).copied();
        match (module_target, device_target) {
            (Some(_), Some(_)) => {
                self.emit_error(
                    AMBIGUOUS_REFERENCE,
                    format!(
                        "Reference '{reference}' is ambiguous between module and device \
                         in module '{module_name}'."
                    ),
                    span,
                );
                None
            }
            (Some(id), None) => Some(RefTarget::Module(id)),
            (None, Some(id)) => Some(RefTarget::Device(id)),
            (None, None) => {
                // A model alias can stand in for the qualified form.
                if let Some(target) = document.model_alias.get(reference) {
                    let (alias, tail) = target
                        .split_once('.')
                        .expect("model aliases are validated as qualified");
                    return self
                        .resolve_qualified(alias, tail, reference, file_id, module_name, span);
                }
                self.emit_error(
                    UNQUALIFIED_REFERENCE_ERROR,
                    format!(
                        "Unresolved instance reference '{reference}' in module '{module_name}'."
                    ),
                    span,
                );
                None
            }
        }
    }

    fn resolve_qualified(
        &mut self,
        alias: &str,
        tail: &str,
        reference: &str,
        file_id: &FileId,
        module_name: &str,
        span: Option<SourceSpan>,
    ) -> Option<RefTarget> {
        let target_file = self
            .import_graph
            .and_then(|g| g.name_envs.get(file_id))
            .and_then(|env| env.get(alias));
        let Some(target_file) = target_file else {
            self.emit_error(
                QUALIFIED_REFERENCE_ERROR,
                format!(
                    "Unresolved qualified reference '{reference}': unknown import alias \
                     '{alias}' in module '{module_name}'."
                ),
                span,
            );
            return None;
        };

        let module_key = (target_file.clone(), tail.to_string());
        if let Some(id) = self.module_ids.get(&module_key) {
            return Some(RefTarget::Module(*id));
        }
        if let Some(id) = self.device_ids.get(&module_key) {
            return Some(RefTarget::Device(*id));
        }
        self.emit_error(
            QUALIFIED_REFERENCE_ERROR,
            format!(
                "Unresolved qualified reference '{reference}': '{tail}' is not declared \
                 by import '{alias}' in module '{module_name}'."
            ),
            span,
        );
        None
    }

    // ==========================================================================
    // Module lowering
    // ==========================================================================

    fn lower_module(
        &mut self,
        file_id: &FileId,
        document: &AsdlDocument,
        module_name: &str,
        module: &ModuleDecl,
        module_id: ModuleId,
    ) {
        // Named patterns, validated at definition time.
        let mut named: IndexMap<String, NamedPattern> = IndexMap::new();
        for (name, def) in &module.patterns {
            if let Err(error) = validate_named_pattern(name, def) {
                self.emit_pattern_errors(
                    vec![error],
                    module_name,
                    "named pattern definition",
                    module.loc.to_source_span().as_ref(),
                );
                continue;
            }
            named.insert(name.clone(), NamedPattern { expr: def.clone() });
        }

        // Instances.
        if let Some(instances) = &module.instances {
            for (inst_raw, instance) in instances {
                let inst_span = instance.loc.to_source_span();
                let Some(name_expr) = self.register_name_expr(
                    inst_raw,
                    ExprKind::InstanceName,
                    &named,
                    inst_span.clone(),
                    module_name,
                    "instance name",
                    false,
                ) else {
                    continue;
                };

                if instance.model.is_empty() {
                    self.emit_error(
                        INVALID_INSTANCE_EXPR,
                        format!(
                            "Instance expression missing reference in module '{module_name}'."
                        ),
                        inst_span,
                    );
                    continue;
                }
                let Some(target) = self.resolve_reference(
                    &instance.model,
                    file_id,
                    document,
                    module_name,
                    inst_span.clone(),
                ) else {
                    continue;
                };

                let mut params: IndexMap<String, ExprId> = IndexMap::new();
                for (param_name, value) in &instance.parameters {
                    let raw = value.to_spice_string();
                    if let Some(expr) = self.register_name_expr(
                        &raw,
                        ExprKind::Param,
                        &named,
                        inst_span.clone(),
                        module_name,
                        &format!("instance param '{param_name}'"),
                        false,
                    ) {
                        params.insert(param_name.clone(), expr);
                    }
                }

                let index = self.graph.modules[module_id.0 as usize].instances.len();
                self.graph.modules[module_id.0 as usize]
                    .instances
                    .push(InstanceBundle {
                        name_expr,
                        target,
                        ref_raw: instance.model.clone(),
                        params,
                        doc: instance.doc.clone(),
                    });
                self.graph
                    .spans
                    .record(EntityId::Instance(module_id, index), instance.loc.to_source_span());
            }
        }

        // Connectivity from both syntaxes, keyed by the net name with the
        // `$` port-net marker already stripped, so `$out:` endpoints and a
        // mapping to `out` land on the same bundle.
        let mut nets: IndexMap<String, NetAccum> = IndexMap::new();
        let mut suppressed: Vec<(String, String)> = Vec::new();

        for (net_token, decl) in &module.nets {
            let (net_name, is_port) = split_net_token(net_token);
            let accum = nets.entry(net_name.to_string()).or_default();
            accum.is_port |= is_port;
            accum.loc = decl.loc.to_source_span();
            for (item, item_loc) in decl.endpoints.iter().zip(&decl.endpoint_locs) {
                let item_span = item_loc.to_source_span();
                match item {
                    EndpointItem::Single(endpoint) => {
                        accum.push_endpoint(endpoint, item_span, &mut suppressed);
                    }
                    EndpointItem::Group(group) => {
                        let start = accum.endpoints.len();
                        for endpoint in group {
                            accum.push_endpoint(endpoint, item_span.clone(), &mut suppressed);
                        }
                        let count = accum.endpoints.len() - start;
                        if count > 0 {
                            accum.group_slices.push(GroupSlice { start, count });
                        }
                    }
                }
            }
        }

        if let Some(instances) = &module.instances {
            for (inst_raw, instance) in instances {
                for (port, net_token) in &instance.mappings {
                    let (net_name, is_port) = split_net_token(net_token);
                    let accum = nets.entry(net_name.to_string()).or_default();
                    accum.is_port |= is_port;
                    if accum.loc.is_none() {
                        accum.loc = instance.loc.to_source_span();
                    }
                    accum.push_endpoint(
                        &format!("{inst_raw}.{port}"),
                        instance.loc.to_source_span(),
                        &mut suppressed,
                    );
                }
            }
        }

        // Default bindings: add a defaulted endpoint unless an explicit one
        // (or a `!` suppression) exists for the (instance, port) pair.
        let explicit: IndexMap<(String, String), String> = nets
            .iter()
            .flat_map(|(token, accum)| {
                accum.endpoints.iter().filter_map(|(endpoint, _)| {
                    endpoint
                        .split_once('.')
                        .map(|(inst, port)| ((inst.to_string(), port.to_string()), token.clone()))
                })
            })
            .collect();
        for (reference, bindings) in &module.instance_defaults {
            if let Some(instances) = &module.instances {
                for (inst_raw, instance) in instances {
                    if &instance.model != reference {
                        continue;
                    }
                    for (port, net_token) in bindings {
                        let key = (inst_raw.clone(), port.clone());
                        if suppressed.contains(&key) {
                            continue;
                        }
                        let (net_name, is_port) = split_net_token(net_token);
                        if let Some(existing) = explicit.get(&key) {
                            if existing != net_name {
                                self.diagnostics.push(
                                    Diagnostic::warning(
                                        "LINT-002",
                                        format!(
                                            "Default binding '{port}' -> '{net_name}' for \
                                             instance '{inst_raw}' is overridden by explicit \
                                             net '{existing}' in module '{module_name}'."
                                        ),
                                        instance.loc.to_source_span(),
                                    )
                                    .with_source(SOURCE),
                                );
                            }
                            continue;
                        }
                        let accum = nets.entry(net_name.to_string()).or_default();
                        accum.is_port |= is_port;
                        if accum.loc.is_none() {
                            accum.loc = instance.loc.to_source_span();
                        }
                        accum.push_endpoint(
                            &format!("{inst_raw}.{port}"),
                            instance.loc.to_source_span(),
                            &mut suppressed,
                        );
                    }
                }
            }
        }

        // Lower accumulated nets into bundles.
        for (net_name, accum) in &nets {
            let Some(name_expr) = self.register_name_expr(
                net_name,
                ExprKind::NetName,
                &named,
                accum.loc.clone(),
                module_name,
                "net name",
                true,
            ) else {
                continue;
            };

            let mut endpoint_indices = Vec::new();
            for (endpoint_raw, endpoint_span) in &accum.endpoints {
                if let Err(message) = check_endpoint_shape(endpoint_raw) {
                    self.emit_error(
                        INVALID_ENDPOINT_EXPR,
                        format!("{message} in module '{module_name}'."),
                        endpoint_span.clone().or_else(|| accum.loc.clone()),
                    );
                    continue;
                }
                let Some(expr) = self.register_endpoint_expr(
                    endpoint_raw,
                    &named,
                    endpoint_span.clone().or_else(|| accum.loc.clone()),
                    module_name,
                ) else {
                    continue;
                };
                let endpoint_index = self.graph.modules[module_id.0 as usize].endpoints.len();
                self.graph.modules[module_id.0 as usize]
                    .endpoints
                    .push(EndpointBundle { expr });
                self.graph.spans.record(
                    EntityId::Endpoint(module_id, endpoint_index),
                    endpoint_span.clone(),
                );
                endpoint_indices.push(endpoint_index);
            }

            let net_index = self.graph.modules[module_id.0 as usize].nets.len();
            self.graph.modules[module_id.0 as usize].nets.push(NetBundle {
                name_expr,
                endpoints: endpoint_indices,
                is_port: accum.is_port,
                group_slices: accum.group_slices.clone(),
            });
            self.graph
                .spans
                .record(EntityId::Net(module_id, net_index), accum.loc.clone());
        }

        // Port order: declared ports first, then `$`-declared port-nets not
        // already covered.
        let mut port_order: Vec<ExprId> = Vec::new();
        let mut port_raws: Vec<String> = Vec::new();
        for port_raw in module.ports.keys() {
            if let Some(expr) = self.register_name_expr(
                port_raw,
                ExprKind::PortName,
                &named,
                module.ports[port_raw].loc.to_source_span(),
                module_name,
                "port name",
                true,
            ) {
                port_order.push(expr);
                port_raws.push(port_raw.clone());
            }
        }
        for (net_name, accum) in &nets {
            if accum.is_port && !port_raws.iter().any(|p| p == net_name) {
                if let Some(expr) = self.register_name_expr(
                    net_name,
                    ExprKind::PortName,
                    &named,
                    None,
                    module_name,
                    "port name",
                    true,
                ) {
                    port_order.push(expr);
                    port_raws.push(net_name.clone());
                }
            }
        }
        self.graph.modules[module_id.0 as usize].port_order = port_order;
    }
}

// ==============================================================================
// Net Accumulation Helpers
// ==============================================================================

#[derive(Default)]
struct NetAccum {
    endpoints: Vec<(String, Option<SourceSpan>)>,
    group_slices: Vec<GroupSlice>,
    loc: Option<SourceSpan>,
    is_port: bool,
}

impl NetAccum {
    /// Record an endpoint token. A leading `!` suppresses default bindings
    /// for that (instance, port) pair instead of connecting anything.
    fn push_endpoint(
        &mut self,
        raw: &str,
        span: Option<SourceSpan>,
        suppressed: &mut Vec<(String, String)>,
    ) {
        if let Some(stripped) = raw.strip_prefix('!') {
            if let Some((inst, port)) = stripped.split_once('.') {
                suppressed.push((inst.to_string(), port.to_string()));
            }
            return;
        }
        self.endpoints.push((raw.to_string(), span));
    }
}

fn split_net_token(token: &str) -> (&str, bool) {
    match token.strip_prefix('$') {
        Some(name) => (name, true),
        None => (token, false),
    }
}

fn check_endpoint_shape(token: &str) -> Result<(), String> {
    if token.matches('.').count() != 1 {
        return Err(format!("Invalid endpoint token '{token}'; expected inst.pin"));
    }
    let (inst, pin) = token.split_once('.').expect("dot presence checked above");
    if inst.is_empty() || pin.is_empty() {
        return Err(format!("Invalid endpoint token '{token}'; expected inst.pin"));
    }
    Ok(())
}
