// ==============================================================================
// PatternedGraph: Shape-Preserving IR
// ==============================================================================
//
// The first IR after the AST. Nothing is expanded yet: every name is held as
// an interned pattern expression id, and connectivity is recorded as bundles
// (one bundle per declared net / instance / endpoint, regardless of how many
// atoms it will expand to).
//
// Arena-and-ids layout: modules and devices live in flat vectors owned by
// `ProgramGraph`; everything references them by index. Source spans for
// graph entities live in a single side index keyed by `EntityId` — the
// bundles themselves carry no back-pointers.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::ast::ParamValue;
use crate::diagnostics::SourceSpan;
use crate::imports::FileId;
use crate::patterns::{EndpointExpr, PatternExpr};

// ==============================================================================
// Ids
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(pub u32);

/// Target of an instance's model reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefTarget {
    Module(ModuleId),
    Device(DeviceId),
}

/// Graph entity key for the span side-index. Net/instance/endpoint indices
/// are positions in the owning module's vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    Module(ModuleId),
    Net(ModuleId, usize),
    Instance(ModuleId, usize),
    Endpoint(ModuleId, usize),
}

// ==============================================================================
// Expression Registry
// ==============================================================================

/// Semantic role of a registered expression. Interning is keyed by
/// `(kind, raw)` so a net named `x` and a parameter valued `x` stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    InstanceName,
    NetName,
    PortName,
    Endpoint,
    Param,
}

#[derive(Debug, Clone)]
pub enum ExprEntry {
    Name(PatternExpr),
    Endpoint(EndpointExpr),
}

/// Interned parsed expressions, shared by every module of a program. All
/// downstream IRs reference expressions by id only.
#[derive(Debug, Default)]
pub struct ExprRegistry {
    entries: Vec<ExprEntry>,
    interned: HashMap<(ExprKind, String), ExprId>,
}

impl ExprRegistry {
    pub fn new() -> Self {
        ExprRegistry::default()
    }

    pub fn intern_name(&mut self, kind: ExprKind, expr: PatternExpr) -> ExprId {
        let key = (kind, expr.raw.clone());
        if let Some(id) = self.interned.get(&key) {
            return *id;
        }
        let id = ExprId(self.entries.len() as u32);
        self.entries.push(ExprEntry::Name(expr));
        self.interned.insert(key, id);
        id
    }

    pub fn intern_endpoint(&mut self, expr: EndpointExpr) -> ExprId {
        let key = (ExprKind::Endpoint, expr.raw.clone());
        if let Some(id) = self.interned.get(&key) {
            return *id;
        }
        let id = ExprId(self.entries.len() as u32);
        self.entries.push(ExprEntry::Endpoint(expr));
        self.interned.insert(key, id);
        id
    }

    /// Register without interning. Used for expressions whose raw text is
    /// not a stable key — `<@alias>` references resolve against module-local
    /// pattern definitions, so equal raw strings can parse differently.
    pub fn insert_name(&mut self, expr: PatternExpr) -> ExprId {
        let id = ExprId(self.entries.len() as u32);
        self.entries.push(ExprEntry::Name(expr));
        id
    }

    /// See [`ExprRegistry::insert_name`].
    pub fn insert_endpoint(&mut self, expr: EndpointExpr) -> ExprId {
        let id = ExprId(self.entries.len() as u32);
        self.entries.push(ExprEntry::Endpoint(expr));
        id
    }

    pub fn lookup(&self, kind: ExprKind, raw: &str) -> Option<ExprId> {
        self.interned.get(&(kind, raw.to_string())).copied()
    }

    pub fn name(&self, id: ExprId) -> Option<&PatternExpr> {
        match self.entries.get(id.0 as usize) {
            Some(ExprEntry::Name(expr)) => Some(expr),
            _ => None,
        }
    }

    pub fn endpoint(&self, id: ExprId) -> Option<&EndpointExpr> {
        match self.entries.get(id.0 as usize) {
            Some(ExprEntry::Endpoint(expr)) => Some(expr),
            _ => None,
        }
    }

    pub fn raw(&self, id: ExprId) -> &str {
        match &self.entries[id.0 as usize] {
            ExprEntry::Name(expr) => &expr.raw,
            ExprEntry::Endpoint(expr) => &expr.raw,
        }
    }

    pub fn span(&self, id: ExprId) -> Option<&SourceSpan> {
        match &self.entries[id.0 as usize] {
            ExprEntry::Name(expr) => expr.span.as_ref(),
            ExprEntry::Endpoint(expr) => expr.span.as_ref(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Side registry of source spans keyed by entity id.
#[derive(Debug, Default)]
pub struct SpanIndex {
    spans: HashMap<EntityId, SourceSpan>,
}

impl SpanIndex {
    pub fn record(&mut self, entity: EntityId, span: Option<SourceSpan>) {
        if let Some(span) = span {
            self.spans.insert(entity, span);
        }
    }

    pub fn get(&self, entity: EntityId) -> Option<&SourceSpan> {
        self.spans.get(&entity)
    }
}

// ==============================================================================
// Bundles
// ==============================================================================

/// Contiguous run of endpoints that the YAML grouped into a sublist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSlice {
    pub start: usize,
    pub count: usize,
}

/// A declared net: its (unexpanded) name expression and the endpoint bundles
/// attached to it, as indices into the module's endpoint vector.
#[derive(Debug, Clone)]
pub struct NetBundle {
    pub name_expr: ExprId,
    pub endpoints: Vec<usize>,
    pub is_port: bool,
    pub group_slices: Vec<GroupSlice>,
}

/// A declared instance: its name expression, resolved model reference, and
/// parameter expressions.
#[derive(Debug, Clone)]
pub struct InstanceBundle {
    pub name_expr: ExprId,
    pub target: RefTarget,
    pub ref_raw: String,
    pub params: IndexMap<String, ExprId>,
    pub doc: Option<String>,
}

/// A declared endpoint (`inst.pin` expression) belonging to one net bundle.
#[derive(Debug, Clone)]
pub struct EndpointBundle {
    pub expr: ExprId,
}

// ==============================================================================
// Modules, Devices, Program
// ==============================================================================

#[derive(Debug)]
pub struct ModuleGraph {
    pub id: ModuleId,
    pub name: String,
    pub file_id: FileId,
    /// Port name expressions in declaration order.
    pub port_order: Vec<ExprId>,
    pub nets: Vec<NetBundle>,
    pub instances: Vec<InstanceBundle>,
    pub endpoints: Vec<EndpointBundle>,
    // Primitive payload, carried through unchanged for emission.
    pub spice_template: Option<String>,
    /// True when the declaration carried an `instances` section.
    pub hierarchical: bool,
    pub parameters: IndexMap<String, ParamValue>,
    pub variables: IndexMap<String, ParamValue>,
    pub pdk: Option<String>,
    pub doc: Option<String>,
}

impl ModuleGraph {
    pub fn is_primitive(&self) -> bool {
        self.spice_template.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct DeviceDef {
    pub id: DeviceId,
    pub name: String,
    pub file_id: FileId,
    pub ports: Vec<String>,
    pub parameters: IndexMap<String, ParamValue>,
    pub variables: IndexMap<String, ParamValue>,
    /// Backend name to SPICE template.
    pub backends: IndexMap<String, String>,
    pub pdk: Option<String>,
}

/// The whole lowered program: module and device arenas, the interned
/// expression registry, and the span side-index.
#[derive(Debug, Default)]
pub struct ProgramGraph {
    pub modules: Vec<ModuleGraph>,
    pub devices: Vec<DeviceDef>,
    pub exprs: ExprRegistry,
    pub spans: SpanIndex,
}

impl ProgramGraph {
    pub fn module(&self, id: ModuleId) -> &ModuleGraph {
        &self.modules[id.0 as usize]
    }

    pub fn device(&self, id: DeviceId) -> &DeviceDef {
        &self.devices[id.0 as usize]
    }

    /// Find a module by symbolic name, preferring `file_id` when given.
    pub fn find_module(&self, name: &str, file_id: Option<&str>) -> Option<ModuleId> {
        self.modules
            .iter()
            .find(|m| m.name == name && file_id.is_none_or(|f| m.file_id == f))
            .map(|m| m.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap as Map;

    #[test]
    fn registry_interns_by_kind_and_raw() {
        let mut registry = ExprRegistry::new();
        let expr = crate::patterns::parse_pattern_expr("a<x|y>", &Map::new(), None)
            .0
            .expect("parses");
        let first = registry.intern_name(ExprKind::NetName, expr.clone());
        let again = registry.intern_name(ExprKind::NetName, expr.clone());
        let other_kind = registry.intern_name(ExprKind::Param, expr);
        assert_eq!(first, again);
        assert_ne!(first, other_kind);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.raw(first), "a<x|y>");
    }

    #[test]
    fn span_index_round_trip() {
        let mut spans = SpanIndex::default();
        let entity = EntityId::Net(ModuleId(0), 3);
        spans.record(entity, Some(crate::diagnostics::SourceSpan::point("f", 1, 2)));
        assert!(spans.get(entity).is_some());
        assert!(spans.get(EntityId::Net(ModuleId(0), 4)).is_none());
    }
}
