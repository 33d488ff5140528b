// ==============================================================================
// Structural Validation on the AST
// ==============================================================================
//
// Pure checks over a parsed document, run before IR lowering. Nothing is
// rewritten; each finding becomes one diagnostic. Port-mapping and parameter
// checks only apply to instances whose model resolves to a module in the
// same document — cross-file references are resolved (and checked) during
// lowering instead.
//
// Names containing pattern delimiters are left to the pattern engine; the
// literal-name comparisons here skip them rather than second-guess the
// expansion.

use indexmap::IndexSet;

use crate::ast::{AsdlDocument, InstanceDecl, ModuleDecl};
use crate::diagnostics::Diagnostic;

const SOURCE: &str = "validator";

fn has_pattern_chars(name: &str) -> bool {
    name.chars().any(|c| "<>[];|".contains(c))
}

/// Run every structural check and return the findings.
pub fn validate_document(document: &AsdlDocument) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for (module_name, module) in &document.modules {
        if module.is_hierarchical() && !module.parameters.is_empty() {
            diagnostics.push(
                Diagnostic::error(
                    "V0201",
                    format!(
                        "Hierarchical module '{module_name}' declares parameters; only \
                         primitive modules may."
                    ),
                    module.loc.to_source_span(),
                )
                .with_source(SOURCE),
            );
        }

        for (instance_name, instance) in module.instances.iter().flatten() {
            let target = lookup_local_target(document, &instance.model);
            if let Some(target) = target {
                check_port_mappings(instance_name, instance, target, &mut diagnostics);
                check_parameter_overrides(instance_name, instance, target, &mut diagnostics);
            }
        }

        check_net_declarations(module_name, module, &mut diagnostics);
    }

    check_unused_modules(document, &mut diagnostics);
    diagnostics
}

fn lookup_local_target<'a>(
    document: &'a AsdlDocument,
    reference: &str,
) -> Option<&'a ModuleDecl> {
    if reference.contains('.') {
        return None;
    }
    document.modules.get(reference)
}

// ==============================================================================
// Port Mappings (V0301, V0302)
// ==============================================================================

fn check_port_mappings(
    instance_name: &str,
    instance: &InstanceDecl,
    target: &ModuleDecl,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if instance.mappings.is_empty() {
        return;
    }
    if target.ports.is_empty() {
        let mapped: Vec<&str> = instance.mappings.keys().map(String::as_str).collect();
        diagnostics.push(
            Diagnostic::error(
                "V0301",
                format!(
                    "Instance '{instance_name}' maps ports [{}] but module '{}' declares \
                     no ports.",
                    mapped.join(", "),
                    instance.model
                ),
                instance.loc.to_source_span(),
            )
            .with_source(SOURCE),
        );
        return;
    }

    if target.ports.keys().any(|p| has_pattern_chars(p)) {
        return;
    }
    let invalid: Vec<&str> = instance
        .mappings
        .keys()
        .filter(|port| !has_pattern_chars(port) && !target.ports.contains_key(port.as_str()))
        .map(String::as_str)
        .collect();
    if !invalid.is_empty() {
        let mut invalid = invalid;
        invalid.sort_unstable();
        let mut valid: Vec<&str> = target.ports.keys().map(String::as_str).collect();
        valid.sort_unstable();
        diagnostics.push(
            Diagnostic::error(
                "V0302",
                format!(
                    "Instance '{instance_name}' maps unknown ports [{}] of module '{}'; \
                     valid ports are [{}].",
                    invalid.join(", "),
                    instance.model,
                    valid.join(", ")
                ),
                instance.loc.to_source_span(),
            )
            .with_source(SOURCE),
        );
    }
}

// ==============================================================================
// Parameter Overrides (V0303, V0304, V0305)
// ==============================================================================

fn check_parameter_overrides(
    instance_name: &str,
    instance: &InstanceDecl,
    target: &ModuleDecl,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if instance.parameters.is_empty() {
        return;
    }

    // Overrides on a hierarchical target pass through to the subcircuit
    // call, so this is a style finding rather than a hard failure.
    if target.is_hierarchical() {
        let overridden: Vec<&str> = instance.parameters.keys().map(String::as_str).collect();
        diagnostics.push(
            Diagnostic::warning(
                "V0303",
                format!(
                    "Instance '{instance_name}' overrides parameters [{}] on hierarchical \
                     module '{}'; only primitive modules declare overridable parameters.",
                    overridden.join(", "),
                    instance.model
                ),
                instance.loc.to_source_span(),
            )
            .with_source(SOURCE),
        );
        return;
    }

    for param in instance.parameters.keys() {
        if target.variables.contains_key(param) {
            diagnostics.push(
                Diagnostic::error(
                    "V0304",
                    format!(
                        "Instance '{instance_name}' overrides '{param}', which is a \
                         variable of module '{}'; variables cannot be overridden.",
                        instance.model
                    ),
                    instance.loc.to_source_span(),
                )
                .with_source(SOURCE),
            );
        } else if !target.parameters.contains_key(param) {
            diagnostics.push(
                Diagnostic::error(
                    "V0305",
                    format!(
                        "Instance '{instance_name}' overrides unknown parameter '{param}' \
                         of module '{}'.",
                        instance.model
                    ),
                    instance.loc.to_source_span(),
                )
                .with_source(SOURCE),
            );
        }
    }
}

// ==============================================================================
// Net Declarations (V0401)
// ==============================================================================

fn check_net_declarations(
    module_name: &str,
    module: &ModuleDecl,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(instances) = &module.instances else {
        return;
    };

    let mut declared: IndexSet<&str> = IndexSet::new();
    declared.extend(module.ports.keys().map(String::as_str));
    declared.extend(module.internal_nets.iter().map(String::as_str));
    declared.extend(
        module
            .nets
            .keys()
            .map(|token| token.strip_prefix('$').unwrap_or(token)),
    );

    // Purely stylistic: mapping to an undeclared net works (the net is
    // created implicitly) but makes the connectivity harder to audit.
    if declared.is_empty() {
        return;
    }

    let mut undeclared: IndexSet<&str> = IndexSet::new();
    for instance in instances.values() {
        for net in instance.mappings.values() {
            if !has_pattern_chars(net) && !declared.contains(net.as_str()) {
                undeclared.insert(net.as_str());
            }
        }
    }
    if !undeclared.is_empty() {
        let mut nets: Vec<&str> = undeclared.into_iter().collect();
        nets.sort_unstable();
        let listed: Vec<String> = nets.iter().map(|n| format!("'{n}'")).collect();
        diagnostics.push(
            Diagnostic::warning(
                "V0401",
                format!(
                    "Module '{module_name}' uses undeclared nets: {}.",
                    listed.join(", ")
                ),
                module.loc.to_source_span(),
            )
            .with_source(SOURCE),
        );
    }
}

// ==============================================================================
// Unused Modules (V0601)
// ==============================================================================

fn check_unused_modules(document: &AsdlDocument, diagnostics: &mut Vec<Diagnostic>) {
    let mut used: IndexSet<&str> = IndexSet::new();
    for module in document.modules.values() {
        for instance in module.instances.iter().flatten().map(|(_, i)| i) {
            if document.modules.contains_key(&instance.model) {
                used.insert(instance.model.as_str());
            }
        }
    }

    let mut unused: Vec<&str> = document
        .modules
        .keys()
        .map(String::as_str)
        .filter(|name| !used.contains(name) && document.top_module() != Some(name))
        .collect();
    if unused.is_empty() {
        return;
    }
    unused.sort_unstable();
    let listed: Vec<String> = unused.iter().map(|m| format!("'{m}'")).collect();
    diagnostics.push(
        Diagnostic::warning(
            "V0601",
            format!("Unused modules defined but never instantiated: {}.", listed.join(", ")),
            None,
        )
        .with_source(SOURCE),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::parser::DocumentParser;

    fn validate(content: &str) -> Vec<Diagnostic> {
        let (document, parse_diags) =
            DocumentParser::new().parse_string(content, Some("test.asdl"));
        assert!(
            !crate::diagnostics::has_error(&parse_diags),
            "parse failed: {parse_diags:?}"
        );
        validate_document(&document.expect("parses"))
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.code.as_str()).collect()
    }

    const PRIMITIVE: &str = "\x20 r:\n\
        \x20   spice_template: \"R{name} {a} {b} {R}\"\n\
        \x20   parameters: {R: 1k}\n\
        \x20   variables: {tc: 0.1}\n\
        \x20   ports: {a: {dir: in_out}, b: {dir: in_out}}\n";

    #[test]
    fn clean_design_validates() {
        let diagnostics = validate(&format!(
            "file_info: {{top_module: top}}\n\
             modules:\n\
             \x20 top:\n\
             \x20   ports: {{in: {{dir: in}}, out: {{dir: out}}}}\n\
             \x20   instances:\n\
             \x20     R1: {{model: r, mappings: {{a: in, b: out}}, parameters: {{R: 2k}}}}\n\
             {PRIMITIVE}"
        ));
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }

    #[test]
    fn v0201_hierarchical_module_with_parameters() {
        let diagnostics = validate(
            "file_info: {top_module: t}\n\
             modules:\n\
             \x20 t:\n\
             \x20   parameters: {M: 2}\n\
             \x20   instances: {}\n",
        );
        assert!(codes(&diagnostics).contains(&"V0201"));
    }

    #[test]
    fn v0301_mappings_against_portless_module() {
        let diagnostics = validate(
            "file_info: {top_module: t}\n\
             modules:\n\
             \x20 child:\n\
             \x20   instances: {}\n\
             \x20 t:\n\
             \x20   instances:\n\
             \x20     U1: {model: child, mappings: {a: n1}}\n",
        );
        assert!(codes(&diagnostics).contains(&"V0301"));
    }

    #[test]
    fn v0302_unknown_mapped_port() {
        let diagnostics = validate(&format!(
            "file_info: {{top_module: t}}\n\
             modules:\n\
             \x20 t:\n\
             \x20   instances:\n\
             \x20     R1: {{model: r, mappings: {{a: n1, nope: n2}}}}\n\
             {PRIMITIVE}"
        ));
        let diag = diagnostics
            .iter()
            .find(|d| d.code == "V0302")
            .expect("V0302 present");
        assert!(diag.message.contains("nope"));
        assert!(diag.message.contains("a, b"));
    }

    #[test]
    fn v0303_override_on_hierarchical_target_is_warning() {
        let diagnostics = validate(
            "file_info: {top_module: t}\n\
             modules:\n\
             \x20 child:\n\
             \x20   ports: {a: {dir: in}}\n\
             \x20   instances: {}\n\
             \x20 t:\n\
             \x20   instances:\n\
             \x20     U1: {model: child, mappings: {a: n1}, parameters: {M: 2}}\n",
        );
        let diag = diagnostics
            .iter()
            .find(|d| d.code == "V0303")
            .expect("V0303 present");
        assert_eq!(diag.severity, Severity::Warning);
    }

    #[test]
    fn v0304_variable_override_rejected() {
        let diagnostics = validate(&format!(
            "file_info: {{top_module: t}}\n\
             modules:\n\
             \x20 t:\n\
             \x20   instances:\n\
             \x20     R1: {{model: r, mappings: {{a: x, b: y}}, parameters: {{tc: 0.5}}}}\n\
             {PRIMITIVE}"
        ));
        assert!(codes(&diagnostics).contains(&"V0304"));
    }

    #[test]
    fn v0305_unknown_parameter_override() {
        let diagnostics = validate(&format!(
            "file_info: {{top_module: t}}\n\
             modules:\n\
             \x20 t:\n\
             \x20   instances:\n\
             \x20     R1: {{model: r, mappings: {{a: x, b: y}}, parameters: {{Q: 7}}}}\n\
             {PRIMITIVE}"
        ));
        assert!(codes(&diagnostics).contains(&"V0305"));
    }

    #[test]
    fn v0401_undeclared_net_is_warning() {
        let diagnostics = validate(&format!(
            "file_info: {{top_module: t}}\n\
             modules:\n\
             \x20 t:\n\
             \x20   ports: {{in: {{dir: in}}}}\n\
             \x20   internal_nets: [mid]\n\
             \x20   instances:\n\
             \x20     R1: {{model: r, mappings: {{a: in, b: mystery}}}}\n\
             {PRIMITIVE}"
        ));
        let diag = diagnostics
            .iter()
            .find(|d| d.code == "V0401")
            .expect("V0401 present");
        assert_eq!(diag.severity, Severity::Warning);
        assert!(diag.message.contains("'mystery'"));
        assert!(!diag.message.contains("'in'"));
        assert!(!diag.message.contains("'mid'"));
    }

    #[test]
    fn v0601_unused_module_excludes_top() {
        let diagnostics = validate(&format!(
            "file_info: {{top_module: t}}\n\
             modules:\n\
             \x20 t:\n\
             \x20   instances: {{}}\n\
             \x20 orphan:\n\
             \x20   instances: {{}}\n\
             {PRIMITIVE}"
        ));
        let diag = diagnostics
            .iter()
            .find(|d| d.code == "V0601")
            .expect("V0601 present");
        assert_eq!(diag.severity, Severity::Warning);
        assert!(diag.message.contains("'orphan'"));
        assert!(diag.message.contains("'r'"));
        assert!(!diag.message.contains("'t'"));
    }

    #[test]
    fn pattern_names_are_not_second_guessed() {
        let diagnostics = validate(
            "file_info: {top_module: t}\n\
             modules:\n\
             \x20 child:\n\
             \x20   ports: {\"d[0:1]\": {dir: in}}\n\
             \x20   instances: {}\n\
             \x20 t:\n\
             \x20   instances:\n\
             \x20     U1: {model: child, mappings: {d0: n1}}\n",
        );
        assert!(!codes(&diagnostics).contains(&"V0302"));
    }
}
