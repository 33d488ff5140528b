// ==============================================================================
// Pattern Expansion
// ==============================================================================
//
// Expansion turns a parsed expression into its full atom list, eagerly and in
// a deterministic order: segments in splice order, and within a segment the
// cartesian product of parts with the leftmost group varying slowest. Each
// atom remembers the per-atom pattern token (enum alternatives re-wrapped as
// `<x>`, range values as `[n:n]`) and the group values it was built from, so
// downstream IRs can report pattern origins.

use super::parse::{PatternExpr, PatternPart};
use super::{MAX_EXPANSION_SIZE, PATTERN_DUPLICATE_ATOM, PATTERN_TOO_LARGE};
use super::parse::{EndpointExpr, PatternError};

/// One literal produced by expanding a pattern expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// Fully concatenated literal name.
    pub literal: String,
    /// Pattern-shaped token for this atom, e.g. `M_<P>` or `d[2:2]`.
    pub token: String,
    /// Group values chosen for this atom, in group order.
    pub parts: Vec<String>,
    /// Index of the splice segment the atom came from.
    pub segment: usize,
}

fn range_values(start: i64, end: i64) -> Vec<i64> {
    if start <= end {
        (start..=end).collect()
    } else {
        (end..=start).rev().collect()
    }
}

/// Duplicate literals in first-repeated order.
fn find_duplicates<'a>(literals: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut duplicates: Vec<String> = Vec::new();
    for literal in literals {
        if !seen.insert(literal) && !duplicates.iter().any(|d| d == literal) {
            duplicates.push(literal.to_string());
        }
    }
    duplicates
}

fn too_large(expr_raw: &str, span: Option<&crate::diagnostics::SourceSpan>) -> PatternError {
    PatternError {
        code: PATTERN_TOO_LARGE,
        message: format!("Pattern token '{expr_raw}' expands beyond {MAX_EXPANSION_SIZE} atoms."),
        span: span.cloned(),
    }
}

fn duplicate_error(
    duplicates: &[String],
    expr_raw: &str,
    span: Option<&crate::diagnostics::SourceSpan>,
) -> PatternError {
    let preview: Vec<&str> = duplicates.iter().take(5).map(String::as_str).collect();
    let extra = if duplicates.len() > 5 {
        format!(" (+{} more)", duplicates.len() - 5)
    } else {
        String::new()
    };
    PatternError {
        code: PATTERN_DUPLICATE_ATOM,
        message: format!(
            "Pattern token '{expr_raw}' expands to duplicate atoms: {}{extra}.",
            preview.join(", ")
        ),
        span: span.cloned(),
    }
}

/// Expand one splice-free segment into `(literal, token, parts)` triples.
fn expand_segment(
    parts: &[PatternPart],
    expr_raw: &str,
    span: Option<&crate::diagnostics::SourceSpan>,
    max_atoms: usize,
) -> Result<Vec<(String, String, Vec<String>)>, PatternError> {
    let mut current: Vec<(String, String, Vec<String>)> =
        vec![(String::new(), String::new(), Vec::new())];

    for part in parts {
        match part {
            PatternPart::Literal(text) => {
                for (literal, token, _) in &mut current {
                    literal.push_str(text);
                    token.push_str(text);
                }
            }
            PatternPart::Enum(alts) => {
                if current.len() * alts.len() > max_atoms {
                    return Err(too_large(expr_raw, span));
                }
                let expanded: Vec<(String, String, Vec<String>)> = current
                    .iter()
                    .flat_map(|(literal, token, chosen)| {
                        alts.iter().map(move |alt| {
                            let mut parts = chosen.clone();
                            parts.push(alt.clone());
                            (
                                format!("{literal}{alt}"),
                                format!("{token}<{alt}>"),
                                parts,
                            )
                        })
                    })
                    .collect();
                current = expanded;
            }
            PatternPart::Range(start, end) => {
                let values = range_values(*start, *end);
                if current.len() * values.len() > max_atoms {
                    return Err(too_large(expr_raw, span));
                }
                let expanded: Vec<(String, String, Vec<String>)> = current
                    .iter()
                    .flat_map(|(literal, token, chosen)| {
                        values.iter().map(move |value| {
                            let mut parts = chosen.clone();
                            parts.push(value.to_string());
                            (
                                format!("{literal}{value}"),
                                format!("{token}[{value}:{value}]"),
                                parts,
                            )
                        })
                    })
                    .collect();
                current = expanded;
            }
        }
    }

    Ok(current)
}

/// Expand a pattern expression into its atom list.
///
/// Fails with `PASS-104` when two atoms share a literal and `PASS-105` when
/// the expansion exceeds `max_atoms`. The returned order is the canonical
/// expansion order; its length always equals [`PatternExpr::cardinality`].
pub fn expand_pattern(expr: &PatternExpr, max_atoms: usize) -> Result<Vec<Atom>, PatternError> {
    let mut atoms: Vec<Atom> = Vec::new();
    for (segment_index, segment) in expr.segments.iter().enumerate() {
        let expanded = expand_segment(&segment.parts, &expr.raw, expr.span.as_ref(), max_atoms)?;
        if atoms.len() + expanded.len() > max_atoms {
            return Err(too_large(&expr.raw, expr.span.as_ref()));
        }
        atoms.extend(
            expanded
                .into_iter()
                .map(|(literal, token, parts)| Atom {
                    literal,
                    token,
                    parts,
                    segment: segment_index,
                }),
        );
    }

    let duplicates = find_duplicates(atoms.iter().map(|a| a.literal.as_str()));
    if !duplicates.is_empty() {
        return Err(duplicate_error(&duplicates, &expr.raw, expr.span.as_ref()));
    }
    Ok(atoms)
}

/// Expand to bare literal strings.
pub fn expand_literals(expr: &PatternExpr, max_atoms: usize) -> Result<Vec<String>, PatternError> {
    Ok(expand_pattern(expr, max_atoms)?
        .into_iter()
        .map(|a| a.literal)
        .collect())
}

/// Expand an endpoint into every `(instance, pin)` atom pair, instance
/// varying slowest. The cap applies to the product size.
pub fn expand_endpoint(
    expr: &EndpointExpr,
    max_atoms: usize,
) -> Result<Vec<(Atom, Atom)>, PatternError> {
    let inst_atoms = expand_pattern(&expr.inst, max_atoms)?;
    let pin_atoms = expand_pattern(&expr.pin, max_atoms)?;
    if inst_atoms.len() * pin_atoms.len() > max_atoms {
        return Err(too_large(&expr.raw, expr.span.as_ref()));
    }
    let mut endpoints = Vec::with_capacity(inst_atoms.len() * pin_atoms.len());
    for inst in &inst_atoms {
        for pin in &pin_atoms {
            endpoints.push((inst.clone(), pin.clone()));
        }
    }
    Ok(endpoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::parse::{parse_endpoint_expr, parse_pattern_expr};
    use crate::patterns::{MAX_EXPANSION_SIZE, PATTERN_DUPLICATE_ATOM, PATTERN_TOO_LARGE};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn expr(raw: &str) -> crate::patterns::PatternExpr {
        parse_pattern_expr(raw, &IndexMap::new(), None)
            .0
            .expect("test expression should parse")
    }

    fn literals(raw: &str) -> Vec<String> {
        expand_literals(&expr(raw), MAX_EXPANSION_SIZE).expect("expansion should succeed")
    }

    // =========================================================================
    // Expansion order
    // =========================================================================

    #[test]
    fn enum_expands_in_declaration_order() {
        assert_eq!(literals("<a|b|c>"), vec!["a", "b", "c"]);
    }

    #[test]
    fn single_alternative_enum_is_one_atom() {
        assert_eq!(literals("<a>"), vec!["a"]);
    }

    #[test]
    fn ascending_and_descending_ranges() {
        assert_eq!(literals("[1:3]"), vec!["1", "2", "3"]);
        assert_eq!(literals("[3:1]"), vec!["3", "2", "1"]);
        assert_eq!(literals("[3:3]"), vec!["3"]);
    }

    #[test]
    fn negative_range_bounds() {
        assert_eq!(literals("n[-1:1]"), vec!["n-1", "n0", "n1"]);
    }

    #[test]
    fn cartesian_product_leftmost_slowest() {
        assert_eq!(
            literals("x<a|b>[0:1]"),
            vec!["xa0", "xa1", "xb0", "xb1"]
        );
    }

    #[test]
    fn splice_concatenates_segment_expansions() {
        assert_eq!(literals("clk;d[0:1]"), vec!["clk", "d0", "d1"]);
    }

    #[test]
    fn cardinality_matches_expansion_length() {
        for raw in ["a", "<a|b>", "[0:5]", "x<p|n>[1:2];y", "m<a|b><c|d>"] {
            let e = expr(raw);
            let atoms = expand_pattern(&e, MAX_EXPANSION_SIZE).expect("expands");
            assert_eq!(e.cardinality(), atoms.len(), "cardinality mismatch for {raw:?}");
        }
    }

    // =========================================================================
    // Atom metadata
    // =========================================================================

    #[test]
    fn atoms_carry_token_and_parts() {
        let atoms = expand_pattern(&expr("M_<P|N>"), MAX_EXPANSION_SIZE).expect("expands");
        assert_eq!(atoms[0].literal, "M_P");
        assert_eq!(atoms[0].token, "M_<P>");
        assert_eq!(atoms[0].parts, vec!["P".to_string()]);
        assert_eq!(atoms[1].literal, "M_N");
        assert_eq!(atoms[1].token, "M_<N>");
    }

    #[test]
    fn range_atoms_use_closed_range_tokens() {
        let atoms = expand_pattern(&expr("d[0:1]"), MAX_EXPANSION_SIZE).expect("expands");
        assert_eq!(atoms[0].token, "d[0:0]");
        assert_eq!(atoms[1].token, "d[1:1]");
    }

    #[test]
    fn segment_index_recorded() {
        let atoms = expand_pattern(&expr("a;b"), MAX_EXPANSION_SIZE).expect("expands");
        assert_eq!(atoms[0].segment, 0);
        assert_eq!(atoms[1].segment, 1);
    }

    // =========================================================================
    // Failure modes
    // =========================================================================

    #[test]
    fn duplicate_atoms_rejected() {
        let err = expand_pattern(&expr("<a|a>"), MAX_EXPANSION_SIZE).expect_err("duplicates");
        assert_eq!(err.code, PATTERN_DUPLICATE_ATOM);
        assert!(err.message.contains("'<a|a>'"));
        assert!(err.message.contains("a"));
    }

    #[test]
    fn duplicates_across_segments_rejected() {
        let err = expand_pattern(&expr("a;a"), MAX_EXPANSION_SIZE).expect_err("duplicates");
        assert_eq!(err.code, PATTERN_DUPLICATE_ATOM);
    }

    #[test]
    fn expansion_at_cap_succeeds() {
        let atoms = expand_pattern(&expr("n[1:100]"), 100).expect("exactly at cap");
        assert_eq!(atoms.len(), 100);
    }

    #[test]
    fn expansion_over_cap_fails() {
        let err = expand_pattern(&expr("n[0:100]"), 100).expect_err("one over cap");
        assert_eq!(err.code, PATTERN_TOO_LARGE);
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    #[test]
    fn endpoint_cross_product() {
        let (ep, _) = parse_endpoint_expr("U<1|2>.d[0:1]", &IndexMap::new(), None);
        let pairs = expand_endpoint(&ep.expect("parses"), MAX_EXPANSION_SIZE).expect("expands");
        let literal_pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(inst, pin)| (inst.literal, pin.literal))
            .collect();
        assert_eq!(
            literal_pairs,
            vec![
                ("U1".to_string(), "d0".to_string()),
                ("U1".to_string(), "d1".to_string()),
                ("U2".to_string(), "d0".to_string()),
                ("U2".to_string(), "d1".to_string()),
            ]
        );
    }

    #[test]
    fn endpoint_product_respects_cap() {
        let (ep, _) = parse_endpoint_expr("U[0:9].d[0:9]", &IndexMap::new(), None);
        let err = expand_endpoint(&ep.expect("parses"), 99).expect_err("over cap");
        assert_eq!(err.code, PATTERN_TOO_LARGE);
    }
}
