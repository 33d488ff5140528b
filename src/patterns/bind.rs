// ==============================================================================
// Binding Parallel Pattern Expressions
// ==============================================================================
//
// A net name and an endpoint expression expand independently, but their group
// positions are correlated: `in_<p|n>` on instance `M_<P|N>` means `in_p`
// connects `M_P` and `in_n` connects `M_N`. The binding plan captures that
// correlation once so atomization can look up, for endpoint atom `j`, the
// net atom index it lands on.
//
// Compatibility rule: after stripping trailing size-1 group positions, the
// two group-size sequences are aligned (the shorter padded with size-1
// positions); at every position the sizes must be equal or one side must be
// size 1, in which case it broadcasts. Spliced expressions have no positional
// structure, so they fall back to whole-cardinality matching.

use super::parse::{EndpointExpr, PatternExpr};

/// How endpoint atom indices map onto net atom indices.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PlanKind {
    /// Aligned group radices; decompose the endpoint index and recompose it
    /// over the net radices, zeroing broadcast positions.
    Positional {
        net_sizes: Vec<usize>,
        endpoint_sizes: Vec<usize>,
    },
    /// Equal cardinalities with no positional structure (splices involved).
    Identity,
    /// The net has a single atom; every endpoint atom lands on it.
    ToFirst,
}

/// Lookup table from endpoint atom indices to net atom indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingPlan {
    kind: PlanKind,
}

impl BindingPlan {
    /// Net atom index that endpoint atom `endpoint_atom` binds to. The
    /// `segment` argument selects the net splice segment; name expressions
    /// used for nets are single-segment, so callers pass 0.
    pub fn map_index(&self, segment: usize, endpoint_atom: usize) -> usize {
        debug_assert_eq!(segment, 0, "net name expressions are single-segment");
        match &self.kind {
            PlanKind::Identity => endpoint_atom,
            PlanKind::ToFirst => 0,
            PlanKind::Positional {
                net_sizes,
                endpoint_sizes,
            } => {
                // Decompose into mixed-radix digits, last position fastest.
                let mut digits = vec![0usize; endpoint_sizes.len()];
                let mut rest = endpoint_atom;
                for (slot, size) in digits.iter_mut().zip(endpoint_sizes).rev() {
                    *slot = rest % size;
                    rest /= size;
                }
                // Recompose over the net radices; broadcast positions
                // contribute digit 0.
                let mut index = 0usize;
                for (digit, net_size) in digits.iter().zip(net_sizes) {
                    let digit = if *net_size == 1 { 0 } else { *digit };
                    index = index * net_size + digit;
                }
                index
            }
        }
    }
}

/// Incompatibility between two parallel expressions. The caller owns turning
/// this into a diagnostic with both spans labelled.
#[derive(Debug, Clone, PartialEq)]
pub struct BindError {
    pub message: String,
}

fn strip_trailing_ones(sizes: &[usize]) -> &[usize] {
    let end = sizes
        .iter()
        .rposition(|&s| s != 1)
        .map_or(0, |pos| pos + 1);
    &sizes[..end]
}

fn mismatch(net: &PatternExpr, endpoint: &EndpointExpr) -> BindError {
    BindError {
        message: format!(
            "Net '{}' expands to {} atoms but endpoint '{}' expands to {}",
            net.raw,
            net.cardinality(),
            endpoint.raw,
            endpoint.cardinality()
        ),
    }
}

/// Build the plan that correlates a net name expression with one of its
/// endpoint expressions.
pub fn bind_patterns(
    net: &PatternExpr,
    endpoint: &EndpointExpr,
) -> Result<BindingPlan, BindError> {
    let positional = net.segments.len() == 1 && endpoint.is_single_segment();
    if !positional {
        // Splices carry no positional structure; match whole cardinalities.
        let net_card = net.cardinality();
        let endpoint_card = endpoint.cardinality();
        if net_card == endpoint_card {
            return Ok(BindingPlan {
                kind: PlanKind::Identity,
            });
        }
        if net_card == 1 {
            return Ok(BindingPlan {
                kind: PlanKind::ToFirst,
            });
        }
        return Err(mismatch(net, endpoint));
    }

    let net_groups = net.group_sizes();
    let endpoint_groups = endpoint.group_sizes();
    let net_stripped = strip_trailing_ones(&net_groups);
    let endpoint_stripped = strip_trailing_ones(&endpoint_groups);

    let len = net_stripped.len().max(endpoint_stripped.len());
    let mut net_sizes = net_stripped.to_vec();
    net_sizes.resize(len, 1);
    let mut endpoint_sizes = endpoint_stripped.to_vec();
    endpoint_sizes.resize(len, 1);

    for (&n, &e) in net_sizes.iter().zip(&endpoint_sizes) {
        if n != e && n != 1 && e != 1 {
            return Err(mismatch(net, endpoint));
        }
    }

    Ok(BindingPlan {
        kind: PlanKind::Positional {
            net_sizes,
            endpoint_sizes,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::parse::{parse_endpoint_expr, parse_pattern_expr};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn net(raw: &str) -> PatternExpr {
        parse_pattern_expr(raw, &IndexMap::new(), None)
            .0
            .expect("net expression should parse")
    }

    fn endpoint(raw: &str) -> EndpointExpr {
        parse_endpoint_expr(raw, &IndexMap::new(), None)
            .0
            .expect("endpoint expression should parse")
    }

    fn mapping(net_raw: &str, endpoint_raw: &str) -> Vec<usize> {
        let n = net(net_raw);
        let e = endpoint(endpoint_raw);
        let plan = bind_patterns(&n, &e).expect("expressions should bind");
        (0..e.cardinality()).map(|j| plan.map_index(0, j)).collect()
    }

    #[test]
    fn matched_groups_bind_one_to_one() {
        // in_<p|n> against M_<P|N>.G: endpoint atom j lands on net atom j.
        assert_eq!(mapping("in_<p|n>", "M_<P|N>.G"), vec![0, 1]);
    }

    #[test]
    fn singleton_net_broadcasts() {
        // vss receives every endpoint atom.
        assert_eq!(mapping("vss", "M_<P|N>.S"), vec![0, 0]);
    }

    #[test]
    fn singleton_endpoint_lands_on_first_net_atom() {
        assert_eq!(mapping("bus<a|b|c>", "X.p"), vec![0]);
    }

    #[test]
    fn extra_endpoint_group_broadcasts_into_net() {
        // Net has one group of 2; endpoint has 2x2. Pin position broadcasts.
        assert_eq!(mapping("n<a|b>", "I<1|2>.p<x|y>"), vec![0, 0, 1, 1]);
    }

    #[test]
    fn aligned_multi_group_binding_is_identity() {
        assert_eq!(
            mapping("n<a|b>[0:2]", "I<1|2>.p[0:2]"),
            vec![0, 1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn interior_broadcast_position() {
        // Net [1,3] vs endpoint [2,3]: first position broadcasts.
        assert_eq!(mapping("n<z>[0:2]", "I<1|2>.p[0:2]"), vec![0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn cardinality_mismatch_is_an_error() {
        let err = bind_patterns(&net("a[0:2]"), &endpoint("X.p[0:1]")).expect_err("3 vs 2");
        assert!(err.message.contains("3 atoms"));
        assert!(err.message.contains("expands to 2"));
    }

    #[test]
    fn structural_mismatch_is_an_error() {
        // Equal cardinality but incompatible group shapes: [2,2] vs [4].
        assert!(bind_patterns(&net("n<a|b><c|d>"), &endpoint("X.p[0:3]")).is_err());
    }

    #[test]
    fn spliced_expressions_fall_back_to_cardinality() {
        let plan = bind_patterns(&net("a;b"), &endpoint("X.p[0:1]")).expect("2 vs 2 binds");
        assert_eq!(plan.map_index(0, 0), 0);
        assert_eq!(plan.map_index(0, 1), 1);

        assert!(bind_patterns(&net("a;b"), &endpoint("X.p[0:2]")).is_err());
    }

    #[test]
    fn produced_indices_stay_in_range() {
        for (n_raw, e_raw) in [
            ("in_<p|n>", "M_<P|N>.G"),
            ("vss", "M_<P|N>.S"),
            ("n<a|b>", "I<1|2>.p<x|y>"),
            ("n<z>[0:2]", "I<1|2>.p[0:2]"),
        ] {
            let n = net(n_raw);
            let e = endpoint(e_raw);
            let plan = bind_patterns(&n, &e).expect("binds");
            let net_count = n.cardinality();
            for j in 0..e.cardinality() {
                assert!(
                    plan.map_index(0, j) < net_count,
                    "index out of range for {n_raw:?} / {e_raw:?}"
                );
            }
        }
    }
}
