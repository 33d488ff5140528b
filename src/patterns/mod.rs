// ==============================================================================
// Pattern Algebra: Parse, Expand, and Bind Name Expressions
// ==============================================================================
//
// ASDL names may contain enumerations `<a|b|c>`, numeric ranges `[m:n]`,
// splices `;`, and named references `<@alias>`. This module owns the whole
// lifecycle of such expressions:
//
//   - `parse`  — raw string (plus named-pattern definitions) to `PatternExpr`
//   - `expand` — `PatternExpr` to the eagerly materialized atom list
//   - `bind`   — correlate two parallel expressions position-by-position so
//     downstream stages can ask "which net atom receives endpoint atom j?"
//
// Expansion is eager and bounded by `MAX_EXPANSION_SIZE`; downstream stages
// need random access into the atom list, so no lazy iteration is exposed.

pub(crate) mod bind;
pub(crate) mod expand;
pub(crate) mod parse;

pub use bind::{BindError, BindingPlan, bind_patterns};
pub use expand::{Atom, expand_endpoint, expand_literals, expand_pattern};
pub use parse::{
    EndpointExpr, NamedPattern, PatternError, PatternExpr, PatternPart, PatternSegment,
    parse_endpoint_expr, parse_pattern_expr, validate_named_pattern,
};

/// Hard cap on the number of atoms a single expression may expand to.
pub const MAX_EXPANSION_SIZE: usize = 10_000;

// Diagnostic codes owned by the pattern engine. The `PASS` domain covers
// expansion failures; the two `IR` codes cover named-pattern definitions,
// which are validated at parse time.
pub const PATTERN_INVALID_RANGE: &str = "PASS-101";
pub const PATTERN_EMPTY_ENUM: &str = "PASS-102";
pub const PATTERN_EMPTY_SPLICE: &str = "PASS-103";
pub const PATTERN_DUPLICATE_ATOM: &str = "PASS-104";
pub const PATTERN_TOO_LARGE: &str = "PASS-105";
pub const PATTERN_UNEXPANDED: &str = "PASS-106";
pub const INVALID_PATTERN_DEF: &str = "IR-012";
pub const UNDEFINED_PATTERN: &str = "IR-013";
