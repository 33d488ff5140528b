// ==============================================================================
// Pattern Expression Parsing
// ==============================================================================
//
// Grammar (after `<@alias>` substitution):
//
//   expr     := segment (";" segment)*
//   segment  := part+
//   part     := literal | "<" alt ("|" alt)* ">" | "[" int ":" int "]"
//
// `;` and group delimiters are reserved everywhere: a stray `>`/`]`/`|`, a
// nested group, or whitespace inside a segment all reject the expression with
// a single diagnostic-ready `PatternError`.

use crate::diagnostics::SourceSpan;

use super::{
    INVALID_PATTERN_DEF, PATTERN_EMPTY_ENUM, PATTERN_EMPTY_SPLICE, PATTERN_INVALID_RANGE,
    PATTERN_UNEXPANDED, UNDEFINED_PATTERN,
};

use indexmap::IndexMap;

/// One component of a splice segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternPart {
    Literal(String),
    /// `<a|b|c>` — alternatives in declaration order.
    Enum(Vec<String>),
    /// `[m:n]` — inclusive, counting up when `m <= n`, otherwise down.
    Range(i64, i64),
}

impl PatternPart {
    /// Number of atoms this part contributes to the segment product.
    pub fn size(&self) -> usize {
        match self {
            PatternPart::Literal(_) => 1,
            PatternPart::Enum(alts) => alts.len(),
            PatternPart::Range(m, n) => (m.abs_diff(*n) as usize) + 1,
        }
    }

    fn is_group(&self) -> bool {
        !matches!(self, PatternPart::Literal(_))
    }
}

/// A splice-free run of parts. Its cardinality is the product of part sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSegment {
    pub parts: Vec<PatternPart>,
}

impl PatternSegment {
    pub fn cardinality(&self) -> usize {
        self.parts.iter().map(PatternPart::size).product()
    }

    /// Sizes of the group parts (enums and ranges) in order; literals are
    /// transparent for binding purposes.
    pub fn group_sizes(&self) -> Vec<usize> {
        self.parts
            .iter()
            .filter(|p| p.is_group())
            .map(PatternPart::size)
            .collect()
    }
}

/// A parsed name expression: one or more splice segments, plus the raw text
/// and span it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternExpr {
    pub raw: String,
    pub segments: Vec<PatternSegment>,
    pub span: Option<SourceSpan>,
}

impl PatternExpr {
    /// Total atom count: the sum of segment cardinalities.
    pub fn cardinality(&self) -> usize {
        self.segments.iter().map(PatternSegment::cardinality).sum()
    }

    /// True when the expression contains any enum or range group.
    pub fn has_groups(&self) -> bool {
        self.segments
            .iter()
            .any(|s| s.parts.iter().any(PatternPart::is_group))
    }

    /// Group sizes of the sole segment. Only meaningful for single-segment
    /// expressions, which is all positional binding supports.
    pub fn group_sizes(&self) -> Vec<usize> {
        match self.segments.as_slice() {
            [single] => single.group_sizes(),
            _ => Vec::new(),
        }
    }

    /// Trivial expression wrapping a literal name. Used when re-atomizing
    /// already-literal artifacts.
    pub fn literal(name: &str, span: Option<SourceSpan>) -> Self {
        PatternExpr {
            raw: name.to_string(),
            segments: vec![PatternSegment {
                parts: vec![PatternPart::Literal(name.to_string())],
            }],
            span,
        }
    }
}

/// A parsed `instance.pin` endpoint: both sides are full pattern expressions
/// and expand as a cross product (instance outer, pin inner).
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointExpr {
    pub raw: String,
    pub inst: PatternExpr,
    pub pin: PatternExpr,
    pub span: Option<SourceSpan>,
}

impl EndpointExpr {
    pub fn cardinality(&self) -> usize {
        self.inst.cardinality() * self.pin.cardinality()
    }

    /// Concatenated group sizes: instance groups first, then pin groups,
    /// matching the cross-product expansion order.
    pub fn group_sizes(&self) -> Vec<usize> {
        let mut sizes = self.inst.group_sizes();
        sizes.extend(self.pin.group_sizes());
        sizes
    }

    pub fn is_single_segment(&self) -> bool {
        self.inst.segments.len() == 1 && self.pin.segments.len() == 1
    }
}

/// A reusable pattern fragment declared under a module's `patterns:` section
/// and referenced as `<@alias>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPattern {
    pub expr: String,
}

/// Parse failure, ready to be wrapped into a `Diagnostic` by the caller
/// (which supplies stage context and a fallback span).
#[derive(Debug, Clone, PartialEq)]
pub struct PatternError {
    pub code: &'static str,
    pub message: String,
    pub span: Option<SourceSpan>,
}

impl PatternError {
    fn new(code: &'static str, message: String, span: Option<&SourceSpan>) -> Self {
        PatternError {
            code,
            message,
            span: span.cloned(),
        }
    }
}

// ==============================================================================
// Named-Pattern Substitution
// ==============================================================================

/// Validate a named-pattern definition: it must be a single group token
/// (`<...>` or `[...]`) and must not reference other named patterns.
pub fn validate_named_pattern(name: &str, def: &str) -> Result<(), PatternError> {
    let invalid = |detail: &str| {
        Err(PatternError::new(
            INVALID_PATTERN_DEF,
            format!("Named pattern '{name}' {detail}."),
            None,
        ))
    };
    if def.contains("<@") {
        return invalid("must not reference other named patterns");
    }
    let bytes = def.as_bytes();
    let well_delimited = (def.starts_with('<') && def.ends_with('>'))
        || (def.starts_with('[') && def.ends_with(']'));
    if bytes.len() < 2 || !well_delimited {
        return invalid("must be a single '<...>' or '[...]' group token");
    }
    // The body may not contain further delimiters; that would make the
    // definition more than one token (or a nested group).
    let body = &def[1..def.len() - 1];
    if body.chars().any(|c| "<>[];".contains(c)) {
        return invalid("must be a single '<...>' or '[...]' group token");
    }
    Ok(())
}

/// Replace every `<@alias>` occurrence with its definition.
fn substitute_named(
    raw: &str,
    named: &IndexMap<String, NamedPattern>,
    span: Option<&SourceSpan>,
) -> Result<String, PatternError> {
    if !raw.contains("<@") {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find("<@") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find('>') else {
            return Err(PatternError::new(
                PATTERN_UNEXPANDED,
                format!("Unterminated named pattern reference in '{raw}'."),
                span,
            ));
        };
        let alias = &after[..close];
        let Some(def) = named.get(alias) else {
            return Err(PatternError::new(
                UNDEFINED_PATTERN,
                format!("Undefined named pattern '<@{alias}>' in '{raw}'."),
                span,
            ));
        };
        validate_named_pattern(alias, &def.expr)?;
        out.push_str(&def.expr);
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

// ==============================================================================
// Tokenization
// ==============================================================================

/// Split a token into splice segments, validating delimiter usage. `;` is
/// reserved inside groups; a stray closer outside a group rejects the token.
fn split_splice_segments(
    token: &str,
    span: Option<&SourceSpan>,
) -> Result<Vec<String>, PatternError> {
    let mut segments = Vec::new();
    let mut buffer = String::new();
    let mut state: Option<char> = None;

    for c in token.chars() {
        match state {
            None => match c {
                ';' => {
                    segments.push(std::mem::take(&mut buffer));
                    continue;
                }
                '<' => state = Some('>'),
                '[' => state = Some(']'),
                ']' | '>' => {
                    return Err(PatternError::new(
                        PATTERN_UNEXPANDED,
                        format!("Unexpected '{c}' in pattern token '{token}'."),
                        span,
                    ));
                }
                _ => {}
            },
            Some(closer) => match c {
                ';' => {
                    return Err(PatternError::new(
                        PATTERN_UNEXPANDED,
                        format!(
                            "Splice delimiter ';' is not allowed inside pattern groups in '{token}'."
                        ),
                        span,
                    ));
                }
                '<' | '[' => {
                    return Err(PatternError::new(
                        PATTERN_UNEXPANDED,
                        format!("Nested pattern delimiters are not allowed in '{token}'."),
                        span,
                    ));
                }
                c if c == closer => state = None,
                _ => {}
            },
        }
        buffer.push(c);
    }

    if state.is_some() {
        return Err(PatternError::new(
            PATTERN_UNEXPANDED,
            format!("Unterminated pattern delimiter in '{token}'."),
            span,
        ));
    }

    segments.push(buffer);
    Ok(segments)
}

fn validate_enum_content(
    content: &str,
    token: &str,
    span: Option<&SourceSpan>,
) -> Result<(), PatternError> {
    if content.is_empty() {
        return Err(PatternError::new(
            PATTERN_EMPTY_ENUM,
            format!("Empty enumeration in pattern token '{token}'."),
            span,
        ));
    }
    if content.chars().any(char::is_whitespace) {
        return Err(PatternError::new(
            PATTERN_UNEXPANDED,
            format!("Whitespace is not allowed around '|' in '{token}'."),
            span,
        ));
    }
    if content.contains(',') {
        return Err(PatternError::new(
            PATTERN_UNEXPANDED,
            format!("Enumeration alternatives must use '|' in '{token}'."),
            span,
        ));
    }
    Ok(())
}

fn parse_range_content(
    content: &str,
    token: &str,
    span: Option<&SourceSpan>,
) -> Result<(i64, i64), PatternError> {
    let invalid = || {
        Err(PatternError::new(
            PATTERN_INVALID_RANGE,
            format!("Invalid numeric range in pattern token '{token}'."),
            span,
        ))
    };
    if content.chars().any(char::is_whitespace) || content.contains('|') {
        return invalid();
    }
    let Some((start_text, end_text)) = content.split_once(':') else {
        return invalid();
    };
    if start_text.is_empty() || end_text.is_empty() || end_text.contains(':') {
        return invalid();
    }
    match (start_text.parse::<i64>(), end_text.parse::<i64>()) {
        (Ok(start), Ok(end)) => Ok((start, end)),
        _ => invalid(),
    }
}

/// Parse a splice-free segment into its part sequence.
fn parse_segment(
    segment: &str,
    token: &str,
    span: Option<&SourceSpan>,
) -> Result<PatternSegment, PatternError> {
    if segment.chars().any(char::is_whitespace) {
        return Err(PatternError::new(
            PATTERN_UNEXPANDED,
            format!("Whitespace is not allowed in pattern token '{token}'."),
            span,
        ));
    }

    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut chars = segment.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        match c {
            '<' => {
                if !literal.is_empty() {
                    parts.push(PatternPart::Literal(std::mem::take(&mut literal)));
                }
                let body_start = index + 1;
                let Some(close) = segment[body_start..].find('>') else {
                    return Err(PatternError::new(
                        PATTERN_UNEXPANDED,
                        format!("Unterminated enumeration in '{token}'."),
                        span,
                    ));
                };
                let content = &segment[body_start..body_start + close];
                validate_enum_content(content, token, span)?;
                let alts: Vec<String> = content.split('|').map(str::to_string).collect();
                if alts.iter().any(String::is_empty) {
                    return Err(PatternError::new(
                        PATTERN_EMPTY_ENUM,
                        format!("Empty enumeration in pattern token '{token}'."),
                        span,
                    ));
                }
                parts.push(PatternPart::Enum(alts));
                while chars.peek().is_some_and(|(i, _)| *i <= body_start + close) {
                    chars.next();
                }
            }
            '[' => {
                if !literal.is_empty() {
                    parts.push(PatternPart::Literal(std::mem::take(&mut literal)));
                }
                let body_start = index + 1;
                let Some(close) = segment[body_start..].find(']') else {
                    return Err(PatternError::new(
                        PATTERN_UNEXPANDED,
                        format!("Unterminated numeric range in '{token}'."),
                        span,
                    ));
                };
                let content = &segment[body_start..body_start + close];
                let (start, end) = parse_range_content(content, token, span)?;
                parts.push(PatternPart::Range(start, end));
                while chars.peek().is_some_and(|(i, _)| *i <= body_start + close) {
                    chars.next();
                }
            }
            '|' | ']' | '>' => {
                return Err(PatternError::new(
                    PATTERN_UNEXPANDED,
                    format!("Unexpected '{c}' in pattern token '{token}'."),
                    span,
                ));
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        parts.push(PatternPart::Literal(literal));
    }
    Ok(PatternSegment { parts })
}

// ==============================================================================
// Entry Points
// ==============================================================================

/// Parse a raw pattern expression. `named` supplies `<@alias>` definitions;
/// pass an empty map when none are in scope.
///
/// Returns `(None, errors)` on failure — the expression halts at its first
/// error, matching the one-diagnostic-per-expression policy.
pub fn parse_pattern_expr(
    raw: &str,
    named: &IndexMap<String, NamedPattern>,
    span: Option<SourceSpan>,
) -> (Option<PatternExpr>, Vec<PatternError>) {
    if raw.is_empty() {
        return (
            None,
            vec![PatternError::new(
                PATTERN_UNEXPANDED,
                "Pattern token is empty.".to_string(),
                span.as_ref(),
            )],
        );
    }

    let substituted = match substitute_named(raw, named, span.as_ref()) {
        Ok(s) => s,
        Err(e) => return (None, vec![e]),
    };

    let segments = match split_splice_segments(&substituted, span.as_ref()) {
        Ok(s) => s,
        Err(e) => return (None, vec![e]),
    };
    if segments.iter().any(String::is_empty) {
        return (
            None,
            vec![PatternError::new(
                PATTERN_EMPTY_SPLICE,
                format!("Empty splice segment in pattern token '{raw}'."),
                span.as_ref(),
            )],
        );
    }

    let mut parsed = Vec::with_capacity(segments.len());
    for segment in &segments {
        match parse_segment(segment, raw, span.as_ref()) {
            Ok(p) => parsed.push(p),
            Err(e) => return (None, vec![e]),
        }
    }

    (
        Some(PatternExpr {
            raw: raw.to_string(),
            segments: parsed,
            span,
        }),
        Vec::new(),
    )
}

/// Parse an `instance.pin` endpoint expression. The token must contain
/// exactly one `.`; both sides parse as full pattern expressions.
pub fn parse_endpoint_expr(
    raw: &str,
    named: &IndexMap<String, NamedPattern>,
    span: Option<SourceSpan>,
) -> (Option<EndpointExpr>, Vec<PatternError>) {
    let dots = raw.matches('.').count();
    if dots != 1 {
        return (
            None,
            vec![PatternError::new(
                PATTERN_UNEXPANDED,
                format!("Invalid endpoint token '{raw}'; expected inst.pin."),
                span.as_ref(),
            )],
        );
    }
    let (inst_raw, pin_raw) = raw.split_once('.').expect("dot presence checked above");
    let (inst, mut errors) = parse_pattern_expr(inst_raw, named, span.clone());
    let (pin, pin_errors) = parse_pattern_expr(pin_raw, named, span.clone());
    errors.extend(pin_errors);
    match (inst, pin) {
        (Some(inst), Some(pin)) if errors.is_empty() => (
            Some(EndpointExpr {
                raw: raw.to_string(),
                inst,
                pin,
                span,
            }),
            errors,
        ),
        _ => (None, errors),
    }
}
