// ==============================================================================
// Span-Preserving YAML Loader
// ==============================================================================
//
// The AST parser needs per-key line/column information, which serde-based
// YAML crates do not expose. This loader sits on yaml-rust2's event stream
// and composes a value tree where every node remembers the marker it started
// at. Two hardening rules the stock composer does not enforce:
//
//   - duplicate mapping keys are rejected (loaders that silently keep the
//     last value hide real authoring mistakes in large netlists);
//   - merge keys (`<<: *anchor`) are rejected outright.
//
// Plain anchors and aliases still resolve: the aliased node is cloned into
// place, marks and all.

use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// 1-based line/column position of a YAML node or error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub line: u32,
    pub col: u32,
}

fn to_mark(marker: Marker) -> Mark {
    // yaml-rust2 markers are 1-based lines and 0-based columns.
    Mark {
        line: marker.line() as u32,
        col: marker.col() as u32 + 1,
    }
}

/// A YAML value annotated with its source mark.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlNode {
    pub value: YamlValue,
    pub mark: Mark,
}

#[derive(Debug, Clone, PartialEq)]
pub enum YamlValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<YamlNode>),
    /// Key/value pairs in document order.
    Map(Vec<(YamlNode, YamlNode)>),
}

impl YamlNode {
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            YamlValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(YamlNode, YamlNode)]> {
        match &self.value {
            YamlValue::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[YamlNode]> {
        match &self.value {
            YamlValue::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, YamlValue::Null)
    }

    /// Look up a map entry by string key.
    pub fn get(&self, key: &str) -> Option<&YamlNode> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Mark of a map key, for diagnostics pointing at the key itself.
    pub fn key_mark(&self, key: &str) -> Option<Mark> {
        self.as_map()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(k, _)| k.mark)
    }

    /// Scalar rendered as a plain string, for keys and loose scalar fields.
    pub fn scalar_string(&self) -> Option<String> {
        match &self.value {
            YamlValue::Str(s) => Some(s.clone()),
            YamlValue::Int(i) => Some(i.to_string()),
            YamlValue::Float(f) => Some(f.to_string()),
            YamlValue::Bool(b) => Some(b.to_string()),
            YamlValue::Null => Some(String::new()),
            _ => None,
        }
    }

    /// Human name of the value's type, for wrong-type diagnostics.
    pub fn type_name(&self) -> &'static str {
        match &self.value {
            YamlValue::Null => "null",
            YamlValue::Bool(_) => "boolean",
            YamlValue::Int(_) => "integer",
            YamlValue::Float(_) => "float",
            YamlValue::Str(_) => "string",
            YamlValue::Seq(_) => "list",
            YamlValue::Map(_) => "mapping",
        }
    }
}

/// Problem found while loading: syntax errors from the scanner, duplicate
/// keys, merge keys, or a second document in the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadError {
    pub message: String,
    pub mark: Option<Mark>,
}

// ==============================================================================
// Event Composer
// ==============================================================================

enum Frame {
    Seq {
        items: Vec<YamlNode>,
        mark: Mark,
        anchor: usize,
    },
    Map {
        pairs: Vec<(YamlNode, YamlNode)>,
        pending_key: Option<YamlNode>,
        mark: Mark,
        anchor: usize,
    },
}

#[derive(Default)]
struct Composer {
    stack: Vec<Frame>,
    root: Option<YamlNode>,
    anchors: std::collections::HashMap<usize, YamlNode>,
    errors: Vec<LoadError>,
    seen_document: bool,
    extra_document_reported: bool,
}

/// Resolve a plain scalar per the YAML core schema subset ASDL needs.
fn resolve_plain_scalar(text: &str) -> YamlValue {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => return YamlValue::Null,
        "true" | "True" | "TRUE" => return YamlValue::Bool(true),
        "false" | "False" | "FALSE" => return YamlValue::Bool(false),
        _ => {}
    }
    if let Ok(int) = text.parse::<i64>() {
        return YamlValue::Int(int);
    }
    // Floats must look numeric; `parse::<f64>` alone would accept "inf"
    // and "nan", which ASDL treats as strings.
    let numeric_shape = text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
        && text.chars().any(|c| c.is_ascii_digit());
    if numeric_shape
        && let Ok(float) = text.parse::<f64>()
    {
        return YamlValue::Float(float);
    }
    YamlValue::Str(text.to_string())
}

impl Composer {
    fn scalar_node(&self, text: String, style: TScalarStyle, mark: Mark) -> YamlNode {
        let value = if style == TScalarStyle::Plain {
            resolve_plain_scalar(&text)
        } else {
            YamlValue::Str(text)
        };
        YamlNode { value, mark }
    }

    fn insert(&mut self, node: YamlNode, anchor: usize) {
        if anchor != 0 {
            self.anchors.insert(anchor, node.clone());
        }
        self.insert_node(node);
    }

    fn insert_node(&mut self, node: YamlNode) {
        match self.stack.last_mut() {
            Some(Frame::Seq { items, .. }) => items.push(node),
            Some(Frame::Map {
                pairs,
                pending_key,
                ..
            }) => {
                if let Some(key) = pending_key.take() {
                    if key.as_str() == Some("<<") {
                        self.errors.push(LoadError {
                            message: "YAML merge keys ('<<') are not supported".to_string(),
                            mark: Some(key.mark),
                        });
                        return;
                    }
                    if let Some(key_text) = key.scalar_string()
                        && pairs
                            .iter()
                            .any(|(k, _)| k.scalar_string().as_deref() == Some(&key_text))
                    {
                        self.errors.push(LoadError {
                            message: format!("duplicate mapping key '{key_text}'"),
                            mark: Some(key.mark),
                        });
                        return;
                    }
                    pairs.push((key, node));
                } else {
                    *pending_key = Some(node);
                }
            }
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
        }
    }
}

impl MarkedEventReceiver for Composer {
    fn on_event(&mut self, event: Event, marker: Marker) {
        let mark = to_mark(marker);
        match event {
            Event::DocumentStart => {
                if self.seen_document && !self.extra_document_reported {
                    self.extra_document_reported = true;
                    self.errors.push(LoadError {
                        message: "expected a single YAML document in the stream".to_string(),
                        mark: Some(mark),
                    });
                }
                self.seen_document = true;
            }
            Event::Scalar(text, style, anchor, _tag) => {
                let node = self.scalar_node(text, style, mark);
                self.insert(node, anchor);
            }
            Event::SequenceStart(anchor, _tag) => {
                self.stack.push(Frame::Seq {
                    items: Vec::new(),
                    mark,
                    anchor,
                });
            }
            Event::SequenceEnd => {
                if let Some(Frame::Seq {
                    items,
                    mark,
                    anchor,
                }) = self.stack.pop()
                {
                    let node = YamlNode {
                        value: YamlValue::Seq(items),
                        mark,
                    };
                    self.insert(node, anchor);
                }
            }
            Event::MappingStart(anchor, _tag) => {
                self.stack.push(Frame::Map {
                    pairs: Vec::new(),
                    pending_key: None,
                    mark,
                    anchor,
                });
            }
            Event::MappingEnd => {
                if let Some(Frame::Map {
                    pairs,
                    mark,
                    anchor,
                    ..
                }) = self.stack.pop()
                {
                    let node = YamlNode {
                        value: YamlValue::Map(pairs),
                        mark,
                    };
                    self.insert(node, anchor);
                }
            }
            Event::Alias(anchor) => match self.anchors.get(&anchor).cloned() {
                Some(node) => self.insert_node(node),
                None => self.errors.push(LoadError {
                    message: "alias references an unknown anchor".to_string(),
                    mark: Some(mark),
                }),
            },
            Event::Nothing | Event::StreamStart | Event::StreamEnd | Event::DocumentEnd => {}
        }
    }
}

// ==============================================================================
// Entry Point
// ==============================================================================

/// Load a single YAML document with source marks.
///
/// Returns `(None, errors)` on any syntax error or hardening violation;
/// `(None, [])` for an empty stream; `(Some(root), [])` on success. A
/// document that is just `---` loads as a `Null` root.
pub fn load_yaml(content: &str) -> (Option<YamlNode>, Vec<LoadError>) {
    let mut composer = Composer::default();
    let mut parser = Parser::new_from_str(content);
    // multi=true so every document is scanned; the composer itself rejects
    // streams with more than one.
    if let Err(scan_error) = parser.load(&mut composer, true) {
        let mark = to_mark(*scan_error.marker());
        composer.errors.push(LoadError {
            message: scan_error.to_string(),
            mark: Some(mark),
        });
    }
    if composer.errors.is_empty() {
        (composer.root, Vec::new())
    } else {
        (None, composer.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn load_ok(content: &str) -> YamlNode {
        let (node, errors) = load_yaml(content);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        node.expect("document should have a root")
    }

    // =========================================================================
    // Composition and typing
    // =========================================================================

    #[test]
    fn scalar_typing() {
        let root = load_ok("a: 1\nb: 1.5\nc: true\nd: hello\ne: ~\nf: 2k\n");
        assert_eq!(root.get("a").expect("a").value, YamlValue::Int(1));
        assert_eq!(root.get("b").expect("b").value, YamlValue::Float(1.5));
        assert_eq!(root.get("c").expect("c").value, YamlValue::Bool(true));
        assert_eq!(
            root.get("d").expect("d").value,
            YamlValue::Str("hello".to_string())
        );
        assert!(root.get("e").expect("e").is_null());
        // SPICE-style magnitudes stay strings.
        assert_eq!(
            root.get("f").expect("f").value,
            YamlValue::Str("2k".to_string())
        );
    }

    #[test]
    fn quoted_scalars_stay_strings() {
        let root = load_ok("a: \"1\"\nb: 'true'\n");
        assert_eq!(root.get("a").expect("a").value, YamlValue::Str("1".to_string()));
        assert_eq!(
            root.get("b").expect("b").value,
            YamlValue::Str("true".to_string())
        );
    }

    #[test]
    fn marks_are_one_based() {
        let root = load_ok("top:\n  inner: 1\n");
        assert_eq!(root.key_mark("top"), Some(Mark { line: 1, col: 1 }));
        let inner = root.get("top").expect("top");
        assert_eq!(inner.key_mark("inner"), Some(Mark { line: 2, col: 3 }));
    }

    #[test]
    fn sequences_and_nesting() {
        let root = load_ok("nets:\n  n1: [a.p, b.p]\n  n2:\n    - [c.p, d.p]\n    - e.p\n");
        let nets = root.get("nets").expect("nets");
        let n1 = nets.get("n1").expect("n1").as_seq().expect("seq");
        assert_eq!(n1.len(), 2);
        let n2 = nets.get("n2").expect("n2").as_seq().expect("seq");
        assert!(n2[0].as_seq().is_some());
        assert_eq!(n2[1].as_str(), Some("e.p"));
    }

    #[test]
    fn empty_stream_has_no_root() {
        let (node, errors) = load_yaml("");
        assert!(errors.is_empty());
        assert!(node.is_none());
    }

    #[test]
    fn bare_document_marker_loads_null_root() {
        let (node, errors) = load_yaml("---\n");
        assert!(errors.is_empty());
        assert!(node.expect("root").is_null());
    }

    #[test]
    fn anchors_and_aliases_resolve() {
        let root = load_ok("a: &x foo\nb: *x\n");
        assert_eq!(root.get("b").expect("b").as_str(), Some("foo"));
    }

    // =========================================================================
    // Hardening
    // =========================================================================

    #[test]
    fn duplicate_keys_are_rejected() {
        let (node, errors) = load_yaml("a: 1\na: 2\n");
        assert!(node.is_none());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("duplicate mapping key 'a'"));
        assert_eq!(errors[0].mark, Some(Mark { line: 2, col: 1 }));
    }

    #[test]
    fn nested_duplicate_keys_are_rejected() {
        let (node, errors) = load_yaml("m:\n  x: 1\n  x: 2\n");
        assert!(node.is_none());
        assert!(errors[0].message.contains("duplicate mapping key 'x'"));
    }

    #[test]
    fn merge_keys_are_rejected() {
        let (node, errors) = load_yaml("base: &b\n  x: 1\nuse:\n  <<: *b\n  y: 2\n");
        assert!(node.is_none());
        assert!(errors.iter().any(|e| e.message.contains("merge keys")));
    }

    #[test]
    fn syntax_errors_carry_marks() {
        let (node, errors) = load_yaml("a: [1, 2\n");
        assert!(node.is_none());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].mark.is_some());
    }

    #[test]
    fn second_document_is_rejected() {
        let (node, errors) = load_yaml("a: 1\n---\nb: 2\n");
        assert!(node.is_none());
        assert!(errors[0].message.contains("single YAML document"));
    }
}
