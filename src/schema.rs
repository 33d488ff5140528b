// ==============================================================================
// Input Grammar Schema
// ==============================================================================
//
// A JSON-schema-style description of the ASDL YAML grammar, served by the
// `schema` CLI command. Kept as a single literal document: the grammar
// changes rarely and a generated schema would only obscure it.

use serde_json::{Value, json};

/// JSON schema document for ASDL input files.
pub fn asdl_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "ASDL document",
        "type": "object",
        "required": ["file_info"],
        "additionalProperties": false,
        "properties": {
            "file_info": {
                "type": "object",
                "properties": {
                    "top_module": {"type": "string"},
                    "doc": {"type": "string"},
                    "author": {"type": "string"},
                    "date": {"type": "string"},
                    "revision": {"type": "string"},
                },
                "additionalProperties": true,
            },
            "imports": {
                "type": "object",
                "additionalProperties": {"type": "string", "pattern": r"\.asdl$"},
            },
            "model_alias": {
                "type": "object",
                "additionalProperties": {
                    "type": "string",
                    "pattern": "^[A-Za-z_][A-Za-z0-9_]*\\.[A-Za-z_][A-Za-z0-9_]*$",
                },
            },
            "modules": {
                "type": "object",
                "additionalProperties": {"$ref": "#/$defs/module"},
            },
            "devices": {
                "type": "object",
                "additionalProperties": {"$ref": "#/$defs/device"},
            },
            "metadata": {},
        },
        "$defs": {
            "module": {
                "type": "object",
                "properties": {
                    "doc": {"type": "string"},
                    "ports": {
                        "type": "object",
                        "additionalProperties": {"$ref": "#/$defs/port"},
                    },
                    "internal_nets": {"type": "array", "items": {"type": "string"}},
                    "parameters": {"type": "object"},
                    "params": {"type": "object"},
                    "variables": {"type": "object"},
                    "vars": {"type": "object"},
                    "spice_template": {"type": "string"},
                    "instances": {
                        "type": "object",
                        "additionalProperties": {"$ref": "#/$defs/instance"},
                    },
                    "nets": {
                        "type": "object",
                        "additionalProperties": {
                            "type": "array",
                            "items": {
                                "anyOf": [
                                    {"type": "string"},
                                    {"type": "array", "items": {"type": "string"}},
                                ],
                            },
                        },
                    },
                    "patterns": {
                        "type": "object",
                        "additionalProperties": {"type": "string"},
                    },
                    "instance_defaults": {
                        "type": "object",
                        "additionalProperties": {
                            "type": "object",
                            "additionalProperties": {"type": "string"},
                        },
                    },
                    "pdk": {"type": "string"},
                    "metadata": {},
                },
                "additionalProperties": false,
            },
            "port": {
                "type": "object",
                "required": ["dir"],
                "properties": {
                    "dir": {"enum": ["in", "out", "in_out"]},
                    "type": {"enum": ["signal", "power", "ground", "bias", "control"]},
                    "metadata": {},
                },
                "additionalProperties": false,
            },
            "instance": {
                "type": "object",
                "required": ["model"],
                "properties": {
                    "model": {"type": "string"},
                    "mappings": {
                        "type": "object",
                        "additionalProperties": {"type": "string"},
                    },
                    "doc": {"type": "string"},
                    "parameters": {"type": "object"},
                    "params": {"type": "object"},
                    "metadata": {},
                },
                "additionalProperties": false,
            },
            "device": {
                "type": "object",
                "properties": {
                    "doc": {"type": "string"},
                    "ports": {"type": "array", "items": {"type": "string"}},
                    "parameters": {"type": "object"},
                    "params": {"type": "object"},
                    "variables": {"type": "object"},
                    "vars": {"type": "object"},
                    "backends": {
                        "type": "object",
                        "additionalProperties": {"type": "string"},
                    },
                    "pdk": {"type": "string"},
                    "metadata": {},
                },
                "additionalProperties": false,
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_names_the_mandatory_section() {
        let schema = asdl_schema();
        assert_eq!(schema["required"][0], "file_info");
        assert!(schema["$defs"]["module"]["properties"]["spice_template"].is_object());
        assert_eq!(schema["$defs"]["port"]["required"][0], "dir");
    }
}
