//! ASDL compiler — parse YAML circuit descriptions and emit SPICE netlists.
//!
//! An ASDL document declares hierarchical circuit modules: primitive modules
//! bind to a SPICE template string, hierarchical modules instantiate other
//! modules and wire them through named nets. Names may contain patterns —
//! enumerations `<a|b|c>`, numeric ranges `[msb:lsb]`, splices `;`, and
//! named references `<@ALIAS>` — which the compiler expands into literal
//! atoms while keeping parallel expansions bound position-by-position.
//!
//! Compilation runs as a fixed pipeline: parse, resolve imports, lower to
//! the pattern-preserving graph, atomize, emit. Every stage reports
//! problems into a shared diagnostic model with stable ordering and both
//! text and JSON renderings.
//!
//! The [`Compiler`] builder is the main entry point:
//!
//! ```no_run
//! use asdlc::Compiler;
//!
//! let (spice, diagnostics) = Compiler::new()
//!     .lib_root("lib/")
//!     .netlist("designs/ota.asdl".as_ref());
//! if let Some(text) = spice {
//!     std::fs::write("ota.spice", text)?;
//! }
//! eprintln!("{}", asdlc::diagnostics::render_text(&diagnostics));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod air;
pub mod ast;
pub mod diagnostics;
pub mod elaborate;
pub mod emit;
pub mod graph;
pub mod imports;
pub mod logging;
pub mod lower;
pub mod netlist;
pub mod parser;
pub mod patterns;
pub mod pipeline;
pub mod schema;
pub mod validator;
pub(crate) mod yaml;

// Re-export the small number of public API at the crate root.
pub use diagnostics::{Diagnostic, Severity};
pub use emit::TopStyle;
pub use pipeline::{CompileReport, Compiler, catch_internal};
