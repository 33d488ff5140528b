// ==============================================================================
// CLI for the ASDL Compiler
// ==============================================================================
//
// Four subcommands covering the pipeline surface:
//   - `asdlc validate <FILE>`   -- parse, resolve, validate; no output file
//   - `asdlc elaborate <FILE>`  -- write the pattern-expanded AST
//   - `asdlc netlist <FILE>`    -- write the SPICE netlist
//   - `asdlc schema`            -- print the input grammar schema
//
// Exit codes: 0 ok, 1 diagnostics contained an error, 2 CLI misuse,
// 3 internal failure. Every command accepts `--json` for machine-readable
// diagnostics. Output files are only written when the producing stage
// succeeded; on error no artifact is created.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use asdlc::diagnostics::{Diagnostic, has_error, render_json, render_text};
use asdlc::{Compiler, TopStyle, catch_internal};
use lexopt::prelude::*;

// ==============================================================================
// CLI Help Text
// ==============================================================================

const MAIN_HELP: &str = "\
asdlc - ASDL compiler: YAML circuit descriptions to SPICE netlists

Usage: asdlc <COMMAND>

Commands:
  validate   Parse, resolve imports, and validate; no output file
  elaborate  Expand patterns and write the elaborated AST
  netlist    Compile to a SPICE netlist
  schema     Print the ASDL input schema

Options:
  -h, --help  Print help";

const VALIDATE_HELP: &str = "\
Usage: asdlc validate [OPTIONS] <FILE>

Options:
      --top <NAME>      Override the top module
      --lib-root <DIR>  Additional library roots for imports (repeatable)
      --json            Emit machine-readable JSON diagnostics
  -h, --help            Print help";

const ELABORATE_HELP: &str = "\
Usage: asdlc elaborate [OPTIONS] <FILE>

Options:
  -o, --output <FILE>     Output file (default: input with .elab.{yaml|json})
      --format <FORMAT>   Output format: yaml (default) or json
      --top <NAME>        Override the top module
      --lib-root <DIR>    Additional library roots for imports (repeatable)
      --json              Emit machine-readable JSON diagnostics
  -h, --help              Print help";

const NETLIST_HELP: &str = "\
Usage: asdlc netlist [OPTIONS] <FILE>

Options:
  -o, --output <FILE>      Output SPICE file (default: input with .spice)
      --top <NAME>         Override the top module
      --top-style <STYLE>  Top module emission: subckt (default) or flat
      --lib-root <DIR>     Additional library roots for imports (repeatable)
      --json               Emit machine-readable JSON diagnostics
  -h, --help               Print help";

const SCHEMA_HELP: &str = "\
Usage: asdlc schema [OPTIONS]

Options:
      --out <DIR>  Write asdl.schema.json into DIR instead of stdout
      --json       Emit JSON (the schema is always JSON; accepted for symmetry)
  -h, --help       Print help";

const EXIT_DIAGNOSTICS: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_INTERNAL: u8 = 3;

// ==============================================================================
// Argument Parsing
// ==============================================================================

#[derive(Default)]
struct CommonArgs {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<String>,
    top: Option<String>,
    top_style: Option<String>,
    lib_roots: Vec<PathBuf>,
    json: bool,
    out_dir: Option<PathBuf>,
}

fn usage_error(message: &str, help: &str) -> ExitCode {
    eprintln!("error: {message}\n\n{help}");
    ExitCode::from(EXIT_USAGE)
}

fn parse_command_args(
    parser: &mut lexopt::Parser,
    help: &'static str,
    needs_input: bool,
) -> Result<CommonArgs, String> {
    let mut args = CommonArgs::default();
    while let Some(arg) = parser.next().map_err(|e| e.to_string())? {
        match arg {
            Short('o') | Long("output") => {
                args.output = Some(PathBuf::from(
                    parser.value().map_err(|e| e.to_string())?,
                ));
            }
            Long("format") => {
                args.format = Some(
                    parser
                        .value()
                        .map_err(|e| e.to_string())?
                        .string()
                        .map_err(|e| e.to_string())?,
                );
            }
            Long("top") => {
                args.top = Some(
                    parser
                        .value()
                        .map_err(|e| e.to_string())?
                        .string()
                        .map_err(|e| e.to_string())?,
                );
            }
            Long("top-style") => {
                args.top_style = Some(
                    parser
                        .value()
                        .map_err(|e| e.to_string())?
                        .string()
                        .map_err(|e| e.to_string())?,
                );
            }
            Long("lib-root") => {
                args.lib_roots.push(PathBuf::from(
                    parser.value().map_err(|e| e.to_string())?,
                ));
            }
            Long("out") => {
                args.out_dir = Some(PathBuf::from(
                    parser.value().map_err(|e| e.to_string())?,
                ));
            }
            Long("json") => args.json = true,
            Short('h') | Long("help") => {
                println!("{help}");
                std::process::exit(0);
            }
            Value(value) => {
                if args.input.is_some() {
                    return Err(format!("unexpected argument {value:?}"));
                }
                args.input = Some(PathBuf::from(value));
            }
            other => return Err(other.unexpected().to_string()),
        }
    }
    if needs_input && args.input.is_none() {
        return Err("an input file is required".to_string());
    }
    Ok(args)
}

// ==============================================================================
// Entry Point
// ==============================================================================

fn main() -> ExitCode {
    asdlc::logging::init_from_env();

    let mut parser = lexopt::Parser::from_env();
    let subcommand = match parser.next() {
        Ok(Some(Value(value))) => match value.string() {
            Ok(s) => s,
            Err(e) => return usage_error(&e.to_string(), MAIN_HELP),
        },
        Ok(Some(Short('h') | Long("help"))) => {
            println!("{MAIN_HELP}");
            return ExitCode::SUCCESS;
        }
        Ok(Some(other)) => return usage_error(&other.unexpected().to_string(), MAIN_HELP),
        Ok(None) => return usage_error("a subcommand is required", MAIN_HELP),
        Err(e) => return usage_error(&e.to_string(), MAIN_HELP),
    };

    match subcommand.as_str() {
        "validate" => match parse_command_args(&mut parser, VALIDATE_HELP, true) {
            Ok(args) => guarded(args, run_validate),
            Err(e) => usage_error(&e, VALIDATE_HELP),
        },
        "elaborate" => match parse_command_args(&mut parser, ELABORATE_HELP, true) {
            Ok(args) => guarded(args, run_elaborate),
            Err(e) => usage_error(&e, ELABORATE_HELP),
        },
        "netlist" => match parse_command_args(&mut parser, NETLIST_HELP, true) {
            Ok(args) => guarded(args, run_netlist),
            Err(e) => usage_error(&e, NETLIST_HELP),
        },
        "schema" => match parse_command_args(&mut parser, SCHEMA_HELP, false) {
            Ok(args) => guarded(args, run_schema),
            Err(e) => usage_error(&e, SCHEMA_HELP),
        },
        other => usage_error(&format!("unknown subcommand `{other}`"), MAIN_HELP),
    }
}

/// Run a command behind the internal-error boundary: a panic inside the
/// pipeline prints a TOOL-999 diagnostic and exits 3 instead of aborting.
fn guarded(args: CommonArgs, run: fn(&CommonArgs) -> ExitCode) -> ExitCode {
    match catch_internal(|| run(&args)) {
        Ok(code) => code,
        Err(diagnostic) => {
            let json = args.json;
            print_diagnostics(&[diagnostic], json);
            ExitCode::from(EXIT_INTERNAL)
        }
    }
}

fn print_diagnostics(diagnostics: &[Diagnostic], json: bool) {
    if json {
        println!("{}", render_json(diagnostics));
        return;
    }
    if diagnostics.is_empty() {
        return;
    }
    eprintln!("{}", render_text(diagnostics));
}

fn exit_for(diagnostics: &[Diagnostic]) -> ExitCode {
    if has_error(diagnostics) {
        ExitCode::from(EXIT_DIAGNOSTICS)
    } else {
        ExitCode::SUCCESS
    }
}

fn build_compiler(args: &CommonArgs) -> Compiler {
    let mut compiler = Compiler::new();
    for root in &args.lib_roots {
        compiler.lib_root(root);
    }
    if let Some(top) = &args.top {
        compiler.top(top);
    }
    compiler
}

// ==============================================================================
// Subcommands
// ==============================================================================

fn run_validate(args: &CommonArgs) -> ExitCode {
    let input = args.input.as_ref().expect("input enforced by arg parser");
    let report = build_compiler(args).validate(input);
    print_diagnostics(&report.diagnostics, args.json);
    exit_for(&report.diagnostics)
}

fn run_elaborate(args: &CommonArgs) -> ExitCode {
    let input = args.input.as_ref().expect("input enforced by arg parser");
    let format = args.format.as_deref().unwrap_or("yaml").to_ascii_lowercase();
    if format != "yaml" && format != "json" {
        return usage_error(&format!("unknown format `{format}`"), ELABORATE_HELP);
    }

    let (document, diagnostics) = build_compiler(args).elaborate(input);
    if let Some(document) = document {
        let (content, extension) = if format == "json" {
            match asdlc::elaborate::to_json(&document) {
                Ok(content) => (content, "elab.json"),
                Err(e) => {
                    eprintln!("error: serialize elaborated AST: {e}");
                    return ExitCode::from(EXIT_INTERNAL);
                }
            }
        } else {
            match asdlc::elaborate::to_yaml(&document) {
                Ok(content) => (content, "elab.yaml"),
                Err(e) => {
                    eprintln!("error: serialize elaborated AST: {e}");
                    return ExitCode::from(EXIT_INTERNAL);
                }
            }
        };
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| input.with_extension(extension));
        if let Err(e) = fs::write(&path, content) {
            eprintln!("error: write {}: {e}", path.display());
            return ExitCode::from(EXIT_INTERNAL);
        }
    }
    print_diagnostics(&diagnostics, args.json);
    exit_for(&diagnostics)
}

fn run_netlist(args: &CommonArgs) -> ExitCode {
    let input = args.input.as_ref().expect("input enforced by arg parser");
    let top_style = match args.top_style.as_deref() {
        None => TopStyle::default(),
        Some(value) => match TopStyle::parse(value) {
            Some(style) => style,
            None => return usage_error(&format!("unknown top style `{value}`"), NETLIST_HELP),
        },
    };

    let mut compiler = build_compiler(args);
    compiler.top_style(top_style);
    let (text, diagnostics) = compiler.netlist(input);
    if let Some(text) = text {
        let path = args
            .output
            .clone()
            .unwrap_or_else(|| input.with_extension("spice"));
        if let Err(e) = fs::write(&path, text) {
            eprintln!("error: write {}: {e}", path.display());
            return ExitCode::from(EXIT_INTERNAL);
        }
    }
    print_diagnostics(&diagnostics, args.json);
    exit_for(&diagnostics)
}

fn run_schema(args: &CommonArgs) -> ExitCode {
    let schema = asdlc::schema::asdl_schema();
    let content = match serde_json::to_string_pretty(&schema) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("error: serialize schema: {e}");
            return ExitCode::from(EXIT_INTERNAL);
        }
    };
    match &args.out_dir {
        Some(dir) => {
            if let Err(e) = fs::create_dir_all(dir) {
                eprintln!("error: create {}: {e}", dir.display());
                return ExitCode::from(EXIT_INTERNAL);
            }
            let path = dir.join("asdl.schema.json");
            if let Err(e) = fs::write(&path, format!("{content}\n")) {
                eprintln!("error: write {}: {e}", path.display());
                return ExitCode::from(EXIT_INTERNAL);
            }
        }
        None => println!("{content}"),
    }
    ExitCode::SUCCESS
}
