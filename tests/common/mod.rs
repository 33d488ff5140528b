// ==============================================================================
// Shared Test Helpers
// ==============================================================================
//
// Common utility functions used across multiple integration test files.
//
// Each test file that imports this module compiles its own copy, so not every
// function is used in every binary. Suppress the resulting dead_code warnings.
#![allow(dead_code)]
// Import this module in each test file with:
//
//     mod common;
//     use common::write_design;

use std::fs;
use std::path::{Path, PathBuf};

/// Write a design fixture into the test's temp directory and return its path.
pub fn write_design(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write design fixture");
    path
}

/// Collect the diagnostic codes of a slice, for order-insensitive assertions.
pub fn codes(diagnostics: &[asdlc::Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(|d| d.code.clone()).collect()
}
