//! Hygiene: source-level budgets checked at test time.
//!
//! Scans the production files under `src/` (sibling `_test.rs` files are
//! skipped) for patterns that crash the process or throw errors away. Panic
//! budgets are zero. Components in this crate degrade to logged no-ops; they
//! never panic and never drop a `Result` unread. `.ok()` is allowed only where
//! the error carries nothing (an unset env var, an out-of-range index).

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        if path.extension().is_none_or(|e| e != "rs") {
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// Lines containing `pattern`, outside inline `#[cfg(test)]` modules.
fn hits(files: &[SourceFile], pattern: &str) -> Vec<String> {
    let mut out = Vec::new();
    for file in files {
        let production = file.content.split("#[cfg(test)]\nmod tests").next().unwrap_or("");
        for (number, line) in production.lines().enumerate() {
            if line.contains(pattern) {
                out.push(format!("  {}:{}: {}", file.path, number + 1, line.trim()));
            }
        }
    }
    out
}

fn assert_budget(pattern: &str, budget: usize) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found; run from the crate root");
    let found = hits(&files, pattern);
    assert!(
        found.len() <= budget,
        "`{pattern}` budget exceeded: found {}, max {budget}.\n{}",
        found.len(),
        found.join("\n")
    );
}

// =============================================================
// Panics
// =============================================================

#[test]
fn unwrap_budget() {
    assert_budget(".unwrap()", 0);
}

#[test]
fn expect_budget() {
    assert_budget(".expect(", 0);
}

#[test]
fn panic_budget() {
    assert_budget("panic!(", 0);
}

#[test]
fn unreachable_budget() {
    assert_budget("unreachable!(", 0);
}

#[test]
fn todo_budget() {
    assert_budget("todo!(", 0);
}

#[test]
fn unimplemented_budget() {
    assert_budget("unimplemented!(", 0);
}

// =============================================================
// Silent loss
// =============================================================

#[test]
fn silent_discard_budget() {
    assert_budget("let _ =", 0);
}

#[test]
fn dot_ok_budget() {
    assert_budget(".ok()", 2);
}

// =============================================================
// Structure
// =============================================================

#[test]
fn allow_dead_code_budget() {
    assert_budget("#[allow(dead_code)]", 0);
}

#[test]
fn every_test_file_is_wired_in() {
    let Ok(entries) = fs::read_dir("src") else {
        panic!("src/ not readable");
    };
    let sources: Vec<String> = source_files().into_iter().map(|f| f.content).collect();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.ends_with("_test.rs") {
            continue;
        }
        let wiring = format!("#[path = \"{name}\"]");
        assert!(
            sources.iter().any(|s| s.contains(&wiring)),
            "{name} is not referenced by any #[path] attribute"
        );
    }
}
