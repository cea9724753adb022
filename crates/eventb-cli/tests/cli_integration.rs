//! End-to-end integration tests for the Event-B CLI.
//!
//! These tests exercise the full CLI workflow including:
//! - `eventb check` - Validate machine and context files
//! - `eventb build` - Compile sources into Rodin artifacts
//! - `eventb new`   - Scaffold a Rodin project directory

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the eventb binary.
fn eventb() -> Command {
    Command::cargo_bin("eventb").unwrap()
}

/// Create a temporary source file with the given content.
fn create_source_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// ============================================================================
// Sample sources for testing
// ============================================================================

const VALID_MACHINE: &str = "\
machine counter sees limits
variables count
invariants
  @inv1 count > 0
events
  event INITIALISATION
  then
    @act1 count := 1
  end
  event increment
  any step
  where
    @grd1 step > 0
  then
    @act1 count := count + step
  end
end
";

const VALID_CONTEXT: &str = "\
context limits
sets STATUS
constants max
axioms
  @axm1 max > 0
end
";

// The variables block names no variables, which is a syntax error.
const INVALID_MACHINE: &str = "machine broken\nvariables\nend\n";

// Parses fine but declares no INITIALISATION event.
const UNINITIALISED_MACHINE: &str = "\
machine drifter
events
  event tick
  then
    @act1 x := x + 1
  end
end
";

// ============================================================================
// Check command tests
// ============================================================================

#[test]
fn test_check_valid_machine() {
    let dir = TempDir::new().unwrap();
    let path = create_source_file(&dir, "counter.bm", VALID_MACHINE);

    eventb()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓"));
}

#[test]
fn test_check_valid_context() {
    let dir = TempDir::new().unwrap();
    let path = create_source_file(&dir, "limits.bc", VALID_CONTEXT);

    eventb()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓"));
}

#[test]
fn test_check_invalid_machine() {
    let dir = TempDir::new().unwrap();
    let path = create_source_file(&dir, "broken.bm", INVALID_MACHINE);

    eventb()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("expected identifier"));
}

#[test]
fn test_check_warns_without_initialisation() {
    let dir = TempDir::new().unwrap();
    let path = create_source_file(&dir, "drifter.bm", UNINITIALISED_MACHINE);

    // Warnings are reported but do not fail the check.
    eventb()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("INITIALISATION"));
}

#[test]
fn test_check_missing_file() {
    eventb()
        .arg("check")
        .arg("/nonexistent/path/machine.bm")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_check_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let path = create_source_file(&dir, "notes.txt", VALID_MACHINE);

    eventb()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an Event-B source file"));
}

#[test]
fn test_check_json_output() {
    let dir = TempDir::new().unwrap();
    let path = create_source_file(&dir, "broken.bm", INVALID_MACHINE);

    eventb()
        .arg("check")
        .arg(&path)
        .arg("--format")
        .arg("json")
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"severity\""))
        .stdout(predicate::str::contains("\"error\""));
}

#[test]
fn test_check_json_output_empty_for_clean_file() {
    let dir = TempDir::new().unwrap();
    let path = create_source_file(&dir, "limits.bc", VALID_CONTEXT);

    eventb()
        .arg("check")
        .arg(&path)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

// ============================================================================
// Build command tests
// ============================================================================

#[test]
fn test_build_machine_writes_artifact() {
    let dir = TempDir::new().unwrap();
    let path = create_source_file(&dir, "counter.bm", VALID_MACHINE);

    eventb()
        .arg("build")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("counter.bum"));

    let artifact = dir.path().join("rodin-project").join("counter.bum");
    let xml = fs::read_to_string(&artifact).unwrap();
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("org.eventb.core.machineFile"));
    assert!(xml.contains("org.eventb.core.seesContext"));
    assert!(xml.contains("name=\"1\""));
}

#[test]
fn test_build_context_writes_artifact() {
    let dir = TempDir::new().unwrap();
    let path = create_source_file(&dir, "limits.bc", VALID_CONTEXT);

    eventb().arg("build").arg(&path).assert().success();

    let artifact = dir.path().join("rodin-project").join("limits.buc");
    let xml = fs::read_to_string(&artifact).unwrap();
    assert!(xml.contains("org.eventb.core.contextFile"));
    assert!(xml.contains("org.eventb.core.carrierSet"));
}

#[test]
fn test_build_directory_compiles_all_sources() {
    let dir = TempDir::new().unwrap();
    create_source_file(&dir, "counter.bm", VALID_MACHINE);
    create_source_file(&dir, "limits.bc", VALID_CONTEXT);

    eventb().arg("build").arg(dir.path()).assert().success();

    let out = dir.path().join("rodin-project");
    assert!(out.join("counter.bum").exists());
    assert!(out.join("limits.buc").exists());
}

#[test]
fn test_build_invalid_machine_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = create_source_file(&dir, "broken.bm", INVALID_MACHINE);

    eventb()
        .arg("build")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));

    assert!(!dir.path().join("rodin-project").join("broken.bum").exists());
}

#[test]
fn test_build_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let path = create_source_file(&dir, "counter.bm", VALID_MACHINE);
    let artifact = dir.path().join("rodin-project").join("counter.bum");

    eventb().arg("build").arg(&path).assert().success();
    let first = fs::read(&artifact).unwrap();

    eventb().arg("build").arg(&path).assert().success();
    let second = fs::read(&artifact).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_build_honors_out_flag() {
    let dir = TempDir::new().unwrap();
    let path = create_source_file(&dir, "counter.bm", VALID_MACHINE);
    let out = dir.path().join("elsewhere");

    eventb()
        .arg("build")
        .arg(&path)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("counter.bum").exists());
}

#[test]
fn test_build_honors_config_output_dir() {
    let dir = TempDir::new().unwrap();
    create_source_file(&dir, "counter.bm", VALID_MACHINE);
    fs::write(dir.path().join("eventb.toml"), "output_dir = \"generated\"\n").unwrap();

    eventb().arg("build").arg(dir.path()).assert().success();

    assert!(dir.path().join("generated").join("counter.bum").exists());
}

#[test]
fn test_build_empty_directory_fails() {
    let dir = TempDir::new().unwrap();

    eventb()
        .arg("build")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no .bm or .bc files"));
}

// ============================================================================
// New command tests
// ============================================================================

#[test]
fn test_new_scaffolds_a_rodin_project() {
    let dir = TempDir::new().unwrap();

    eventb()
        .current_dir(dir.path())
        .arg("new")
        .arg("hello_world")
        .assert()
        .success();

    let descriptor = fs::read_to_string(dir.path().join("hello_world").join(".project")).unwrap();
    assert!(descriptor.contains("<name>hello_world</name>"));
    assert!(descriptor.contains("org.rodinp.core.rodinnature"));
}

#[test]
fn test_new_rejects_invalid_names() {
    let dir = TempDir::new().unwrap();

    eventb()
        .current_dir(dir.path())
        .arg("new")
        .arg("has space")
        .assert()
        .failure()
        .stderr(predicate::str::contains("letters, digits or underscores"));
}

#[test]
fn test_new_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("existing")).unwrap();

    eventb()
        .current_dir(dir.path())
        .arg("new")
        .arg("existing")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ============================================================================
// Help and version tests
// ============================================================================

#[test]
fn test_help() {
    eventb()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("lsp"));
}

#[test]
fn test_version() {
    eventb()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("eventb"));
}

// ============================================================================
// End-to-end workflow tests
// ============================================================================

#[test]
fn test_full_workflow() {
    let dir = TempDir::new().unwrap();
    let machine = create_source_file(&dir, "counter.bm", VALID_MACHINE);
    let context = create_source_file(&dir, "limits.bc", VALID_CONTEXT);

    // 1. Check both sources.
    eventb().arg("check").arg(&machine).assert().success();
    eventb().arg("check").arg(&context).assert().success();

    // 2. Build the whole directory.
    eventb().arg("build").arg(dir.path()).assert().success();

    // 3. The machine artifact exists and carries monotonically numbered
    // elements: sees, variable, invariant, two events and their children.
    let machine_xml =
        fs::read_to_string(dir.path().join("rodin-project").join("counter.bum")).unwrap();
    for index in 1..=9 {
        assert!(machine_xml.contains(&format!("name=\"{index}\"")));
    }
    assert!(!machine_xml.contains("name=\"10\""));
}
