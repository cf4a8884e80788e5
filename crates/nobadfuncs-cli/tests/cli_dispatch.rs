//! Integration tests for the `nobadfuncs` binary: bundled tool dispatch and
//! the checker commands.

use assert_cmd::cargo;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const EXIT_CONFIG: &str = r#"{"bad-funcs":{"std::process::exit":"use ExitCode"}}"#;

fn project() -> TempDir {
    let td = TempDir::new().expect("temp");
    std::fs::create_dir_all(td.path().join("src")).unwrap();
    std::fs::write(
        td.path().join("src/main.rs"),
        "fn main() { std::process::exit(0); }\n",
    )
    .unwrap();
    td
}

/// Runs in `dir` with an empty global config directory.
fn nobadfuncs_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("nobadfuncs"));
    cmd.current_dir(dir.path())
        .env("NOBADFUNCS_CONFIG_DIR", dir.path().join(".global"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn bundled_tool_reports_violations() {
    let td = project();
    nobadfuncs_cmd(&td)
        .args(["__nobadfuncs", "--config", EXIT_CONFIG])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("src/main.rs:1:"))
        .stdout(predicate::str::contains("error [NBF001] use ExitCode"));
}

#[test]
fn bundled_tool_passes_clean_code() {
    let td = project();
    nobadfuncs_cmd(&td)
        .args(["__nobadfuncs", "--config", r#"{"bad-funcs":{"std::process::abort":"no"}}"#])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn bundled_tool_lists_all_references() {
    let td = project();
    nobadfuncs_cmd(&td)
        .args(["__nobadfuncs", "--all", "--config", EXIT_CONFIG])
        .assert()
        .success()
        .stdout(predicate::str::contains("call std::process::exit"));
}

#[test]
fn unknown_bundled_tool_falls_through_to_check_mode() {
    let td = project();
    nobadfuncs_cmd(&td)
        .arg("__other")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("__other"));
}

#[test]
fn name_and_priority() {
    let td = project();
    nobadfuncs_cmd(&td)
        .arg("name")
        .assert()
        .success()
        .stdout("nobadfuncs\n");
    nobadfuncs_cmd(&td)
        .arg("priority")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^-?\d+\n$").unwrap());
}

#[test]
fn help_describes_the_checker() {
    let td = project();
    nobadfuncs_cmd(&td)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run nobadfuncs check"));
}

#[test]
fn run_without_config_is_clean() {
    let td = project();
    nobadfuncs_cmd(&td)
        .args(["run", "--format", "compact"])
        .assert()
        .success();
}

#[test]
fn init_then_run_fails_on_violations() {
    let td = project();
    nobadfuncs_cmd(&td).arg("init").assert().success();
    assert!(td.path().join("nobadfuncs.toml").exists());

    nobadfuncs_cmd(&td).arg("init").assert().code(1);

    nobadfuncs_cmd(&td)
        .args(["run", "--format", "compact"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("return an ExitCode from main instead"))
        .stderr(predicate::str::contains("violation(s)"));

    nobadfuncs_cmd(&td)
        .args(["run", "--format", "json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"code\": \"NBF001\""));
}

#[test]
fn excluded_paths_are_not_checked() {
    let td = project();
    nobadfuncs_cmd(&td).arg("init").assert().success();
    nobadfuncs_cmd(&td)
        .args(["run", "--exclude", "src/**"])
        .assert()
        .success();
}

#[test]
fn upgrade_config_in_place_then_verify() {
    let td = project();
    let config = td.path().join("nobadfuncs.toml");
    std::fs::write(
        &config,
        "exclude = [\"gen/**\"]\n\n[bad-funcs]\n\"std::process::exit\" = \"use ExitCode\"\n",
    )
    .unwrap();

    nobadfuncs_cmd(&td)
        .args(["upgrade-config", "nobadfuncs.toml", "--in-place"])
        .assert()
        .success();

    let upgraded = std::fs::read_to_string(&config).unwrap();
    assert!(upgraded.contains("version = 1"), "{upgraded}");
    assert!(upgraded.contains("[[bad-funcs]]"), "{upgraded}");

    nobadfuncs_cmd(&td)
        .arg("verify-config")
        .assert()
        .success()
        .stdout("config is valid\n");
}

#[test]
fn upgrade_config_reads_stdin() {
    let td = project();
    nobadfuncs_cmd(&td)
        .arg("upgrade-config")
        .write_stdin("[bad-funcs]\n\"a::b\" = \"no\"\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("path = \"a::b\""));
}

#[test]
fn verify_config_rejects_bad_patterns() {
    let td = project();
    std::fs::write(
        td.path().join("nobadfuncs.toml"),
        "version = 1\n[[bad-funcs]]\npath = \"a::\"\n",
    )
    .unwrap();
    nobadfuncs_cmd(&td)
        .arg("verify-config")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid config"));
}
