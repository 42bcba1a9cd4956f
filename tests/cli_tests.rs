//! CLI integration tests for the `tokenpipe` binary.
//!
//! Runs the real binary in a temp project and checks exit codes, the
//! stdout summary and the stage-labelled error on stderr.

use std::fs;
use std::path::Path;
use std::process::Command;

use serde_json::{json, Value};
use tempfile::TempDir;

/// Run tokenpipe in `dir` and return (stdout, stderr, exit code).
fn run_tokenpipe(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_tokenpipe"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute tokenpipe");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

fn create_project(root: &Path) {
    let tokens = json!({
        "global": {
            "color": { "$type": "color", "primary": { "$value": "#ff0000" } },
            "space": { "s": { "$type": "dimension", "$value": "8px" } }
        },
        "Themes/ZRH": { "color": { "accent": { "$type": "color", "$value": "#00ff00" } } },
        "$themes": []
    });
    fs::create_dir_all(root.join("input")).unwrap();
    fs::write(root.join("input/design-tokens.json"), tokens.to_string()).unwrap();
}

#[test]
fn test_build_succeeds() {
    let temp = TempDir::new().unwrap();
    create_project(temp.path());

    let (stdout, stderr, code) = run_tokenpipe(temp.path(), &["--brand", "acme", "--platform", "css"]);

    assert_eq!(code, 0, "build should succeed: {}", stderr);
    assert!(stdout.contains("Build succeeded: 1 target(s)"));
    let css = fs::read_to_string(temp.path().join("build/acme/css/tokens.css")).unwrap();
    assert!(css.contains("--color-primary: #ff0000;"));
    assert!(css.contains("--color-accent: #00ff00;"));
    assert!(temp.path().join("temp/Themes_ZRH.json").exists());
}

#[test]
fn test_build_subcommand_with_config_file() {
    let temp = TempDir::new().unwrap();
    create_project(temp.path());
    fs::write(
        temp.path().join("token-config.toml"),
        "brands = [\"zrh-default\"]\nplatforms = [\"json\"]\nexcludeKeys = [\"Themes/ZRH\"]\n",
    )
    .unwrap();

    let (_, stderr, code) = run_tokenpipe(temp.path(), &["build"]);

    assert_eq!(code, 0, "build should succeed: {}", stderr);
    let nested = fs::read_to_string(temp.path().join("build/zrh-default/json/tokensNested.json")).unwrap();
    let nested: Value = serde_json::from_str(&nested).unwrap();
    assert_eq!(nested, json!({ "color": { "primary": "#ff0000" } }));
}

#[test]
fn test_missing_input_exits_with_error() {
    let temp = TempDir::new().unwrap();

    let (_, stderr, code) = run_tokenpipe(temp.path(), &["--brand", "acme"]);

    assert_eq!(code, 1);
    assert!(stderr.contains("Token splitting failed: Design tokens file not found"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_arguments_exit_1() {
    let temp = TempDir::new().unwrap();

    let (_, stderr, code) = run_tokenpipe(temp.path(), &["--jobs", "many"]);
    assert_eq!(code, 1);
    assert!(!stderr.is_empty());

    let (_, _, code) = run_tokenpipe(temp.path(), &["--no-such-flag"]);
    assert_eq!(code, 1);
}

#[test]
fn test_help_exits_0() {
    let temp = TempDir::new().unwrap();
    let (stdout, _, code) = run_tokenpipe(temp.path(), &["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("split"));
}

#[test]
fn test_split_writes_fragments_only() {
    let temp = TempDir::new().unwrap();
    create_project(temp.path());

    let (_, stderr, code) = run_tokenpipe(temp.path(), &["split", "--temp-dir", "fragments"]);

    assert_eq!(code, 0, "split should succeed: {}", stderr);
    assert!(temp.path().join("fragments/global.json").exists());
    assert!(temp.path().join("fragments/Themes_ZRH.json").exists());
    assert!(!temp.path().join("build").exists());
}

#[test]
fn test_dry_run_lists_targets() {
    let temp = TempDir::new().unwrap();

    let (stdout, _, code) =
        run_tokenpipe(temp.path(), &["--dry-run", "--brand", "a", "--brand", "b", "--platform", "*"]);

    assert_eq!(code, 0);
    assert!(stdout.contains("Dry run: 18 target(s) planned"));
    assert!(stdout.contains("a/android"));
    assert!(stdout.contains("b/web"));
    assert!(!temp.path().join("temp").exists());
}

#[test]
fn test_json_result_on_stdout() {
    let temp = TempDir::new().unwrap();
    create_project(temp.path());

    let (stdout, _, code) =
        run_tokenpipe(temp.path(), &["--json", "--brand", "acme", "--platform", "js", "--platform", "css"]);

    assert_eq!(code, 0);
    let result: Value = serde_json::from_str(stdout.trim()).expect("stdout should be one JSON object");
    assert_eq!(result["success"], true);
    let ids: Vec<_> = result["targets"].as_array().unwrap().iter().map(|t| t["id"].clone()).collect();
    assert_eq!(ids, vec![json!("acme/js"), json!("acme/css")]);
}

#[test]
fn test_config_typo_keeps_valid_keys() {
    let temp = TempDir::new().unwrap();
    create_project(temp.path());
    fs::write(
        temp.path().join("token-config.toml"),
        "brands = [\"acme\"]\nplatforms = [\"css\"]\nincludKeys = [\"global\"]\n",
    )
    .unwrap();

    let (_, stderr, code) = run_tokenpipe(temp.path(), &[]);

    assert_eq!(code, 0, "build should succeed: {}", stderr);
    assert!(stderr.contains("Ignoring unknown configuration key 'includKeys'"), "stderr: {}", stderr);
    assert!(temp.path().join("build/acme/css/tokens.css").exists());
    assert!(!temp.path().join("build/dxn-default").exists());
}
