use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SAMPLE: &str = r#"
packages = [
  "git",
  "jq",
  { name = "inotify-tools", platforms = ["linux-*"] },
]

path = ["node_modules/.bin"]

[languages.rust]
channel = "stable"

[env]
RUST_LOG = "info"

[hooks.pre-commit]
command = "cargo fmt --check"
packages = ["rustfmt"]

[scripts]
test = "cargo test"

[scripts.dev]
description = "Run the app in watch mode"
exec = "pnpm dev"
"#;

fn dsh() -> Command {
    Command::cargo_bin("dsh").unwrap()
}

fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("devshell.toml");
    fs::write(&path, contents).unwrap();
    (temp, path)
}

#[test]
fn compose_renders_activation_script() {
    let (_temp, config) = write_config(SAMPLE);

    dsh()
        .arg("compose")
        .arg("--platform")
        .arg("linux-x64")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("export RUST_LOG='info'"))
        .stdout(predicate::str::contains(
            "export PATH='node_modules/.bin':\"$PATH\"",
        ))
        .stdout(predicate::str::contains("rust@stable"))
        .stdout(predicate::str::contains("inotify-tools"))
        .stdout(predicate::str::contains(
            "dsh_register_hook 'pre-commit' 'cargo fmt --check'",
        ))
        .stdout(predicate::str::contains("alias test='cargo test'"));
}

#[test]
fn compose_filters_guarded_packages_per_platform() {
    let (_temp, config) = write_config(SAMPLE);

    dsh()
        .arg("compose")
        .arg("--platform")
        .arg("darwin-arm64")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("inotify-tools").not())
        .stdout(predicate::str::contains("jq"));
}

#[test]
fn compose_output_is_deterministic() {
    let (_temp, config) = write_config(SAMPLE);

    let first = dsh()
        .arg("compose")
        .arg("--platform")
        .arg("linux-x64")
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let second = dsh()
        .arg("compose")
        .arg("--platform")
        .arg("linux-x64")
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(first, second);
}

#[test]
fn compose_emits_json_plans() {
    let (_temp, config) = write_config(SAMPLE);

    let output = dsh()
        .arg("compose")
        .arg("--platform")
        .arg("linux-x64")
        .arg("--format")
        .arg("json")
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let plan: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(plan["platform"], "linux-x64");

    let packages: Vec<_> = plan["packages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap().to_string())
        .collect();
    assert!(packages.contains(&"rust@stable".to_string()));
    assert!(packages.contains(&"inotify-tools".to_string()));
}

#[test]
fn compose_discovers_config_in_ancestors() {
    let (temp, _config) = write_config(SAMPLE);
    let nested = temp.path().join("crates/app");
    fs::create_dir_all(&nested).unwrap();

    dsh()
        .current_dir(&nested)
        .arg("compose")
        .arg("--platform")
        .arg("linux-x64")
        .assert()
        .success()
        .stdout(predicate::str::contains("export RUST_LOG='info'"));
}

#[test]
fn compose_rejects_unsupported_platforms() {
    let (_temp, config) = write_config(SAMPLE);

    dsh()
        .arg("compose")
        .arg("--platform")
        .arg("plan9-mips")
        .arg(&config)
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("unsupported platform 'plan9-mips'"));
}

#[test]
fn compose_fails_on_malformed_config() {
    let (_temp, config) = write_config("packages = [\n");

    dsh()
        .arg("compose")
        .arg("--platform")
        .arg("linux-x64")
        .arg(&config)
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("failed to parse"));
}

#[test]
fn compose_fails_on_env_conflicts() {
    let (_temp, config) = write_config(
        r#"
[languages.rust]
channel = "stable"

[languages.rust.env]
CARGO_HOME = ".cargo"

[env]
CARGO_HOME = "/tmp/cargo"
"#,
    );

    dsh()
        .arg("compose")
        .arg("--platform")
        .arg("linux-x64")
        .arg(&config)
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("CARGO_HOME"))
        .stderr(predicate::str::contains("languages.rust"));
}

#[test]
fn compose_fails_on_duplicate_scripts() {
    let (_temp, config) = write_config(
        r#"
[hooks.fmt]
command = "cargo fmt"

[scripts]
fmt = "cargo fmt --check"
"#,
    );

    dsh()
        .arg("compose")
        .arg("--platform")
        .arg("linux-x64")
        .arg(&config)
        .assert()
        .failure()
        .code(6)
        .stderr(predicate::str::contains("duplicate script 'fmt'"));
}

#[test]
fn compose_warns_on_unknown_fields() {
    let (_temp, config) = write_config(
        r#"
packages = ["git"]

[telemetry]
enable = true
"#,
    );

    dsh()
        .arg("compose")
        .arg("--platform")
        .arg("linux-x64")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("git"))
        .stderr(predicate::str::contains("unknown field 'telemetry'"));
}

#[test]
fn check_validates_every_platform() {
    let (_temp, config) = write_config(SAMPLE);

    dsh()
        .arg("check")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 platform(s)"));
}

#[test]
fn check_reports_conflicts_per_platform() {
    let (_temp, config) = write_config(
        r#"
[env.LIBRARY_PATH]
"linux-*" = "/usr/lib"
"linux-x64" = "/usr/lib64"
"#,
    );

    dsh()
        .arg("check")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("linux-x64"))
        .stderr(predicate::str::contains("LIBRARY_PATH"));
}

#[test]
fn scripts_lists_names_and_descriptions() {
    let (_temp, config) = write_config(SAMPLE);

    dsh()
        .arg("scripts")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("test"))
        .stdout(predicate::str::contains("Run the app in watch mode"));
}

#[test]
fn platforms_lists_supported_tags() {
    dsh()
        .arg("platforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("linux-x64"))
        .stdout(predicate::str::contains("linux-arm64"))
        .stdout(predicate::str::contains("darwin-x64"))
        .stdout(predicate::str::contains("darwin-arm64"));
}

#[test]
fn init_writes_starter_config() {
    let temp = TempDir::new().unwrap();

    dsh()
        .current_dir(temp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("devshell.toml"));

    let written = temp.path().join("devshell.toml");
    assert!(written.exists());

    // The starter config must itself validate.
    dsh().arg("check").arg(&written).assert().success();
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("devshell.toml"), "packages = []\n").unwrap();

    dsh()
        .current_dir(temp.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    dsh()
        .current_dir(temp.path())
        .arg("init")
        .arg("--force")
        .assert()
        .success();

    let contents = fs::read_to_string(temp.path().join("devshell.toml")).unwrap();
    assert!(contents.contains("[languages.rust]"));
}

#[test]
fn compose_without_config_reports_missing_file() {
    let temp = TempDir::new().unwrap();

    dsh()
        .current_dir(temp.path())
        .arg("compose")
        .arg("--platform")
        .arg("linux-x64")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No devshell.toml found"));
}

#[test]
fn help_output() {
    dsh().arg("--help").assert().success();
}
