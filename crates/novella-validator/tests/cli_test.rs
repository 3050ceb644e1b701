//! Runs the `novella-validate` binary and checks its exit code and output.

mod common;

use std::process::{Command, Output};

use common::Project;

fn validate(project: &Project, extra_env: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_novella-validate"));
    command
        .env("NOVELLA_CONTENT_DIR", project.content_dir())
        .env("NOVELLA_ASSET_DIRS", project.root.path().join("public"))
        .env("RUST_LOG", "off");
    for (key, value) in extra_env {
        command.env(key, value);
    }
    command.output().unwrap()
}

#[test]
fn test_exits_zero_when_graph_is_clean() {
    // Arrange
    let project = Project::new();
    project.chapter("intro.yaml", "start:\n  nextScene: finale\nfinale:\n  isTerminal: true\n");

    // Act
    let output = validate(&project, &[]);

    // Assert
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Scenes checked: 2"), "{stdout}");
    assert!(stdout.contains("Errors:         0"), "{stdout}");
}

#[test]
fn test_exits_one_on_dead_end() {
    // Arrange
    let project = Project::new();
    project.chapter("intro.yaml", "start:\n  dialogue:\n    - text: Silence.\n");

    // Act
    let output = validate(&project, &[]);

    // Assert
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("[ERROR] intro:start: dead end"), "{stdout}");
}

#[test]
fn test_json_report_on_stdout() {
    // Arrange
    let project = Project::new();
    project.chapter("intro.yaml", "start:\n  isTerminal: true\n");

    // Act
    let output = validate(&project, &[("NOVELLA_REPORT_FORMAT", "json")]);

    // Assert
    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["scene_count"], 1);
    assert_eq!(report["issues"], serde_json::json!([]));
}

#[test]
fn test_exits_one_on_invalid_config() {
    // Arrange
    let project = Project::new();

    // Act
    let output = validate(&project, &[("NOVELLA_LOG_FORMAT", "yaml")]);

    // Assert
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("NOVELLA_LOG_FORMAT"), "{stderr}");
}
