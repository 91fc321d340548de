//! Tests against the real `tsb` binary

mod common;

use assert_cmd::Command;
use common::Project;
use predicates::prelude::*;

#[allow(deprecated)]
fn tsb_cmd(project: &Project) -> Command {
    let mut cmd = Command::cargo_bin("tsb").unwrap();
    cmd.current_dir(&project.path);
    cmd
}

#[test]
fn mode_flag_is_required() {
    let project = Project::new();
    tsb_cmd(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--build"));
}

#[test]
fn build_and_copy_only_conflict() {
    let project = Project::new();
    tsb_cmd(&project)
        .args(["--build", "--copyOnly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn missing_root_config_is_reported() {
    let project = Project::new();
    tsb_cmd(&project)
        .arg("--copyOnly")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected to find ts config"));
}

#[test]
fn more_than_one_root_config_is_rejected() {
    let project = Project::new();
    project.write_file("a.json", "{}");
    project.write_file("b.json", "{}");
    tsb_cmd(&project)
        .args(["--copyOnly", "a.json", "b.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("more than one config"));
}

#[test]
fn copy_only_copies_and_clean_removes() {
    let project = Project::new();
    project.write_file("tsconfig.json", "{}");
    project.write_file("src/templates/a.txt", "template a");
    project.write_file(
        "tsbconfig.json",
        r#"{"copyFiles":[{"files":["src/templates/*.txt"],"outDirectories":["dist"],"up":1}]}"#,
    );

    tsb_cmd(&project).arg("--copyOnly").assert().success();
    assert_eq!(project.read_file("dist/templates/a.txt"), "template a");

    tsb_cmd(&project)
        .args(["--copyOnly", "--clean"])
        .assert()
        .success();
    assert!(!project.exists("dist"));
}

#[test]
fn invalid_config_names_file_and_key() {
    let project = Project::new();
    project.write_file("tsconfig.json", "{}");
    project.write_file(
        "tsbconfig.json",
        r#"{"copyFiles":[{"files":["*.txt"],"outDirectories":["dist"],"outDirectory":"x"}]}"#,
    );

    tsb_cmd(&project)
        .arg("--copyOnly")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("tsbconfig.json"))
        .stderr(predicate::str::contains("outDirectory"));
}
