mod common;

use std::{collections::BTreeSet, path::PathBuf};

use common::FakeTsc;
use typescript_build::{
    error::Error,
    tsconfig::{resolve_references, ResolveErrorKind},
};

fn check(tsc: &FakeTsc, root_config: &str, expected: &[&str]) {
    match resolve_references(tsc, &PathBuf::from(root_config)) {
        Ok(actual) => {
            assert_eq!(
                actual,
                expected.iter().map(PathBuf::from).collect::<BTreeSet<_>>()
            );
        }
        Err(err) => {
            panic!("Unexpected error: {:?}", err);
        }
    };
}

#[test]
fn project_without_references() {
    let tsc = FakeTsc::default().with_config("/repo/tsconfig.json", r#"{"compilerOptions":{}}"#);
    check(&tsc, "/repo/tsconfig.json", &["/repo"]);
}

#[test]
fn transitive_references() {
    let tsc = FakeTsc::default()
        .with_config(
            "/repo/tsconfig.json",
            r#"{"files":[],"references":[{"path":"./packages/bar"}]}"#,
        )
        .with_config(
            "/repo/packages/bar/tsconfig.json",
            r#"{"references":[{"path":"../foo/tsconfig.build.json"}]}"#,
        )
        .with_config("/repo/packages/foo/tsconfig.build.json", r#"{}"#);
    check(
        &tsc,
        "/repo/tsconfig.json",
        &["/repo", "/repo/packages/bar", "/repo/packages/foo"],
    );
}

#[test]
fn shared_reference_is_visited_once() {
    let tsc = FakeTsc::default()
        .with_config(
            "/repo/tsconfig.json",
            r#"{"references":[{"path":"packages/a"},{"path":"packages/b"}]}"#,
        )
        .with_config(
            "/repo/packages/a/tsconfig.json",
            r#"{"references":[{"path":"../common"}]}"#,
        )
        .with_config(
            "/repo/packages/b/tsconfig.json",
            r#"{"references":[{"path":"../common/"}]}"#,
        )
        .with_config("/repo/packages/common/tsconfig.json", r#"{}"#);
    check(
        &tsc,
        "/repo/tsconfig.json",
        &[
            "/repo",
            "/repo/packages/a",
            "/repo/packages/b",
            "/repo/packages/common",
        ],
    );
    let show_config_calls = tsc
        .calls()
        .iter()
        .filter(|args| args.contains(&String::from("/repo/packages/common/tsconfig.json")))
        .count();
    assert_eq!(show_config_calls, 1);
}

#[test]
fn reference_cycle_terminates() {
    let tsc = FakeTsc::default()
        .with_config("/repo/a/tsconfig.json", r#"{"references":[{"path":"../b"}]}"#)
        .with_config("/repo/b/tsconfig.json", r#"{"references":[{"path":"../a"}]}"#);
    check(&tsc, "/repo/a/tsconfig.json", &["/repo/a", "/repo/b"]);
    assert_eq!(tsc.calls().len(), 2);
}

#[test]
fn reference_without_path_is_fatal() {
    let tsc = FakeTsc::default()
        .with_config(
            "/repo/tsconfig.json",
            r#"{"references":[{"path":"packages/a"}]}"#,
        )
        .with_config(
            "/repo/packages/a/tsconfig.json",
            r#"{"references":[{"prepend":true}]}"#,
        );
    let err = resolve_references(&tsc, &PathBuf::from("/repo/tsconfig.json")).unwrap_err();
    assert_eq!(err.config(), PathBuf::from("/repo/packages/a/tsconfig.json"));
    assert!(matches!(err.kind(), ResolveErrorKind::MissingPath { .. }));
    assert!(err.to_string().contains("no path found on reference"));
}

#[test]
fn unreadable_effective_config_is_fatal() {
    let tsc = FakeTsc::default().with_config(
        "/repo/tsconfig.json",
        r#"{"references":[{"path":"missing"}]}"#,
    );
    let err = resolve_references(&tsc, &PathBuf::from("/repo/tsconfig.json")).unwrap_err();
    assert!(matches!(err.kind(), ResolveErrorKind::ShowConfig { .. }));

    // the compiler's exit status carries through to the process exit code
    let err = Error::from(err);
    assert_eq!(err.exit_code(), 1);
    assert!(err
        .captured_output()
        .map_or(false, |(_, stderr)| stderr.contains("TS5058")));
}

#[test]
fn invalid_json_from_compiler_is_fatal() {
    let tsc = FakeTsc::default().with_config("/repo/tsconfig.json", "Version 5.4.5");
    let err = resolve_references(&tsc, &PathBuf::from("/repo/tsconfig.json")).unwrap_err();
    assert!(matches!(err.kind(), ResolveErrorKind::Parse { .. }));
}
