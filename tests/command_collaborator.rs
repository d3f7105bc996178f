// tests/command_collaborator.rs

#![cfg(unix)]

use std::path::PathBuf;

use assetpipe::pipeline::{Collaborator, CommandCollaborator, Stage, StageOutcome, StageRequest};
use assetpipe::types::{CompileMode, WarningLevel};

fn request(output: PathBuf) -> StageRequest {
    StageRequest {
        stage: Stage::StyleProcess,
        inputs: vec![PathBuf::from("/in/site.less")],
        externs: Vec::new(),
        output,
        source_map: None,
        compile_mode: CompileMode::Simple,
        warning_level: WarningLevel::Default,
        pretty_print: false,
    }
}

fn shell(script: &str) -> CommandCollaborator {
    // `sh -c SCRIPT sh ARGS...` exposes the request arguments as $1..$n.
    CommandCollaborator::new(vec![
        "sh".to_string(),
        "-c".to_string(),
        script.to_string(),
        "sh".to_string(),
    ])
}

#[tokio::test]
async fn zero_exit_is_success_and_receives_the_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("args.txt");

    // $5 is --output, so $6 is the output path.
    let collaborator = shell(r#"printf '%s\n' "$@" > "$6""#);
    let outcome = collaborator.invoke(request(out.clone())).await;

    assert_eq!(outcome, StageOutcome::Success);
    let written = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines,
        vec![
            "--mode",
            "SIMPLE_OPTIMIZATIONS",
            "--warnings",
            "DEFAULT",
            "--output",
            out.to_str().unwrap(),
            "--",
            "/in/site.less",
        ]
    );
}

#[tokio::test]
async fn non_zero_exit_reports_stderr_verbatim() {
    let collaborator = shell("echo 'site.less:3: unexpected token' >&2; echo '  a {' >&2; exit 2");
    let outcome = collaborator.invoke(request(PathBuf::from("/dev/null"))).await;

    match outcome {
        StageOutcome::Failed { diagnostic } => {
            assert!(diagnostic.contains("exit code 2"), "{diagnostic}");
            assert!(diagnostic.contains("site.less:3: unexpected token\n  a {"), "{diagnostic}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn stdout_is_the_diagnostic_when_stderr_is_empty() {
    let collaborator = shell("echo 'compile failed'; exit 1");
    let outcome = collaborator.invoke(request(PathBuf::from("/dev/null"))).await;

    assert!(matches!(
        outcome,
        StageOutcome::Failed { ref diagnostic } if diagnostic.contains("compile failed")
    ));
}

#[tokio::test]
async fn missing_program_is_a_failure() {
    let collaborator = CommandCollaborator::new(vec!["assetpipe-no-such-tool".to_string()]);
    let outcome = collaborator.invoke(request(PathBuf::from("/dev/null"))).await;

    match outcome {
        StageOutcome::Failed { diagnostic } => {
            assert!(diagnostic.contains("assetpipe-no-such-tool"), "{diagnostic}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}
