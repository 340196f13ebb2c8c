// ABOUTME: Tests for launching the container tool and classifying its failures.
// ABOUTME: Uses shell scripts standing in for the real tool.

mod support;

use berth::backend::{BridgeError, ErrorKind};
use berth::tool::{Executor, ToolPath};
use futures::StreamExt;
use std::time::Duration;
use support::{FakeTool, init_tracing, write_script};

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn passes_arguments_verbatim() {
    init_tracing();
    let tool = FakeTool::new(r#"for a in "$@"; do echo "[$a]"; done"#);

    let out = tool
        .executor()
        .run(&args(&["run", "--name", "two words", "it's"]))
        .await
        .expect("run should succeed");

    assert_eq!(out, "[run]\n[--name]\n[two words]\n[it's]\n");
}

#[tokio::test]
async fn nonzero_exit_with_stderr_is_command_failed() {
    let tool = FakeTool::new("echo 'Error: no such container' >&2\nexit 1");

    let err = tool
        .executor()
        .run(&args(&["start", "nope"]))
        .await
        .expect_err("run should fail");

    assert_eq!(err.kind(), ErrorKind::CommandFailed);
    assert!(err.to_string().contains("no such container"), "{err}");
}

#[tokio::test]
async fn service_unreachable_stderr_is_connection_lost() {
    let tool = FakeTool::new("echo 'XPC connection error: Connection invalid' >&2\nexit 1");

    let err = tool
        .executor()
        .run(&args(&["ls"]))
        .await
        .expect_err("run should fail");

    assert!(err.is_connection_lost(), "{err:?}");
}

#[tokio::test]
async fn empty_stderr_reports_exit_status() {
    let tool = FakeTool::new("exit 3");

    let err = tool
        .executor()
        .run(&args(&["ls"]))
        .await
        .expect_err("run should fail");

    assert_eq!(
        err,
        BridgeError::CommandFailed("exited with status 3".into())
    );
}

#[tokio::test]
async fn output_captures_failure_without_classifying() {
    let tool = FakeTool::new("echo out\necho err >&2\nexit 2");

    let output = tool
        .executor()
        .output(&args(&[]))
        .await
        .expect("output should be captured");

    assert_eq!(output.exit_code, Some(2));
    assert_eq!(output.stdout, "out\n");
    assert_eq!(output.stderr, "err\n");
}

#[tokio::test]
async fn search_path_fallback_finds_tool_in_extra_dirs() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    write_script(dir.path(), "berth-fake-tool", r#"echo "found $*""#);

    let executor = Executor::new(
        ToolPath::SearchPath("berth-fake-tool".into()),
        vec![dir.path().to_path_buf()],
    );
    let out = executor
        .run(&args(&["ls", "-a"]))
        .await
        .expect("tool should be found through the search dirs");

    assert_eq!(out, "found ls -a\n");
}

#[tokio::test]
async fn missing_tool_on_search_path_is_tool_not_found() {
    let executor = Executor::new(
        ToolPath::SearchPath("berth-definitely-missing-tool".into()),
        vec![],
    );

    let err = executor
        .run(&args(&["ls"]))
        .await
        .expect_err("missing tool should fail");

    assert_eq!(err.kind(), ErrorKind::ToolNotFound);
}

#[tokio::test]
async fn missing_absolute_tool_is_tool_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let executor = Executor::new(ToolPath::Absolute(dir.path().join("container")), vec![]);

    let err = executor
        .run(&args(&["ls"]))
        .await
        .expect_err("missing tool should fail");

    assert_eq!(err.kind(), ErrorKind::ToolNotFound);
}

#[tokio::test]
async fn slow_tool_times_out() {
    let tool = FakeTool::new("sleep 5");

    let started = std::time::Instant::now();
    let err = tool
        .executor()
        .run_with_timeout(&args(&["ls"]), Duration::from_millis(200))
        .await
        .expect_err("slow tool should time out");

    assert_eq!(err, BridgeError::Timeout(Duration::from_millis(200)));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn stream_yields_lines_then_ends() {
    let tool = FakeTool::new("echo first\necho second");

    let lines: Vec<_> = tool
        .executor()
        .stream(&args(&["logs", "-f", "abc"]))
        .expect("stream should start")
        .collect()
        .await;

    assert_eq!(
        lines,
        vec![Ok("first".to_string()), Ok("second".to_string())]
    );
}

#[tokio::test]
async fn stream_ends_with_classified_error_on_failure() {
    let tool = FakeTool::new("echo partial\necho 'Error: container not running' >&2\nexit 1");

    let lines: Vec<_> = tool
        .executor()
        .stream(&args(&["logs", "-f", "abc"]))
        .expect("stream should start")
        .collect()
        .await;

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], Ok("partial".to_string()));
    let err = lines[1].clone().expect_err("last item should be an error");
    assert_eq!(err.kind(), ErrorKind::CommandFailed);
    assert!(err.to_string().contains("container not running"));
}

#[tokio::test]
async fn stream_of_missing_tool_fails_to_start() {
    let dir = tempfile::tempdir().expect("tempdir");
    let executor = Executor::new(ToolPath::Absolute(dir.path().join("container")), vec![]);

    let lines: Vec<_> = match executor.stream(&args(&["logs", "-f", "abc"])) {
        Ok(stream) => stream.collect().await,
        Err(e) => vec![Err(e)],
    };

    // Either the spawn fails or the shell reports the missing command.
    assert_eq!(lines.len(), 1);
    assert_eq!(
        lines[0].clone().expect_err("should fail").kind(),
        ErrorKind::ToolNotFound
    );
}
