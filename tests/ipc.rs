// ABOUTME: Tests for the helper socket boundary.
// ABOUTME: Runs a real helper on a temp socket against fake tool scripts.

mod support;

use berth::backend::{
    BridgeError, ContainerOps, Deadlines, DnsOps, ErrorKind, ImageOps, LogOps, SystemOps,
};
use berth::ipc::{self, HelperClient, TransportError};
use berth::model::{LogKind, LogQuery, SystemServiceStatus};
use berth::types::{ContainerId, DomainName, ImageRef};
use futures::StreamExt;
use std::time::Duration;
use support::{FakeTool, init_tracing};

fn client(tool: &FakeTool) -> HelperClient {
    HelperClient::new(tool.socket_path(), Deadlines::default())
}

#[tokio::test]
async fn helper_round_trips_every_kind_of_call() {
    init_tracing();
    let tool = FakeTool::standard();
    let helper = ipc::start(tool.socket_path(), tool.backend()).expect("helper should start");
    let client = client(&tool);

    let version = client.ping().await.expect("ping should succeed");
    assert_eq!(version, env!("CARGO_PKG_VERSION"));

    let containers = client.list_containers().await.expect("listing should succeed");
    assert_eq!(containers.len(), 2);
    assert_eq!(containers[0].id.as_str(), "abc123");

    let images = client.list_images().await.expect("listing should succeed");
    assert_eq!(images[1].registry, "ghcr.io");

    let id = ContainerId::new("abc123");
    client.start_container(&id).await.expect("start should succeed");
    client.stop_container(&id).await.expect("stop should succeed");

    let image = ImageRef::parse("alpine:3.20").expect("valid reference");
    client
        .run_container(&image, Some("web2"))
        .await
        .expect("run should succeed");

    let logs = client
        .container_logs(&id, Some(2))
        .await
        .expect("logs should succeed");
    assert_eq!(logs, "line one\nline two\nline three\n");

    let boot = client
        .container_boot_logs(&id)
        .await
        .expect("boot logs should succeed");
    assert_eq!(boot, "booting abc123\n");

    assert_eq!(
        client.system_status().await.expect("status should succeed"),
        SystemServiceStatus::Running
    );

    let domains = client.list_dns_domains().await.expect("dns should succeed");
    assert_eq!(domains[0].domain, "test.local");
    assert!(domains[0].is_default);

    let domain = DomainName::new("dev.local").expect("valid domain");
    client
        .create_dns_domain(&domain)
        .await
        .expect("create should succeed");

    let calls = tool.calls();
    assert!(calls.contains(&"start abc123".to_string()), "{calls:?}");
    assert!(calls.contains(&"run -d --name web2 alpine:3.20".to_string()), "{calls:?}");
    assert!(calls.contains(&"logs -n 2 abc123".to_string()), "{calls:?}");
    assert!(calls.contains(&"system dns create dev.local".to_string()), "{calls:?}");

    helper.stop().await;
    assert!(!tool.socket_path().exists());
}

#[tokio::test]
async fn tool_failures_cross_the_socket_unchanged() {
    let tool = FakeTool::new("echo 'Error: no such container: ghost' >&2\nexit 1");
    let _helper = ipc::start(tool.socket_path(), tool.backend()).expect("helper should start");

    let err = client(&tool)
        .start_container(&ContainerId::new("ghost"))
        .await
        .expect_err("start should fail");

    assert_eq!(err.kind(), ErrorKind::CommandFailed);
    assert!(err.to_string().contains("no such container: ghost"), "{err}");
}

#[tokio::test]
async fn option_like_ids_never_reach_the_tool() {
    let tool = FakeTool::standard();
    let _helper = ipc::start(tool.socket_path(), tool.backend()).expect("helper should start");
    let client = client(&tool);
    let id = ContainerId::new("--all");

    let err = client.delete_container(&id).await.expect_err("delete should be refused");
    assert_eq!(err.kind(), ErrorKind::CommandFailed);
    assert!(err.to_string().contains("invalid container id"), "{err}");

    let err = client.stop_container(&id).await.expect_err("stop should be refused");
    assert_eq!(err.kind(), ErrorKind::CommandFailed);

    let lines: Vec<_> = client
        .follow_logs(&LogKind::Container(id), &LogQuery::default())
        .await
        .expect("stream should open")
        .collect()
        .await;
    assert_eq!(lines.len(), 1);
    let err = lines[0].clone().expect_err("follow should be refused");
    assert_eq!(err.kind(), ErrorKind::CommandFailed);

    assert!(tool.calls().is_empty(), "{:?}", tool.calls());
}

#[tokio::test]
async fn direct_backend_refuses_option_like_ids() {
    let tool = FakeTool::standard();
    let backend = tool.backend();

    let err = backend
        .start_container(&ContainerId::new("-a"))
        .await
        .expect_err("start should be refused");

    assert_eq!(err.kind(), ErrorKind::CommandFailed);
    assert!(tool.calls().is_empty(), "{:?}", tool.calls());
}

#[tokio::test]
async fn service_loss_crosses_the_socket_as_connection_lost() {
    let tool = FakeTool::new("echo 'XPC connection interrupted' >&2\nexit 1");
    let _helper = ipc::start(tool.socket_path(), tool.backend()).expect("helper should start");

    let err = client(&tool)
        .list_containers()
        .await
        .expect_err("listing should fail");

    assert!(err.is_connection_lost(), "{err:?}");
}

#[tokio::test]
async fn missing_helper_is_connection_lost() {
    let dir = tempfile::tempdir().expect("tempdir");
    let client = HelperClient::new(dir.path().join("absent.sock"), Deadlines::default());

    let err = client.list_containers().await.expect_err("no helper is listening");

    assert_eq!(err.kind(), ErrorKind::ConnectionLost);
}

#[tokio::test]
async fn listing_deadline_applies_at_the_client() {
    let tool = FakeTool::new("sleep 5");
    let _helper = ipc::start(tool.socket_path(), tool.backend()).expect("helper should start");
    let client = HelperClient::new(
        tool.socket_path(),
        Deadlines {
            listing: Duration::from_millis(300),
            action: Duration::from_secs(10),
        },
    );

    let err = client.list_images().await.expect_err("listing should time out");

    assert_eq!(err, BridgeError::Timeout(Duration::from_millis(300)));
}

#[tokio::test]
async fn abandoned_request_kills_the_tool() {
    init_tracing();
    let tool = FakeTool::new(r#"sleep 1; touch "$(dirname "$0")/finished""#);
    let _helper = ipc::start(tool.socket_path(), tool.backend()).expect("helper should start");
    let client = HelperClient::new(
        tool.socket_path(),
        Deadlines {
            listing: Duration::from_millis(200),
            action: Duration::from_secs(10),
        },
    );

    let err = client.list_containers().await.expect_err("listing should time out");
    assert_eq!(err.kind(), ErrorKind::Timeout);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(
        !tool.dir.path().join("finished").exists(),
        "tool process outlived the abandoned request"
    );
}

#[tokio::test]
async fn follow_logs_streams_lines_until_the_tool_exits() {
    let tool = FakeTool::standard();
    let _helper = ipc::start(tool.socket_path(), tool.backend()).expect("helper should start");

    let lines: Vec<_> = client(&tool)
        .follow_logs(
            &LogKind::Container(ContainerId::new("abc123")),
            &LogQuery::tail(5),
        )
        .await
        .expect("follow should start")
        .collect()
        .await;

    assert_eq!(
        lines,
        vec![
            Ok("line one".to_string()),
            Ok("line two".to_string()),
            Ok("line three".to_string()),
        ]
    );
    assert!(tool.calls().contains(&"logs -n 5 -f abc123".to_string()));
}

#[tokio::test]
async fn follow_logs_ends_with_the_tool_error() {
    let tool = FakeTool::new("echo 'last words'\necho 'Error: container stopped' >&2\nexit 1");
    let _helper = ipc::start(tool.socket_path(), tool.backend()).expect("helper should start");

    let lines: Vec<_> = client(&tool)
        .follow_logs(&LogKind::System, &LogQuery::last("5m"))
        .await
        .expect("follow should start")
        .collect()
        .await;

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], Ok("last words".to_string()));
    let err = lines[1].clone().expect_err("stream should end in an error");
    assert_eq!(err.kind(), ErrorKind::CommandFailed);
}

#[tokio::test]
async fn stale_socket_file_is_replaced() {
    let tool = FakeTool::standard();
    drop(
        std::os::unix::net::UnixListener::bind(tool.socket_path())
            .expect("stale listener should bind"),
    );
    assert!(tool.socket_path().exists());

    let _helper = ipc::start(tool.socket_path(), tool.backend()).expect("helper should start");

    client(&tool).ping().await.expect("new helper should answer");
}

#[tokio::test]
async fn second_helper_on_live_socket_is_refused() {
    let tool = FakeTool::standard();
    let _helper = ipc::start(tool.socket_path(), tool.backend()).expect("helper should start");

    let err = ipc::start(tool.socket_path(), tool.backend())
        .err()
        .expect("second helper should be refused");

    assert!(matches!(err, TransportError::InUse { .. }), "{err:?}");
    client(&tool).ping().await.expect("first helper still answers");
}
