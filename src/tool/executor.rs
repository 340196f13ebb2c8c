// ABOUTME: Runs the container tool as a subprocess and classifies its failures.
// ABOUTME: Falls back to a shell with an augmented PATH when no absolute binary is known.

use super::locator::{ToolPath, is_executable};
use crate::backend::{BridgeError, classify_failure};
use futures::Stream;
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;

const SHELL: &str = "/bin/sh";

/// Re-execs `$0` with the remaining arguments so nothing is re-split by the shell.
const SHELL_EXEC: &str = r#"exec "$0" "$@""#;

/// Exit codes the shell uses for "command not found" and "not executable".
const SHELL_NOT_FOUND: i32 = 127;
const SHELL_NOT_EXECUTABLE: i32 = 126;

/// Directories prepended to PATH for shell launches.
pub fn default_search_dirs() -> Vec<PathBuf> {
    vec![
        PathBuf::from("/usr/local/bin"),
        PathBuf::from("/opt/homebrew/bin"),
    ]
}

/// Output of a finished tool invocation.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Lines of a long-running tool invocation, ending with a classified error
/// if the process exits unsuccessfully.
pub type LineStream = Pin<Box<dyn Stream<Item = Result<String, BridgeError>> + Send>>;

/// Launches the container tool.
#[derive(Debug, Clone)]
pub struct Executor {
    tool: ToolPath,
    search_dirs: Vec<PathBuf>,
}

impl Executor {
    pub fn new(tool: ToolPath, search_dirs: Vec<PathBuf>) -> Self {
        Self { tool, search_dirs }
    }

    pub fn tool(&self) -> &ToolPath {
        &self.tool
    }

    /// True when the tool is launched through the shell fallback.
    fn via_shell(&self) -> bool {
        match &self.tool {
            ToolPath::Absolute(path) => !is_executable(path),
            ToolPath::SearchPath(_) => true,
        }
    }

    fn search_path(&self) -> OsString {
        let inherited = std::env::var_os("PATH").unwrap_or_default();
        let dirs = self
            .search_dirs
            .iter()
            .cloned()
            .chain(std::env::split_paths(&inherited));
        std::env::join_paths(dirs).unwrap_or(inherited)
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = match &self.tool {
            ToolPath::Absolute(path) if !self.via_shell() => Command::new(path),
            _ => {
                let mut cmd = Command::new(SHELL);
                cmd.arg("-c")
                    .arg(SHELL_EXEC)
                    .arg(self.tool.program_name())
                    .env("PATH", self.search_path());
                cmd
            }
        };
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, err: io::Error) -> BridgeError {
        match err.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                BridgeError::ToolNotFound(format!("{}: {err}", self.tool))
            }
            _ => BridgeError::CommandFailed(format!("failed to launch {}: {err}", self.tool)),
        }
    }

    fn exit_error(&self, exit_code: Option<i32>, stderr: &str) -> BridgeError {
        if self.via_shell() && matches!(exit_code, Some(SHELL_NOT_FOUND | SHELL_NOT_EXECUTABLE)) {
            return BridgeError::ToolNotFound(format!(
                "{} not found in search path",
                self.tool.program_name()
            ));
        }
        if stderr.trim().is_empty() {
            let status = exit_code.map_or_else(|| "a signal".to_string(), |c| c.to_string());
            return BridgeError::CommandFailed(format!("exited with status {status}"));
        }
        classify_failure(stderr)
    }

    /// Run to completion and capture both streams, whatever the exit status.
    pub async fn output(&self, args: &[String]) -> Result<CommandOutput, BridgeError> {
        tracing::debug!(tool = %self.tool, ?args, "running container tool");
        let child = self
            .command(args)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;
        let output = child
            .wait_with_output()
            .await
            .map_err(|e| BridgeError::CommandFailed(format!("failed to wait for tool: {e}")))?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run and return stdout, or a classified error on non-zero exit.
    pub async fn run(&self, args: &[String]) -> Result<String, BridgeError> {
        let output = self.output(args).await?;
        if output.exit_code == Some(0) {
            Ok(output.stdout)
        } else {
            let err = self.exit_error(output.exit_code, &output.stderr);
            tracing::debug!(?args, error = %err, "container tool failed");
            Err(err)
        }
    }

    /// Like [`run`](Self::run), killing the tool if it outlives `timeout`.
    pub async fn run_with_timeout(
        &self,
        args: &[String],
        timeout: Duration,
    ) -> Result<String, BridgeError> {
        match tokio::time::timeout(timeout, self.run(args)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(?args, ?timeout, "container tool timed out");
                Err(BridgeError::Timeout(timeout))
            }
        }
    }

    /// Start the tool and yield its stdout line by line.
    ///
    /// Dropping the stream kills the process.
    pub fn stream(&self, args: &[String]) -> Result<LineStream, BridgeError> {
        tracing::debug!(tool = %self.tool, ?args, "streaming container tool");
        let mut child = self
            .command(args)
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BridgeError::CommandFailed("tool stdout was not captured".into()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| BridgeError::CommandFailed("tool stderr was not captured".into()))?;

        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        });

        let state = StreamState {
            executor: self.clone(),
            child: Some(child),
            lines: BufReader::new(stdout).lines(),
            stderr: Some(stderr_task),
        };

        Ok(Box::pin(futures::stream::unfold(state, StreamState::advance)))
    }

    /// Spawn a detached process that outlives this call, e.g. a terminal window.
    pub fn launch(argv: &[String]) -> Result<(), BridgeError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| BridgeError::CommandFailed("empty launch command".into()))?;
        tracing::info!(program, ?args, "launching");
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    BridgeError::ToolNotFound(format!("{program}: {e}"))
                }
                _ => BridgeError::CommandFailed(format!("failed to launch {program}: {e}")),
            })
    }
}

struct StreamState {
    executor: Executor,
    child: Option<Child>,
    lines: Lines<BufReader<ChildStdout>>,
    stderr: Option<JoinHandle<String>>,
}

impl StreamState {
    async fn advance(mut self) -> Option<(Result<String, BridgeError>, Self)> {
        self.child.as_ref()?;

        match self.lines.next_line().await {
            Ok(Some(line)) => Some((Ok(line), self)),
            Ok(None) => {
                let mut child = self.child.take()?;
                let status = child.wait().await;
                let stderr = match self.stderr.take() {
                    Some(task) => task.await.unwrap_or_default(),
                    None => String::new(),
                };
                match status {
                    Ok(status) if status.success() => None,
                    Ok(status) => {
                        let err = self.executor.exit_error(status.code(), &stderr);
                        Some((Err(err), self))
                    }
                    Err(e) => Some((
                        Err(BridgeError::CommandFailed(format!("failed to wait for tool: {e}"))),
                        self,
                    )),
                }
            }
            Err(e) => {
                self.child = None;
                Some((
                    Err(BridgeError::InvalidOutput(format!("unreadable tool output: {e}"))),
                    self,
                ))
            }
        }
    }
}
