// ABOUTME: Test support utilities.
// ABOUTME: Fake container tool scripts, backends wired to them and tracing setup.

#![allow(dead_code)]

use berth::backend::{Deadlines, LocalBackend};
use berth::tool::{Executor, ToolPath};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tempfile::TempDir;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("berth=debug".parse().expect("valid directive"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Two containers: a running one with an address and a stopped one whose
/// hostname repeats its id.
pub const CONTAINERS_JSON: &str = r#"[
  {"status":"running",
   "networks":[{"hostname":"web1.test.","address":"192.168.64.3/24","gateway":"192.168.64.1","network":"default"}],
   "configuration":{"id":"abc123","hostname":"web1",
     "image":{"reference":"docker.io/library/nginx:alpine",
              "descriptor":{"digest":"sha256:deadbeef","size":123,"mediaType":"application/vnd.oci.image.manifest.v1+json"}},
     "platform":{"architecture":"arm64","os":"linux"},
     "resources":{"cpus":2,"memoryInBytes":1073741824},
     "rosetta":false}},
  {"status":"stopped",
   "networks":null,
   "configuration":{"id":"def4567890abcdef00","hostname":"def4567890abcdef00",
     "image":{"reference":"ghcr.io/acme/worker:1.4"},
     "platform":{"architecture":"amd64","os":"linux"},
     "resources":{"cpus":1,"memoryInBytes":536870912},
     "rosetta":true}}
]"#;

pub const IMAGES_JSON: &str = r#"[
  {"reference":"docker.io/library/alpine:3.20",
   "descriptor":{"mediaType":"application/vnd.oci.image.index.v1+json","size":9218,"digest":"sha256:0123456789abcdef0123"}},
  {"reference":"ghcr.io/acme/worker:1.4",
   "descriptor":{"mediaType":"application/vnd.oci.image.manifest.v1+json","size":52428800,"digest":"sha256:feedface00112233"}}
]"#;

/// A well-behaved tool. Listings come from files next to the script so tests
/// can change them between calls; every invocation is appended to calls.log.
pub const STANDARD_TOOL: &str = r#"
here="$(dirname "$0")"
echo "$*" >> "$here/calls.log"
case "$1" in
  ls) cat "$here/containers.json" ;;
  image)
    case "$2" in
      ls) cat "$here/images.json" ;;
      delete) ;;
    esac ;;
  start|stop|delete|run) ;;
  logs)
    if [ "$2" = "--boot" ]; then
      echo "booting $3"
    else
      echo "line one"
      echo "line two"
      echo "line three"
    fi ;;
  system)
    case "$2" in
      status) echo "apiserver is running" ;;
      dns)
        if [ "$3" = "list" ]; then
          printf '*test.local\nother.local\n'
        fi ;;
      logs) echo "system line" ;;
      start|stop|restart) ;;
      *) echo "unknown system command: $2" >&2; exit 1 ;;
    esac ;;
  *) echo "unknown command: $1" >&2; exit 1 ;;
esac
"#;

/// Write an executable shell script named `name` into `dir`.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}")).expect("script write should succeed");
    let mut perms = fs::metadata(&path)
        .expect("script metadata should be readable")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod should succeed");
    path
}

/// A fake container tool living in its own temp directory.
pub struct FakeTool {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl FakeTool {
    pub fn new(body: &str) -> Self {
        let dir = TempDir::new().expect("tempdir should be created");
        let path = write_script(dir.path(), "container", body);
        Self { dir, path }
    }

    /// The standard tool with the default container and image listings.
    pub fn standard() -> Self {
        let tool = Self::new(STANDARD_TOOL);
        tool.set_containers(CONTAINERS_JSON);
        tool.set_images(IMAGES_JSON);
        tool
    }

    pub fn set_containers(&self, json: &str) {
        fs::write(self.dir.path().join("containers.json"), json)
            .expect("containers fixture write should succeed");
    }

    pub fn set_images(&self, json: &str) {
        fs::write(self.dir.path().join("images.json"), json)
            .expect("images fixture write should succeed");
    }

    /// Argument lines of every invocation so far.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn executor(&self) -> Executor {
        Executor::new(ToolPath::Absolute(self.path.clone()), vec![])
    }

    pub fn backend(&self) -> LocalBackend {
        self.backend_with(Deadlines {
            listing: Duration::from_secs(10),
            action: Duration::from_secs(10),
        })
    }

    pub fn backend_with(&self, deadlines: Deadlines) -> LocalBackend {
        LocalBackend::new(self.executor(), deadlines, vec!["true".into()])
    }

    /// A socket path inside the tool's temp directory.
    pub fn socket_path(&self) -> PathBuf {
        self.dir.path().join("helper.sock")
    }
}
