// ABOUTME: Argument vectors for each container tool invocation.
// ABOUTME: Shared by the local backend and asserted on directly in tests.

use super::BridgeError;
use crate::model::{LogKind, LogQuery};
use crate::types::{ContainerId, DomainName, ImageRef};

fn argv<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// Reject a container id the tool would read as an option instead of an operand.
pub fn check_container_id(id: &ContainerId) -> Result<(), BridgeError> {
    let value = id.as_str();
    if value.is_empty() || value.starts_with('-') || value.chars().any(char::is_whitespace) {
        return Err(BridgeError::CommandFailed(format!(
            "invalid container id '{value}'"
        )));
    }
    Ok(())
}

pub fn list_containers() -> Vec<String> {
    argv(["ls", "-a", "--format", "json"])
}

pub fn list_images() -> Vec<String> {
    argv(["image", "ls", "--format", "json"])
}

pub fn start_container(id: &ContainerId) -> Vec<String> {
    argv(["start", id.as_str()])
}

pub fn stop_container(id: &ContainerId) -> Vec<String> {
    argv(["stop", id.as_str()])
}

pub fn delete_container(id: &ContainerId) -> Vec<String> {
    argv(["delete", id.as_str()])
}

pub fn delete_image(reference: &ImageRef) -> Vec<String> {
    argv(["image", "delete", reference.as_str()])
}

pub fn run_container(image: &ImageRef, name: Option<&str>) -> Vec<String> {
    let mut args = argv(["run", "-d"]);
    if let Some(name) = name {
        args.extend(argv(["--name", name]));
    }
    args.push(image.as_str().to_string());
    args
}

pub fn container_logs(id: &ContainerId, lines: Option<u32>, follow: bool) -> Vec<String> {
    let mut args = argv(["logs"]);
    if let Some(n) = lines {
        args.extend(["-n".to_string(), n.to_string()]);
    }
    if follow {
        args.push("-f".to_string());
    }
    args.push(id.to_string());
    args
}

pub fn container_boot_logs(id: &ContainerId) -> Vec<String> {
    argv(["logs", "--boot", id.as_str()])
}

pub fn system_logs(window: Option<&str>, follow: bool) -> Vec<String> {
    let mut args = argv(["system", "logs"]);
    if let Some(window) = window {
        args.extend(argv(["--last", window]));
    }
    if follow {
        args.push("--follow".to_string());
    }
    args
}

/// Follow invocation for a log kind. Boot logs are finite and are read once.
pub fn follow_logs(kind: &LogKind, query: &LogQuery) -> Vec<String> {
    match kind {
        LogKind::Container(id) => container_logs(id, query.lines, true),
        LogKind::ContainerBoot(id) => container_boot_logs(id),
        LogKind::System => system_logs(query.window.as_deref(), true),
    }
}

pub fn system_status() -> Vec<String> {
    argv(["system", "status"])
}

pub fn system(action: &str) -> Vec<String> {
    argv(["system", action])
}

pub fn dns_list() -> Vec<String> {
    argv(["system", "dns", "list"])
}

pub fn dns(action: &str, domain: &DomainName) -> Vec<String> {
    argv(["system", "dns", action, domain.as_str()])
}

pub fn exec_shell(id: &ContainerId) -> Vec<String> {
    argv(["exec", "-ti", id.as_str(), "sh"])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> ContainerId {
        ContainerId::new("abc123")
    }

    #[test]
    fn option_like_container_ids_are_rejected() {
        for bad in ["--all", "-a", "", "abc def"] {
            let err = check_container_id(&ContainerId::new(bad)).expect_err(bad);
            assert_eq!(err.kind(), crate::backend::ErrorKind::CommandFailed);
        }
        check_container_id(&id()).expect("plain id should pass");
    }

    #[test]
    fn run_puts_name_before_image() {
        let image = ImageRef::parse("nginx:alpine").expect("valid reference");
        assert_eq!(
            run_container(&image, Some("web")),
            ["run", "-d", "--name", "web", "nginx:alpine"]
        );
        assert_eq!(run_container(&image, None), ["run", "-d", "nginx:alpine"]);
    }

    #[test]
    fn container_logs_places_id_last() {
        assert_eq!(container_logs(&id(), Some(50), true), ["logs", "-n", "50", "-f", "abc123"]);
        assert_eq!(container_logs(&id(), None, false), ["logs", "abc123"]);
    }

    #[test]
    fn system_logs_window_and_follow() {
        assert_eq!(
            system_logs(Some("5m"), true),
            ["system", "logs", "--last", "5m", "--follow"]
        );
    }

    #[test]
    fn boot_logs_are_never_followed() {
        let args = follow_logs(&LogKind::ContainerBoot(id()), &LogQuery::default());
        assert_eq!(args, ["logs", "--boot", "abc123"]);
    }

    #[test]
    fn dns_actions_take_the_domain() {
        let domain = DomainName::new("test.local").expect("valid domain");
        assert_eq!(
            dns("default", &domain),
            ["system", "dns", "default", "test.local"]
        );
    }
}
