// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal tables, quiet (ids only) and JSON lines for scripting.

use crate::model::{Container, ContainerImage, DnsDomain, SystemInfo};
use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Tables and progress messages
    Normal,
    /// Bare identifiers and final results only
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    fn elapsed_secs(&self) -> Option<f64> {
        self.start_time.map(|t| t.elapsed().as_secs_f64())
    }

    fn emit<T: Serialize>(&self, event: &str, data: &T) {
        let envelope = JsonEvent {
            event,
            message: None,
            data: Some(data),
            duration_secs: None,
        };
        if let Ok(json) = serde_json::to_string(&envelope) {
            println!("{json}");
        }
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => match self.elapsed_secs() {
                Some(elapsed) => println!("{message} ({elapsed:.1}s)"),
                None => println!("{message}"),
            },
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => {
                let event = JsonEvent::<()> {
                    event: "success",
                    message: Some(message),
                    data: None,
                    duration_secs: self.elapsed_secs(),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    println!("{json}");
                }
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => {
                let event = JsonEvent::<()> {
                    event: "error",
                    message: Some(message),
                    data: None,
                    duration_secs: self.elapsed_secs(),
                };
                if let Ok(json) = serde_json::to_string(&event) {
                    eprintln!("{json}");
                }
            }
        }
    }

    pub fn containers(&self, containers: &[Container]) {
        match self.mode {
            OutputMode::Json => self.emit("containers", &containers),
            OutputMode::Quiet => containers.iter().for_each(|c| println!("{}", c.id)),
            OutputMode::Normal => {
                println!(
                    "{:<14} {:<20} {:<16} {:<10} {:<8} {:<6} ADDRESS",
                    "ID", "NAME", "IMAGE", "STATUS", "ARCH", "CPUS"
                );
                for c in containers {
                    let status = if c.status.is_pending() {
                        format!("{}…", c.status())
                    } else {
                        c.status().to_string()
                    };
                    println!(
                        "{:<14} {:<20} {:<16} {:<10} {:<8} {:<6} {}",
                        c.id.short(),
                        c.display_name(),
                        c.image,
                        status,
                        c.arch,
                        c.cpus,
                        c.primary_address().unwrap_or("-")
                    );
                }
            }
        }
    }

    pub fn images(&self, images: &[ContainerImage]) {
        match self.mode {
            OutputMode::Json => self.emit("images", &images),
            OutputMode::Quiet => images.iter().for_each(|i| println!("{}", i.reference)),
            OutputMode::Normal => {
                println!(
                    "{:<32} {:<16} {:<14} {:>10}",
                    "NAME", "TAG", "DIGEST", "SIZE"
                );
                for i in images {
                    println!(
                        "{:<32} {:<16} {:<14} {:>10}",
                        i.name,
                        i.tag,
                        i.short_digest(),
                        human_size(i.size)
                    );
                }
            }
        }
    }

    pub fn domains(&self, domains: &[DnsDomain]) {
        match self.mode {
            OutputMode::Json => self.emit("domains", &domains),
            OutputMode::Quiet => domains.iter().for_each(|d| println!("{}", d.domain)),
            OutputMode::Normal => {
                for d in domains {
                    let marker = if d.is_default { "*" } else { " " };
                    println!("{marker} {}", d.domain);
                }
            }
        }
    }

    pub fn system(&self, info: &SystemInfo) {
        match self.mode {
            OutputMode::Json => self.emit("system", info),
            OutputMode::Quiet => println!("{}", info.status()),
            OutputMode::Normal => {
                println!("Status: {}", info.status());
                match info.default_domain() {
                    Some(d) => println!("Default DNS domain: {}", d.domain),
                    None => println!("Default DNS domain: -"),
                }
                println!("DNS domains: {}", info.dns_settings.len());
            }
        }
    }

    /// Print log text, or one JSON event per line.
    pub fn log_text(&self, text: &str) {
        match self.mode {
            OutputMode::Json => text.lines().for_each(|line| self.log_line(line)),
            OutputMode::Normal | OutputMode::Quiet => print!("{text}"),
        }
    }

    pub fn log_line(&self, line: &str) {
        match self.mode {
            OutputMode::Json => self.emit("log", &line),
            OutputMode::Normal | OutputMode::Quiet => println!("{line}"),
        }
    }
}

fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}

#[derive(Serialize)]
struct JsonEvent<'a, T: Serialize> {
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}
