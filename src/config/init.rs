// ABOUTME: Config scaffolding.
// ABOUTME: Writes a commented berth.yml with the default settings.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, Config};

/// Write a template config into `dir`, returning its path.
pub fn init_config(dir: &Path, force: bool) -> Result<PathBuf> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, generate_template_yaml(&Config::default()))?;
    tracing::info!(path = %config_path.display(), "wrote configuration template");

    Ok(config_path)
}

fn yaml_list<T: std::fmt::Display>(items: impl IntoIterator<Item = T>, indent: &str) -> String {
    items
        .into_iter()
        .map(|item| format!("{indent}- {item}\n"))
        .collect()
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"tool:
  name: {name}
  # Checked in order; the first executable wins.
  candidates:
{candidates}  # Prepended to PATH when falling back to a search by name.
  search_dirs:
{search_dirs}
helper:
  socket: {socket}
  listing_timeout: {listing}
  action_timeout: {action}

system:
  auto_start: {auto_start}
  settle_delay: {settle}

terminal:
  launcher:
{launcher}"#,
        name = config.tool.name,
        candidates = yaml_list(config.tool.candidates.iter().map(|p| p.display()), "    "),
        search_dirs = yaml_list(config.tool.search_dirs.iter().map(|p| p.display()), "    "),
        socket = config.helper.socket.display(),
        listing = humantime_serde::re::humantime::format_duration(config.helper.listing_timeout),
        action = humantime_serde::re::humantime::format_duration(config.helper.action_timeout),
        auto_start = config.system.auto_start,
        settle = humantime_serde::re::humantime::format_duration(config.system.settle_delay),
        launcher = yaml_list(config.terminal.launcher.iter(), "    "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_back_to_defaults() {
        let config = Config::default();
        let yaml = generate_template_yaml(&config);
        let parsed = Config::from_yaml(&yaml).expect("template should parse");
        assert_eq!(parsed.tool.name, config.tool.name);
        assert_eq!(parsed.helper.listing_timeout, config.helper.listing_timeout);
        assert_eq!(parsed.helper.action_timeout, config.helper.action_timeout);
        assert_eq!(parsed.terminal.launcher, config.terminal.launcher);
    }
}
