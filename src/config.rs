use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::{Result, ShellError, workspace::MAX_WORKSPACES};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub workspaces: usize,
    pub terminal: String,
    pub launcher: String,
    pub wallpaper_app: String,
    pub output_width: i32,
    pub output_height: i32,
    pub panel_height: i32,
    pub shell_commands: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workspaces: 4,
            terminal: "weston-terminal".to_owned(),
            launcher: "rofi -show drun".to_owned(),
            wallpaper_app: "wallpaper".to_owned(),
            output_width: 1920,
            output_height: 1080,
            panel_height: 0,
            shell_commands: true,
        }
    }
}

impl RuntimeConfig {
    /// Overrides the workspace count, clamped like the file value.
    pub fn set_workspaces(&mut self, count: usize) {
        self.workspaces = count.clamp(1, MAX_WORKSPACES);
    }
}

pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: RuntimeConfig,
}

pub fn load_or_create_default() -> Result<LoadedConfig> {
    let path = config_path()?;
    let config = load_or_create(&path)?;
    Ok(LoadedConfig { path, config })
}

/// Loads `path`, writing the default template there first if it is missing.
pub fn load_or_create(path: &Path) -> Result<RuntimeConfig> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                ShellError::Config(format!(
                    "failed to create config directory {}: {err}",
                    parent.display()
                ))
            })?;
        }
        fs::write(path, default_config_template()).map_err(|err| {
            ShellError::Config(format!(
                "failed to write default config {}: {err}",
                path.display()
            ))
        })?;
        tracing::info!(path = %path.display(), "created default magpie.config");
    }

    load_from_path(path)
}

pub fn load_from_path(path: &Path) -> Result<RuntimeConfig> {
    let content = fs::read_to_string(path).map_err(|err| {
        ShellError::Config(format!("failed to read config {}: {err}", path.display()))
    })?;
    parse_config(&content).map_err(|err| match err {
        ShellError::Config(message) => ShellError::Config(format!("{}: {message}", path.display())),
        other => other,
    })
}

pub fn parse_config(content: &str) -> Result<RuntimeConfig> {
    let values = parse_key_values(content)?;
    let defaults = RuntimeConfig::default();

    for key in values.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            tracing::warn!(key = %key, "ignoring unknown config key");
        }
    }

    let output_width = parse_i32(&values, "output-width", defaults.output_width)?;
    let output_height = parse_i32(&values, "output-height", defaults.output_height)?;
    if output_width <= 0 || output_height <= 0 {
        return Err(ShellError::Config(format!(
            "output size must be positive, got {output_width}x{output_height}"
        )));
    }

    let workspaces = parse_usize(&values, "workspaces", defaults.workspaces)?;
    let panel_height = parse_i32(&values, "panel-height", defaults.panel_height)?;

    Ok(RuntimeConfig {
        workspaces: workspaces.clamp(1, MAX_WORKSPACES),
        terminal: parse_string(&values, "terminal", &defaults.terminal),
        launcher: parse_string(&values, "launcher", &defaults.launcher),
        wallpaper_app: parse_string(&values, "wallpaper-app", &defaults.wallpaper_app),
        output_width,
        output_height,
        panel_height: panel_height.clamp(0, output_height),
        shell_commands: parse_bool_flexible(&values, "shell-commands", defaults.shell_commands)?,
    })
}

const KNOWN_KEYS: &[&str] = &[
    "workspaces",
    "terminal",
    "launcher",
    "wallpaper-app",
    "output-width",
    "output-height",
    "panel-height",
    "shell-commands",
];

fn config_path() -> Result<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join("magpie").join("magpie.config"));
    }

    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home)
            .join(".config")
            .join("magpie")
            .join("magpie.config"));
    }

    Err(ShellError::Config(
        "unable to resolve config path: HOME and XDG_CONFIG_HOME are unset".to_owned(),
    ))
}

fn parse_key_values(content: &str) -> Result<HashMap<String, String>> {
    let mut values = HashMap::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(ShellError::Config(format!(
                "line {}: expected key=value, got `{line}`",
                number + 1
            )));
        };
        values.insert(key.trim().to_owned(), value.trim().to_owned());
    }
    Ok(values)
}

fn parse_string(values: &HashMap<String, String>, key: &str, default: &str) -> String {
    values
        .get(key)
        .cloned()
        .unwrap_or_else(|| default.to_owned())
}

fn parse_usize(values: &HashMap<String, String>, key: &str, default: usize) -> Result<usize> {
    match values.get(key) {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|err| ShellError::Config(format!("invalid value for {key}: {raw} ({err})"))),
        None => Ok(default),
    }
}

fn parse_i32(values: &HashMap<String, String>, key: &str, default: i32) -> Result<i32> {
    match values.get(key) {
        Some(raw) => raw
            .parse::<i32>()
            .map_err(|err| ShellError::Config(format!("invalid value for {key}: {raw} ({err})"))),
        None => Ok(default),
    }
}

fn parse_bool_flexible(values: &HashMap<String, String>, key: &str, default: bool) -> Result<bool> {
    let Some(raw) = values.get(key) else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ShellError::Config(format!(
            "invalid value for {key}: {raw} (expected bool or 0/1)"
        ))),
    }
}

fn default_config_template() -> &'static str {
    r#"# magpie config
# File: ~/.config/magpie/magpie.config (or $XDG_CONFIG_HOME/magpie/magpie.config)
# One key=value per line. Lines starting with # are ignored.

# Number of workspaces in the ring (1 to 32).
workspaces=4

# Alt+Ctrl+T and Alt+Ctrl+X run this command.
terminal=weston-terminal

# Alt+Ctrl+A and a swipe from the left edge run this command.
launcher=rofi -show drun

# Windows of this application are placed on the background layer.
wallpaper-app=wallpaper

# Size of the headless output and the strip reserved for a panel at its top.
output-width=1920
output-height=1080
panel-height=0

# Whether the Alt+Ctrl shell chords start enabled (Alt+Ctrl+Delete toggles).
shell-commands=true
"#
}
