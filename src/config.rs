use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::editor::DEFAULT_LINE_LENGTH;
use crate::persist::{DEFAULT_BASE_URL, DEFAULT_DEBOUNCE_MS};

/// Log filter used when neither `--log-level` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Output format for non-interactive `--print`.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintFormat {
    Markdown,
    Html,
}

/// Flags that may come from the global config, `.blockdownrc`, or the command line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub debounce_ms: Option<u64>,
    pub line_length: Option<usize>,
    pub state_file: Option<PathBuf>,
    pub export_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl ConfigFlags {
    /// Merge with `other`; values set in `other` win.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            debounce_ms: other.debounce_ms.or(self.debounce_ms),
            line_length: other.line_length.or(self.line_length),
            state_file: other.state_file.clone().or_else(|| self.state_file.clone()),
            export_dir: other.export_dir.clone().or_else(|| self.export_dir.clone()),
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
        }
    }

    /// Fill every unset flag with its default.
    pub fn settings(&self) -> Settings {
        Settings {
            debounce_ms: self.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS),
            line_length: self.line_length.unwrap_or(DEFAULT_LINE_LENGTH),
            state_file: self.state_file.clone().unwrap_or_else(default_state_path),
            export_dir: self.export_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            log_file: self.log_file.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

/// Effective configuration after merging and defaulting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub debounce_ms: u64,
    pub line_length: usize,
    pub state_file: PathBuf,
    pub export_dir: PathBuf,
    pub base_url: String,
    pub log_file: Option<PathBuf>,
    /// Explicit filter; `None` defers to `RUST_LOG`.
    pub log_level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        ConfigFlags::default().settings()
    }
}

#[cfg_attr(
    any(target_os = "windows", target_os = "macos"),
    allow(unused_variables)
)]
fn platform_dir(unix_base: &str, xdg_var: &str) -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Some(PathBuf::from(appdata).join("blockdown"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("blockdown"),
            );
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os(xdg_var) {
            return Some(PathBuf::from(xdg).join("blockdown"));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(unix_base).join("blockdown"));
        }
    }

    None
}

pub fn global_config_path() -> PathBuf {
    platform_dir(".config", "XDG_CONFIG_HOME")
        .map_or_else(local_override_path, |dir| dir.join("config"))
}

/// Where the current share link is kept between sessions.
pub fn default_state_path() -> PathBuf {
    platform_dir(".local/state", "XDG_STATE_HOME").map_or_else(
        || PathBuf::from(".blockdown-link"),
        |dir| dir.join("link"),
    )
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".blockdownrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# blockdown defaults (saved with --save)".to_string());
    if let Some(ms) = flags.debounce_ms {
        lines.push(format!("--debounce-ms {ms}"));
    }
    if let Some(len) = flags.line_length {
        lines.push(format!("--line-length {len}"));
    }
    if let Some(path) = &flags.state_file {
        lines.push(format!("--state-file {}", path.display()));
    }
    if let Some(path) = &flags.export_dir {
        lines.push(format!("--export-dir {}", path.display()));
    }
    if let Some(url) = &flags.base_url {
        lines.push(format!("--base-url {url}"));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(level) = &flags.log_level {
        lines.push(format!("--log-level {level}"));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of CLI-style tokens, ignoring everything else.
///
/// Values may follow as the next token or after `=`. Unparseable numbers are
/// treated as unset.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        if let Some(value) = flag_value(tokens, &mut i, "--debounce-ms") {
            flags.debounce_ms = value.parse().ok();
        } else if let Some(value) = flag_value(tokens, &mut i, "--line-length") {
            flags.line_length = value.parse().ok().filter(|&len| len > 0);
        } else if let Some(value) = flag_value(tokens, &mut i, "--state-file") {
            flags.state_file = Some(PathBuf::from(value));
        } else if let Some(value) = flag_value(tokens, &mut i, "--export-dir") {
            flags.export_dir = Some(PathBuf::from(value));
        } else if let Some(value) = flag_value(tokens, &mut i, "--base-url") {
            flags.base_url = Some(value.to_string());
        } else if let Some(value) = flag_value(tokens, &mut i, "--log-file") {
            flags.log_file = Some(PathBuf::from(value));
        } else if let Some(value) = flag_value(tokens, &mut i, "--log-level") {
            flags.log_level = Some(value.to_string());
        }
        i += 1;
    }
    flags
}

/// Value of `name` at `tokens[*i]`, as `--name value` or `--name=value`.
///
/// Advances `i` past a separate value token.
fn flag_value<'a>(tokens: &'a [String], i: &mut usize, name: &str) -> Option<&'a str> {
    let token = tokens.get(*i)?;
    if token == name {
        let value = tokens.get(*i + 1)?;
        *i += 1;
        return Some(value.as_str());
    }
    token.strip_prefix(name)?.strip_prefix('=')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&args(&[
            "blockdown",
            "--debounce-ms",
            "250",
            "--line-length=100",
            "--state-file",
            "state.link",
            "--export-dir=out",
            "--base-url",
            "https://example.com/",
            "--log-file",
            "blockdown.log",
            "--log-level=debug",
            "?q=abc",
        ]));
        assert_eq!(flags.debounce_ms, Some(250));
        assert_eq!(flags.line_length, Some(100));
        assert_eq!(flags.state_file, Some(PathBuf::from("state.link")));
        assert_eq!(flags.export_dir, Some(PathBuf::from("out")));
        assert_eq!(flags.base_url.as_deref(), Some("https://example.com/"));
        assert_eq!(flags.log_file, Some(PathBuf::from("blockdown.log")));
        assert_eq!(flags.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_parse_flag_tokens_ignores_bad_numbers() {
        let flags = parse_flag_tokens(&args(&["--debounce-ms", "soon", "--line-length", "0"]));
        assert_eq!(flags.debounce_ms, None);
        assert_eq!(flags.line_length, None);
    }

    #[test]
    fn test_flag_without_value_at_end_is_ignored() {
        let flags = parse_flag_tokens(&args(&["--export-dir"]));
        assert_eq!(flags.export_dir, None);
    }

    #[test]
    fn test_config_union_prefers_later_values() {
        let file = ConfigFlags {
            debounce_ms: Some(800),
            base_url: Some("https://a/".to_string()),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            base_url: Some("https://b/".to_string()),
            log_level: Some("info".to_string()),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert_eq!(merged.debounce_ms, Some(800));
        assert_eq!(merged.base_url.as_deref(), Some("https://b/"));
        assert_eq!(merged.log_level.as_deref(), Some("info"));
    }

    #[test]
    fn test_settings_fill_defaults() {
        let settings = ConfigFlags::default().settings();
        assert_eq!(settings.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert_eq!(settings.line_length, DEFAULT_LINE_LENGTH);
        assert_eq!(settings.export_dir, PathBuf::from("."));
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.log_level, None);
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config");
        let flags = ConfigFlags {
            debounce_ms: Some(300),
            line_length: Some(72),
            state_file: Some(PathBuf::from("state.link")),
            export_dir: Some(PathBuf::from("exports")),
            base_url: Some("https://example.com/".to_string()),
            log_file: Some(PathBuf::from("bd.log")),
            log_level: Some("debug".to_string()),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_load_missing_config_is_default() {
        let dir = tempdir().unwrap();
        let loaded = load_config_flags(&dir.path().join("absent")).unwrap();
        assert_eq!(loaded, ConfigFlags::default());
    }
}
