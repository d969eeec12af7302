//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.hanoi/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HanoiConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RenderConfig {
    pub mode: Option<RenderMode>,
    pub delay_ms: Option<u64>,
    pub color: Option<bool>,
    pub colormap: Option<PathBuf>,
    pub disk_glyph: Option<String>,
    pub rod_glyph: Option<String>,
    pub pole_spacing: Option<usize>,
}

/// How successive frames reach the terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Print every frame below the previous one.
    #[default]
    Append,
    /// Redraw a single frame in place, with a move counter.
    InPlace,
}

impl std::str::FromStr for RenderMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(RenderMode::Append),
            "in-place" | "inplace" | "in_place" => Ok(RenderMode::InPlace),
            other => Err(ConfigError::Invalid(format!("unknown render mode {other:?}"))),
        }
    }
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_DISK_GLYPH: char = '#';
pub const DEFAULT_ROD_GLYPH: char = '|';
pub const DEFAULT_POLE_SPACING: usize = 3;
pub const MAX_POLE_SPACING: usize = 64;
pub const DEFAULT_IN_PLACE_DELAY_MS: u64 = 1000;
pub const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Warn;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub mode: RenderMode,
    pub delay: Duration,
    pub color: bool,
    pub colormap: Option<PathBuf>,
    pub disk_glyph: char,
    pub rod_glyph: char,
    pub pole_spacing: usize,
    pub log_file: Option<PathBuf>,
    pub log_level: log::LevelFilter,
}

/// Settings given on the command line. `None` / `false` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub mode: Option<RenderMode>,
    pub delay_ms: Option<u64>,
    pub color: bool,
    pub colormap: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.hanoi/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".hanoi").join("config.toml"))
}

/// Load config from `explicit` if given, else from `~/.hanoi/config.toml`.
///
/// A missing default file is generated and treated as empty. A missing
/// explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<HanoiConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(HanoiConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(HanoiConfig::default());
    }

    read_config(&path)
}

fn read_config(path: &Path) -> Result<HanoiConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: HanoiConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r##"# Hanoi Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_file = "/tmp/hanoi.log"       # Log to a file instead of stderr
# log_level = "warn"                # "error", "warn", "info", "debug", "trace"

# [render]
# mode = "append"                   # "append" or "in-place"  (env: HANOI_MODE)
# delay_ms = 0                      # Pause between frames; in-place defaults to 1000  (env: HANOI_DELAY_MS)
# color = false                     # Color disks with the built-in gradient
# colormap = "viridis.csv"          # One r,g,b line per color; implies color  (env: HANOI_COLORMAP)
# disk_glyph = "#"
# rod_glyph = "|"
# pole_spacing = 3
"##;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &HanoiConfig, cli: &CliOverrides) -> Result<ResolvedConfig, ConfigError> {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as `resolve`, with env lookups supplied by the caller.
pub fn resolve_with_env(
    config: &HanoiConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    // Mode: CLI → env → config → default
    let mode = match (cli.mode, env("HANOI_MODE")) {
        (Some(mode), _) => mode,
        (None, Some(value)) => value.parse()?,
        (None, None) => config.render.mode.unwrap_or_default(),
    };

    // Delay: CLI → env → config → per-mode default
    let env_delay = env("HANOI_DELAY_MS")
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid(format!("HANOI_DELAY_MS is not a number: {v:?}")))
        })
        .transpose()?;
    let delay_ms = cli
        .delay_ms
        .or(env_delay)
        .or(config.render.delay_ms)
        .unwrap_or(match mode {
            RenderMode::Append => 0,
            RenderMode::InPlace => DEFAULT_IN_PLACE_DELAY_MS,
        });

    // Colormap: CLI → env → config. Any colormap turns color on.
    let colormap = cli
        .colormap
        .clone()
        .or_else(|| env("HANOI_COLORMAP").map(PathBuf::from))
        .or_else(|| config.render.colormap.clone());
    let color = cli.color || colormap.is_some() || config.render.color.unwrap_or(false);

    let disk_glyph = resolve_glyph("disk_glyph", config.render.disk_glyph.as_deref(), DEFAULT_DISK_GLYPH)?;
    let rod_glyph = resolve_glyph("rod_glyph", config.render.rod_glyph.as_deref(), DEFAULT_ROD_GLYPH)?;

    let pole_spacing = config.render.pole_spacing.unwrap_or(DEFAULT_POLE_SPACING);
    if pole_spacing > MAX_POLE_SPACING {
        return Err(ConfigError::Invalid(format!(
            "pole_spacing must be at most {MAX_POLE_SPACING}, got {pole_spacing}"
        )));
    }

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        match config.general.log_level.as_deref() {
            Some(level) => level
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("unknown log level {level:?}")))?,
            None => DEFAULT_LOG_LEVEL,
        }
    };

    Ok(ResolvedConfig {
        mode,
        delay: Duration::from_millis(delay_ms),
        color,
        colormap,
        disk_glyph,
        rod_glyph,
        pole_spacing,
        log_file: cli.log_file.clone().or_else(|| config.general.log_file.clone()),
        log_level,
    })
}

/// Glyphs fill fixed-width fields, so each must be one character one column wide.
fn resolve_glyph(name: &str, value: Option<&str>, default: char) -> Result<char, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if value.width() == 1 => Ok(c),
        _ => Err(ConfigError::Invalid(format!(
            "{name} must be a single one-column character, got {value:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_config_parses() {
        let config = HanoiConfig::default();
        assert!(config.render.mode.is_none());
        assert!(config.general.log_file.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with_env(&HanoiConfig::default(), &CliOverrides::default(), no_env).unwrap();
        assert_eq!(resolved.mode, RenderMode::Append);
        assert_eq!(resolved.delay, Duration::ZERO);
        assert!(!resolved.color);
        assert_eq!(resolved.colormap, None);
        assert_eq!(resolved.disk_glyph, '#');
        assert_eq!(resolved.rod_glyph, '|');
        assert_eq!(resolved.pole_spacing, 3);
        assert_eq!(resolved.log_level, log::LevelFilter::Warn);
    }

    #[test]
    fn test_in_place_defaults_to_one_second() {
        let cli = CliOverrides {
            mode: Some(RenderMode::InPlace),
            ..Default::default()
        };
        let resolved = resolve_with_env(&HanoiConfig::default(), &cli, no_env).unwrap();
        assert_eq!(resolved.delay, Duration::from_secs(1));
    }

    #[test]
    fn test_config_values_override_defaults() {
        let toml_str = r#"
[general]
log_level = "info"

[render]
mode = "in-place"
delay_ms = 250
color = true
disk_glyph = "="
rod_glyph = "!"
pole_spacing = 1
"#;
        let config: HanoiConfig = toml::from_str(toml_str).unwrap();
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env).unwrap();
        assert_eq!(resolved.mode, RenderMode::InPlace);
        assert_eq!(resolved.delay, Duration::from_millis(250));
        assert!(resolved.color);
        assert_eq!(resolved.disk_glyph, '=');
        assert_eq!(resolved.rod_glyph, '!');
        assert_eq!(resolved.pole_spacing, 1);
        assert_eq!(resolved.log_level, log::LevelFilter::Info);
    }

    #[test]
    fn test_env_overrides_config_and_cli_overrides_env() {
        let config = HanoiConfig {
            render: RenderConfig {
                mode: Some(RenderMode::Append),
                delay_ms: Some(5),
                ..Default::default()
            },
            ..Default::default()
        };
        let env = |key: &str| match key {
            "HANOI_MODE" => Some("in-place".to_string()),
            "HANOI_DELAY_MS" => Some("40".to_string()),
            "HANOI_COLORMAP" => Some("env.csv".to_string()),
            _ => None,
        };

        let resolved = resolve_with_env(&config, &CliOverrides::default(), env).unwrap();
        assert_eq!(resolved.mode, RenderMode::InPlace);
        assert_eq!(resolved.delay, Duration::from_millis(40));
        assert_eq!(resolved.colormap, Some(PathBuf::from("env.csv")));
        assert!(resolved.color);

        let cli = CliOverrides {
            mode: Some(RenderMode::Append),
            delay_ms: Some(7),
            colormap: Some(PathBuf::from("cli.csv")),
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, &cli, env).unwrap();
        assert_eq!(resolved.mode, RenderMode::Append);
        assert_eq!(resolved.delay, Duration::from_millis(7));
        assert_eq!(resolved.colormap, Some(PathBuf::from("cli.csv")));
    }

    #[test]
    fn test_bad_env_values_rejected() {
        let bad_mode = |key: &str| (key == "HANOI_MODE").then(|| "sideways".to_string());
        assert!(matches!(
            resolve_with_env(&HanoiConfig::default(), &CliOverrides::default(), bad_mode),
            Err(ConfigError::Invalid(_))
        ));

        let bad_delay = |key: &str| (key == "HANOI_DELAY_MS").then(|| "soon".to_string());
        assert!(matches!(
            resolve_with_env(&HanoiConfig::default(), &CliOverrides::default(), bad_delay),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_verbose_forces_debug() {
        let cli = CliOverrides {
            verbose: true,
            ..Default::default()
        };
        let resolved = resolve_with_env(&HanoiConfig::default(), &cli, no_env).unwrap();
        assert_eq!(resolved.log_level, log::LevelFilter::Debug);
    }

    #[test]
    fn test_wide_or_long_glyphs_rejected() {
        for glyph in ["##", "", "中"] {
            let config = HanoiConfig {
                render: RenderConfig {
                    disk_glyph: Some(glyph.to_string()),
                    ..Default::default()
                },
                ..Default::default()
            };
            let result = resolve_with_env(&config, &CliOverrides::default(), no_env);
            assert!(matches!(result, Err(ConfigError::Invalid(_))), "{glyph:?}");
        }
    }

    #[test]
    fn test_huge_pole_spacing_rejected() {
        let config: HanoiConfig = toml::from_str("[render]\npole_spacing = 1000000000\n").unwrap();
        let result = resolve_with_env(&config, &CliOverrides::default(), no_env);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let config: HanoiConfig = toml::from_str("[render]\npole_spacing = 64\n").unwrap();
        let resolved = resolve_with_env(&config, &CliOverrides::default(), no_env).unwrap();
        assert_eq!(resolved.pole_spacing, MAX_POLE_SPACING);
    }

    #[test]
    fn test_unknown_mode_in_toml_fails_to_parse() {
        let result: Result<HanoiConfig, _> = toml::from_str("[render]\nmode = \"sideways\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hanoi.toml");
        fs::write(&path, "[render]\npole_spacing = 5\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.render.pole_spacing, Some(5));
    }

    #[test]
    fn test_generated_default_config_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        generate_default_config(&path);
        let config = read_config(&path).unwrap();
        assert!(config.render.mode.is_none());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("# disk_glyph = \"#\""));
        assert!(written.trim_end().ends_with("# pole_spacing = 3"));
    }
}
